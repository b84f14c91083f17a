use crate::{ChatFailure, Effect, Msg, PublishPhase, PublishWarning, PublisherState};

/// Pure update function: applies a message to state and returns any effects.
///
/// The store mirrors the phase: every transition into `NoMessage` from a tracked
/// ref emits `PersistRef(None)` before anything else.
pub fn update(mut state: PublisherState, msg: Msg) -> (PublisherState, Vec<Effect>) {
    let effects = match msg {
        Msg::RefRestored(message_ref) => {
            state.track(message_ref);
            Vec::new()
        }
        Msg::ReportRendered(content) => {
            state.set_pending(content.clone());
            match state.phase() {
                PublishPhase::NoMessage => vec![Effect::CreateMessage { content }],
                PublishPhase::Tracking(message_ref) => vec![Effect::EditMessage {
                    message_ref,
                    content,
                }],
            }
        }
        Msg::MessageCreated(message_ref) => {
            state.track(Some(message_ref));
            state.settle();
            vec![Effect::PersistRef(Some(message_ref))]
        }
        Msg::CreateFailed(failure) => {
            state.track(None);
            state.settle();
            let warning = match failure {
                ChatFailure::Forbidden => PublishWarning::Forbidden,
                other => PublishWarning::CreateFailed {
                    reason: other.to_string(),
                },
            };
            vec![Effect::Warn(warning)]
        }
        Msg::MessageEdited => {
            state.settle();
            Vec::new()
        }
        Msg::EditFailed(ChatFailure::NotFound) => {
            // Deleted out-of-band: forget it and post a replacement.
            state.track(None);
            match state.pending().cloned() {
                Some(content) => vec![
                    Effect::PersistRef(None),
                    Effect::CreateMessage { content },
                ],
                None => vec![Effect::PersistRef(None)],
            }
        }
        Msg::EditFailed(failure) => {
            state.track(None);
            state.settle();
            let warning = match failure {
                ChatFailure::Forbidden => PublishWarning::Forbidden,
                other => PublishWarning::EditFailed {
                    reason: other.to_string(),
                },
            };
            vec![Effect::PersistRef(None), Effect::Warn(warning)]
        }
    };

    (state, effects)
}
