use std::collections::VecDeque;
use std::sync::Arc;

use rollcall_core::{
    render, update, Effect, Msg, PublishPhase, PublishWarning, PublisherState, RenderOptions,
    Report,
};
use rollcall_logging::{rollcall_error, rollcall_info, rollcall_warn};
use tokio::sync::Mutex;

use crate::chat::ChatTarget;
use crate::store::MessageRefStore;

/// What a publish attempt ended in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishOutcome {
    pub phase: PublishPhase,
    pub warnings: Vec<PublishWarning>,
}

/// Runs the publisher state machine against a chat target and a ref store.
///
/// The lock around the state serializes publishes, so two cycles can never
/// both see `NoMessage` and post twice.
pub struct Publisher {
    chat: Arc<dyn ChatTarget>,
    refs: Arc<dyn MessageRefStore>,
    server_label: String,
    state: Mutex<PublisherState>,
}

impl Publisher {
    pub fn new(
        chat: Arc<dyn ChatTarget>,
        refs: Arc<dyn MessageRefStore>,
        server_label: impl Into<String>,
    ) -> Self {
        let (state, _) = update(PublisherState::new(), Msg::RefRestored(refs.load()));
        Self {
            chat,
            refs,
            server_label: server_label.into(),
            state: Mutex::new(state),
        }
    }

    pub async fn phase(&self) -> PublishPhase {
        self.state.lock().await.phase()
    }

    /// Renders `report` and converges the live message onto it. Never fails.
    pub async fn publish(&self, report: &Report, first_run: bool) -> PublishOutcome {
        let content = render(
            report,
            &RenderOptions {
                server_label: self.server_label.clone(),
                first_run,
            },
        );

        let mut guard = self.state.lock().await;
        let mut state = std::mem::take(&mut *guard);
        let mut inbox = VecDeque::from([Msg::ReportRendered(content)]);
        let mut warnings = Vec::new();

        while let Some(msg) = inbox.pop_front() {
            let (next, effects) = update(state, msg);
            state = next;
            for effect in effects {
                if let Some(reply) = self.run_effect(effect, &mut warnings).await {
                    inbox.push_back(reply);
                }
            }
        }

        let phase = state.phase();
        *guard = state;
        PublishOutcome { phase, warnings }
    }

    async fn run_effect(&self, effect: Effect, warnings: &mut Vec<PublishWarning>) -> Option<Msg> {
        match effect {
            Effect::CreateMessage { content } => match self.chat.create(&content).await {
                Ok(message_ref) => {
                    rollcall_info!("Posted new report message {}", message_ref);
                    Some(Msg::MessageCreated(message_ref))
                }
                Err(failure) => Some(Msg::CreateFailed(failure)),
            },
            Effect::EditMessage {
                message_ref,
                content,
            } => match self.chat.fetch_and_edit(message_ref, &content).await {
                Ok(()) => {
                    rollcall_info!("Edited report message {}", message_ref);
                    Some(Msg::MessageEdited)
                }
                Err(failure) => {
                    rollcall_warn!("Report message {} unavailable: {}", message_ref, failure);
                    Some(Msg::EditFailed(failure))
                }
            },
            Effect::PersistRef(message_ref) => {
                if let Err(err) = self.refs.save(message_ref) {
                    // The in-memory state still tracks the ref until restart.
                    rollcall_error!("Failed to persist message ref {:?}: {}", message_ref, err);
                }
                None
            }
            Effect::Warn(warning) => {
                rollcall_warn!("Publish warning: {}", warning);
                warnings.push(warning);
                None
            }
        }
    }
}
