use crate::{MessageRef, RenderedReport};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    CreateMessage {
        content: RenderedReport,
    },
    EditMessage {
        message_ref: MessageRef,
        content: RenderedReport,
    },
    /// Store `Some(ref)` as the tracked message, or clear it with `None`.
    PersistRef(Option<MessageRef>),
    Warn(PublishWarning),
}

/// Non-fatal conditions surfaced by a publish attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishWarning {
    /// The bot lacks permission in the target channel; operator action needed.
    Forbidden,
    CreateFailed { reason: String },
    EditFailed { reason: String },
}

impl std::fmt::Display for PublishWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PublishWarning::Forbidden => {
                write!(f, "no permission to post or read history in the target channel")
            }
            PublishWarning::CreateFailed { reason } => {
                write!(f, "could not create report message: {reason}")
            }
            PublishWarning::EditFailed { reason } => {
                write!(f, "could not edit report message: {reason}")
            }
        }
    }
}
