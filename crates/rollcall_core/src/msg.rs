use thiserror::Error;

use crate::{MessageRef, RenderedReport};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Restore the message ref persisted by a previous run.
    RefRestored(Option<MessageRef>),
    /// A freshly rendered report is ready to publish.
    ReportRendered(RenderedReport),
    /// Chat target accepted a new message.
    MessageCreated(MessageRef),
    /// Chat target refused to create a message.
    CreateFailed(ChatFailure),
    /// The tracked message now shows the pending report.
    MessageEdited,
    /// Fetching or editing the tracked message failed.
    EditFailed(ChatFailure),
}

/// Classified failure of a chat target operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatFailure {
    #[error("message not found")]
    NotFound,
    #[error("missing permission in the target channel")]
    Forbidden,
    #[error("{0}")]
    Other(String),
}
