use std::fmt;

use crate::RenderedReport;

/// Identifier of a message posted by the publisher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageRef(u64);

impl MessageRef {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for MessageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PublishPhase {
    #[default]
    NoMessage,
    Tracking(MessageRef),
}

/// State of the single report message owned by the publisher.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PublisherState {
    phase: PublishPhase,
    pending: Option<RenderedReport>,
}

impl PublisherState {
    pub fn new() -> Self {
        Self::default()
    }

    /// State for a ref persisted by an earlier run.
    pub fn restored(message_ref: Option<MessageRef>) -> Self {
        Self {
            phase: phase_of(message_ref),
            pending: None,
        }
    }

    pub fn phase(&self) -> PublishPhase {
        self.phase
    }

    pub fn tracked(&self) -> Option<MessageRef> {
        match self.phase {
            PublishPhase::NoMessage => None,
            PublishPhase::Tracking(message_ref) => Some(message_ref),
        }
    }

    /// True once the last rendered report has been delivered or given up on.
    pub fn is_settled(&self) -> bool {
        self.pending.is_none()
    }

    pub(crate) fn track(&mut self, message_ref: Option<MessageRef>) {
        self.phase = phase_of(message_ref);
    }

    pub(crate) fn set_pending(&mut self, content: RenderedReport) {
        self.pending = Some(content);
    }

    pub(crate) fn pending(&self) -> Option<&RenderedReport> {
        self.pending.as_ref()
    }

    pub(crate) fn settle(&mut self) {
        self.pending = None;
    }
}

fn phase_of(message_ref: Option<MessageRef>) -> PublishPhase {
    match message_ref {
        Some(message_ref) => PublishPhase::Tracking(message_ref),
        None => PublishPhase::NoMessage,
    }
}
