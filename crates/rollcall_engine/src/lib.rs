//! Rollcall engine: roster fetching, chat publishing, persistence and scheduling.
mod chat;
mod fetch;
mod persist;
mod publisher;
mod reconciler;
mod scheduler;
mod store;
mod types;

pub use chat::{embed_payload, ChatTarget, DiscordChatTarget, DiscordSettings};
pub use fetch::{parse_roster, FetchSettings, ReqwestRosterSource, RosterSource};
pub use persist::{ensure_data_dir, AtomicFileWriter, PersistError};
pub use publisher::{PublishOutcome, Publisher};
pub use reconciler::{AdminError, Collaborators, CycleOutcome, ReconcileSettings, Reconciler};
pub use scheduler::{Scheduler, SchedulerHandle};
pub use store::{
    JsonMessageRefStore, JsonWatchlistStore, MessageRefStore, WatchlistStore,
    MESSAGE_REF_FILENAME, WATCHLIST_FILENAME,
};
pub use types::{FailureKind, FetchError};
