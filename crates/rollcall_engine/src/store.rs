use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rollcall_core::{MessageRef, WatchEntry};
use rollcall_logging::{rollcall_info, rollcall_warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::persist::{AtomicFileWriter, PersistError};

pub const WATCHLIST_FILENAME: &str = "watchlist.json";
pub const MESSAGE_REF_FILENAME: &str = "message_id.json";

/// Persisted, ordered watchlist.
pub trait WatchlistStore: Send + Sync {
    /// A missing or unreadable backing file loads as an empty list.
    fn load(&self) -> Vec<WatchEntry>;
    fn save(&self, entries: &[WatchEntry]) -> Result<(), PersistError>;
}

/// Persisted ref of the live report message.
pub trait MessageRefStore: Send + Sync {
    /// A missing or unreadable backing file loads as `None`.
    fn load(&self) -> Option<MessageRef>;
    fn save(&self, message_ref: Option<MessageRef>) -> Result<(), PersistError>;
}

/// `watchlist.json`: a JSON array of names.
#[derive(Debug, Clone)]
pub struct JsonWatchlistStore {
    writer: AtomicFileWriter,
}

impl JsonWatchlistStore {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            writer: AtomicFileWriter::new(data_dir),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.writer.dir().join(WATCHLIST_FILENAME)
    }
}

impl WatchlistStore for JsonWatchlistStore {
    fn load(&self) -> Vec<WatchEntry> {
        read_json::<Vec<WatchEntry>>(&self.path()).unwrap_or_default()
    }

    fn save(&self, entries: &[WatchEntry]) -> Result<(), PersistError> {
        let path = self.writer.write_json(WATCHLIST_FILENAME, entries)?;
        rollcall_info!("Saved {} watchlist entries to {:?}", entries.len(), path);
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct PersistedRef {
    last_message_id: Option<u64>,
}

/// `message_id.json`: `{"last_message_id": <id or null>}`.
#[derive(Debug, Clone)]
pub struct JsonMessageRefStore {
    writer: AtomicFileWriter,
}

impl JsonMessageRefStore {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            writer: AtomicFileWriter::new(data_dir),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.writer.dir().join(MESSAGE_REF_FILENAME)
    }
}

impl MessageRefStore for JsonMessageRefStore {
    fn load(&self) -> Option<MessageRef> {
        read_json::<PersistedRef>(&self.path())
            .and_then(|persisted| persisted.last_message_id)
            .map(MessageRef::new)
    }

    fn save(&self, message_ref: Option<MessageRef>) -> Result<(), PersistError> {
        let persisted = PersistedRef {
            last_message_id: message_ref.map(MessageRef::get),
        };
        self.writer.write_json(MESSAGE_REF_FILENAME, &persisted)?;
        Ok(())
    }
}

/// Reads a JSON file, treating a missing file as absent and a corrupt one as absent with a warning.
fn read_json<T: DeserializeOwned>(path: &Path) -> Option<T> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return None,
        Err(err) => {
            rollcall_warn!("Failed to read {:?}: {}", path, err);
            return None;
        }
    };

    match serde_json::from_str(&content) {
        Ok(value) => Some(value),
        Err(err) => {
            rollcall_warn!("Ignoring corrupt {:?}: {}", path, err);
            None
        }
    }
}
