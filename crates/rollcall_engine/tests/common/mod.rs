#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use rollcall_core::{ChatFailure, MessageRef, OnlinePlayer, RenderedReport, WatchEntry};
use rollcall_engine::{
    ChatTarget, Collaborators, FailureKind, FetchError, MessageRefStore, PersistError,
    ReconcileSettings, Reconciler, RosterSource, WatchlistStore,
};

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(rollcall_logging::initialize_for_tests);
}

pub fn names(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|n| n.to_string()).collect()
}

pub struct FakeRoster {
    result: Mutex<Result<Vec<OnlinePlayer>, FetchError>>,
    calls: AtomicUsize,
}

impl FakeRoster {
    pub fn online(raw: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            result: Mutex::new(Ok(names(raw))),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            result: Mutex::new(Err(FetchError {
                kind: FailureKind::Timeout,
                message: "deadline elapsed".to_string(),
            })),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl RosterSource for FakeRoster {
    async fn fetch(&self) -> Result<Vec<OnlinePlayer>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.lock().unwrap().clone()
    }
}

#[derive(Default)]
pub struct MemoryWatchlist {
    entries: Mutex<Vec<WatchEntry>>,
    saves: AtomicUsize,
}

impl MemoryWatchlist {
    pub fn with(raw: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            entries: Mutex::new(names(raw)),
            saves: AtomicUsize::new(0),
        })
    }

    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl WatchlistStore for MemoryWatchlist {
    fn load(&self) -> Vec<WatchEntry> {
        self.entries.lock().unwrap().clone()
    }

    fn save(&self, entries: &[WatchEntry]) -> Result<(), PersistError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        *self.entries.lock().unwrap() = entries.to_vec();
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryRefs {
    current: Mutex<Option<MessageRef>>,
    saves: AtomicUsize,
}

impl MemoryRefs {
    pub fn with(message_ref: Option<MessageRef>) -> Arc<Self> {
        Arc::new(Self {
            current: Mutex::new(message_ref),
            saves: AtomicUsize::new(0),
        })
    }

    pub fn current(&self) -> Option<MessageRef> {
        *self.current.lock().unwrap()
    }

    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl MessageRefStore for MemoryRefs {
    fn load(&self) -> Option<MessageRef> {
        self.current()
    }

    fn save(&self, message_ref: Option<MessageRef>) -> Result<(), PersistError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        *self.current.lock().unwrap() = message_ref;
        Ok(())
    }
}

#[derive(Default)]
struct ChatInner {
    next_id: u64,
    live: BTreeMap<u64, RenderedReport>,
    create_failure: Option<ChatFailure>,
    edit_failure: Option<ChatFailure>,
    latency: Option<Duration>,
    creates: usize,
    edits: usize,
}

/// Channel double: keeps live messages and can be told to fail.
#[derive(Default)]
pub struct FakeChat {
    inner: Mutex<ChatInner>,
}

impl FakeChat {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: Mutex::new(ChatInner {
                next_id: 1000,
                ..ChatInner::default()
            }),
        })
    }

    /// Seeds a live message, as if posted by an earlier run.
    pub fn seed(&self, id: u64, content: RenderedReport) {
        self.inner.lock().unwrap().live.insert(id, content);
    }

    pub fn delete(&self, message_ref: MessageRef) {
        self.inner.lock().unwrap().live.remove(&message_ref.get());
    }

    pub fn fail_creates(&self, failure: Option<ChatFailure>) {
        self.inner.lock().unwrap().create_failure = failure;
    }

    pub fn fail_edits(&self, failure: Option<ChatFailure>) {
        self.inner.lock().unwrap().edit_failure = failure;
    }

    /// Makes every call sleep first, so concurrent callers interleave.
    pub fn set_latency(&self, latency: Duration) {
        self.inner.lock().unwrap().latency = Some(latency);
    }

    async fn wait(&self) {
        let latency = self.inner.lock().unwrap().latency;
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
    }

    pub fn live(&self) -> Vec<(u64, RenderedReport)> {
        self.inner
            .lock()
            .unwrap()
            .live
            .iter()
            .map(|(id, content)| (*id, content.clone()))
            .collect()
    }

    pub fn creates(&self) -> usize {
        self.inner.lock().unwrap().creates
    }

    pub fn edits(&self) -> usize {
        self.inner.lock().unwrap().edits
    }
}

#[async_trait::async_trait]
impl ChatTarget for FakeChat {
    async fn create(&self, content: &RenderedReport) -> Result<MessageRef, ChatFailure> {
        self.wait().await;
        let mut inner = self.inner.lock().unwrap();
        if let Some(failure) = inner.create_failure.clone() {
            return Err(failure);
        }
        inner.creates += 1;
        inner.next_id += 1;
        let id = inner.next_id;
        inner.live.insert(id, content.clone());
        Ok(MessageRef::new(id))
    }

    async fn fetch_and_edit(
        &self,
        message_ref: MessageRef,
        content: &RenderedReport,
    ) -> Result<(), ChatFailure> {
        self.wait().await;
        let mut inner = self.inner.lock().unwrap();
        if let Some(failure) = inner.edit_failure.clone() {
            return Err(failure);
        }
        match inner.live.get_mut(&message_ref.get()) {
            Some(existing) => {
                *existing = content.clone();
                inner.edits += 1;
                Ok(())
            }
            None => Err(ChatFailure::NotFound),
        }
    }
}

pub struct Harness {
    pub roster: Arc<FakeRoster>,
    pub watchlist: Arc<MemoryWatchlist>,
    pub refs: Arc<MemoryRefs>,
    pub chat: Arc<FakeChat>,
    pub reconciler: Arc<Reconciler>,
}

pub fn harness(
    roster: Arc<FakeRoster>,
    watchlist: Arc<MemoryWatchlist>,
    refs: Arc<MemoryRefs>,
    chat: Arc<FakeChat>,
    capacity: usize,
) -> Harness {
    let reconciler = Arc::new(Reconciler::new(
        Collaborators {
            roster: roster.clone(),
            watchlist: watchlist.clone(),
            refs: refs.clone(),
            chat: chat.clone(),
        },
        ReconcileSettings::new(capacity, "One City"),
    ));
    Harness {
        roster,
        watchlist,
        refs,
        chat,
        reconciler,
    }
}
