use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use rollcall_core::{
    match_roster, render, render_listing, RenderOptions, RenderedReport, Report, ReportKind,
    WatchEntry, WatchlistError, LIST_BUDGET,
};
use rollcall_logging::{rollcall_info, rollcall_warn};
use thiserror::Error;

use crate::chat::ChatTarget;
use crate::fetch::RosterSource;
use crate::persist::PersistError;
use crate::publisher::{PublishOutcome, Publisher};
use crate::store::{MessageRefStore, WatchlistStore};

#[derive(Debug, Clone)]
pub struct ReconcileSettings {
    /// Watchlist capacity, enforced when adding only.
    pub capacity: usize,
    pub list_budget: usize,
    pub server_label: String,
}

impl ReconcileSettings {
    pub fn new(capacity: usize, server_label: impl Into<String>) -> Self {
        Self {
            capacity,
            list_budget: LIST_BUDGET,
            server_label: server_label.into(),
        }
    }
}

/// The four collaborators a reconciler works against.
pub struct Collaborators {
    pub roster: Arc<dyn RosterSource>,
    pub watchlist: Arc<dyn WatchlistStore>,
    pub refs: Arc<dyn MessageRefStore>,
    pub chat: Arc<dyn ChatTarget>,
}

#[derive(Debug, Error)]
pub enum AdminError {
    #[error(transparent)]
    Watchlist(#[from] WatchlistError),
    #[error("could not save the watchlist: {0}")]
    Persist(#[from] PersistError),
}

/// Summary of one scheduled cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleOutcome {
    pub report: ReportKind,
    pub publish: PublishOutcome,
}

/// Reconciliation context: fetch, match, render and publish, plus the admin operations.
pub struct Reconciler {
    roster: Arc<dyn RosterSource>,
    watchlist: Arc<dyn WatchlistStore>,
    publisher: Publisher,
    settings: ReconcileSettings,
    watchlist_lock: Mutex<()>,
}

impl Reconciler {
    pub fn new(collaborators: Collaborators, settings: ReconcileSettings) -> Self {
        let publisher = Publisher::new(
            collaborators.chat,
            collaborators.refs,
            settings.server_label.clone(),
        );
        Self {
            roster: collaborators.roster,
            watchlist: collaborators.watchlist,
            publisher,
            settings,
            watchlist_lock: Mutex::new(()),
        }
    }

    pub fn settings(&self) -> &ReconcileSettings {
        &self.settings
    }

    pub fn publisher(&self) -> &Publisher {
        &self.publisher
    }

    /// One fetch → match → render → publish pass. Never fails.
    pub async fn run_cycle(&self, first_run: bool) -> CycleOutcome {
        let report = self.build_report().await;
        let publish = self.publisher.publish(&report, first_run).await;
        rollcall_info!(
            "Cycle finished report={:?} phase={:?} warnings={}",
            report.kind(),
            publish.phase,
            publish.warnings.len()
        );
        CycleOutcome {
            report: report.kind(),
            publish,
        }
    }

    /// On-demand check for a requester; leaves the published message alone.
    pub async fn manual_check(&self) -> RenderedReport {
        let report = self.build_report().await;
        render(
            &report,
            &RenderOptions {
                server_label: self.settings.server_label.clone(),
                first_run: false,
            },
        )
    }

    pub async fn build_report(&self) -> Report {
        let entries = self.list_entries();
        if entries.is_empty() {
            return Report::empty_watchlist(self.settings.capacity, Utc::now());
        }

        match self.roster.fetch().await {
            Ok(online) => {
                let result = match_roster(&entries, &online);
                rollcall_info!(
                    "Matched watchlist present={} absent={} online={}",
                    result.present.len(),
                    result.absent.len(),
                    online.len()
                );
                Report::from_match(
                    &result,
                    self.settings.capacity,
                    self.settings.list_budget,
                    Utc::now(),
                )
            }
            Err(err) => {
                rollcall_warn!("Roster fetch failed: {}", err);
                Report::fetch_failed(
                    entries.len(),
                    self.settings.capacity,
                    err.to_string(),
                    Utc::now(),
                )
            }
        }
    }

    pub fn list_entries(&self) -> Vec<WatchEntry> {
        let _guard = self.lock_watchlist();
        self.watchlist.load()
    }

    pub fn render_entries(&self) -> String {
        render_listing(&self.list_entries(), self.settings.capacity)
    }

    /// Adds `name` and returns the stored (trimmed) entry.
    pub fn add_entry(&self, name: &str) -> Result<WatchEntry, AdminError> {
        let _guard = self.lock_watchlist();
        let entries = self.watchlist.load();
        let next = rollcall_core::add_entry(&entries, name, self.settings.capacity)?;
        self.watchlist.save(&next)?;
        let added = next.last().cloned().unwrap_or_default();
        rollcall_info!("Added watchlist entry {:?}", added);
        Ok(added)
    }

    /// Removes the first entry matching `name` and returns it.
    pub fn remove_entry(&self, name: &str) -> Result<WatchEntry, AdminError> {
        let _guard = self.lock_watchlist();
        let entries = self.watchlist.load();
        let (remaining, removed) = rollcall_core::remove_entry(&entries, name)?;
        self.watchlist.save(&remaining)?;
        rollcall_info!("Removed watchlist entry {:?}", removed);
        Ok(removed)
    }

    fn lock_watchlist(&self) -> std::sync::MutexGuard<'_, ()> {
        self.watchlist_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
