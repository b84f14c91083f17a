use chrono::{DateTime, Utc};

use crate::matcher::MatchResult;
use crate::WatchEntry;

/// Byte budget of one rendered name list, leaving room under a 1024-byte field limit.
pub const LIST_BUDGET: usize = 1020;

/// Appended on its own line when a list is cut short.
pub const TRUNCATION_MARKER: &str = "...";

/// Result of one reconciliation, ready to be rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    pub watch_count: usize,
    pub capacity: usize,
    pub outcome: ReportOutcome,
}

/// The three mutually exclusive ways a cycle can end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportOutcome {
    /// Nothing to watch; no fetch was performed.
    EmptyWatchlist,
    /// The roster fetch was attempted and produced no data.
    FetchFailed { reason: String },
    /// The roster was fetched and the watchlist partitioned.
    Normal(RosterSummary),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterSummary {
    pub present_count: usize,
    pub absent_count: usize,
    /// Bullet lines, truncated to the list budget. Empty when nobody is present.
    pub present_list: String,
    /// Bullet lines, truncated to the list budget. Empty when everybody is present.
    pub absent_list: String,
}

/// Payload-free discriminant of [`ReportOutcome`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    EmptyWatchlist,
    FetchFailed,
    Normal,
}

impl Report {
    pub fn empty_watchlist(capacity: usize, generated_at: DateTime<Utc>) -> Self {
        Self {
            generated_at,
            watch_count: 0,
            capacity,
            outcome: ReportOutcome::EmptyWatchlist,
        }
    }

    pub fn fetch_failed(
        watch_count: usize,
        capacity: usize,
        reason: impl Into<String>,
        generated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            generated_at,
            watch_count,
            capacity,
            outcome: ReportOutcome::FetchFailed {
                reason: reason.into(),
            },
        }
    }

    pub fn from_match(
        result: &MatchResult,
        capacity: usize,
        list_budget: usize,
        generated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            generated_at,
            watch_count: result.present.len() + result.absent.len(),
            capacity,
            outcome: ReportOutcome::Normal(RosterSummary {
                present_count: result.present.len(),
                absent_count: result.absent.len(),
                present_list: bullet_list(&result.present, list_budget),
                absent_list: bullet_list(&result.absent, list_budget),
            }),
        }
    }

    pub fn kind(&self) -> ReportKind {
        match self.outcome {
            ReportOutcome::EmptyWatchlist => ReportKind::EmptyWatchlist,
            ReportOutcome::FetchFailed { .. } => ReportKind::FetchFailed,
            ReportOutcome::Normal(_) => ReportKind::Normal,
        }
    }
}

/// Renders `• name` lines, keeping whole lines only while the result fits `budget` bytes.
///
/// When lines are dropped the marker takes their place on its own line, and the
/// output including the marker still fits the budget.
pub fn bullet_list(names: &[WatchEntry], budget: usize) -> String {
    let lines: Vec<String> = names.iter().map(|name| format!("• {name}")).collect();
    let full = lines.join("\n");
    if full.len() <= budget {
        return full;
    }
    if budget < TRUNCATION_MARKER.len() {
        return String::new();
    }

    let mut out = String::new();
    for line in &lines {
        let separator = usize::from(!out.is_empty());
        let with_line = out.len() + separator + line.len();
        if with_line + 1 + TRUNCATION_MARKER.len() > budget {
            break;
        }
        if separator == 1 {
            out.push('\n');
        }
        out.push_str(line);
    }

    if !out.is_empty() {
        out.push('\n');
    }
    out.push_str(TRUNCATION_MARKER);
    out
}
