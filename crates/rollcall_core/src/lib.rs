//! Rollcall core: name matching, report building and the pure publisher state machine.
mod effect;
mod matcher;
mod msg;
mod normalize;
mod render;
mod report;
mod state;
mod update;
mod watchlist;

/// A player name as typed by an operator, e.g. `"[86] John Doe"`.
pub type WatchEntry = String;

/// A player name as reported by the game server roster.
pub type OnlinePlayer = String;

pub use effect::{Effect, PublishWarning};
pub use matcher::{match_roster, MatchResult};
pub use msg::{ChatFailure, Msg};
pub use normalize::{base_identity, normalize, NameKeys};
pub use render::{
    render, RenderOptions, RenderedReport, ReportColor, ReportField, FIELD_BOT_STATUS,
    FIELD_OFFLINE_COUNT, FIELD_OFFLINE_LIST, FIELD_ONLINE_COUNT, FIELD_ONLINE_LIST,
    FIELD_UPDATED, FIELD_WATCHLIST,
};
pub use report::{
    bullet_list, Report, ReportKind, ReportOutcome, RosterSummary, LIST_BUDGET,
    TRUNCATION_MARKER,
};
pub use state::{MessageRef, PublishPhase, PublisherState};
pub use update::update;
pub use watchlist::{add_entry, remove_entry, render_listing, WatchlistError};
