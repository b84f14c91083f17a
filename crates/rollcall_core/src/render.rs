use chrono::{DateTime, SecondsFormat, Utc};

use crate::report::{Report, ReportOutcome};

/// Platform-neutral message content built from a [`Report`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedReport {
    pub title: String,
    pub description: String,
    pub color: ReportColor,
    pub fields: Vec<ReportField>,
    pub footer: Option<String>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportField {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportColor {
    Blue,
    Orange,
    Red,
}

impl ReportColor {
    pub fn rgb(self) -> u32 {
        match self {
            ReportColor::Blue => 0x3498db,
            ReportColor::Orange => 0xe67e22,
            ReportColor::Red => 0xe74c3c,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub server_label: String,
    /// Adds the "just started" field to the first report after boot.
    pub first_run: bool,
}

pub const FIELD_UPDATED: &str = "⏰ Updated";
pub const FIELD_WATCHLIST: &str = "📋 Watchlist";
pub const FIELD_ONLINE_COUNT: &str = "✅ Online";
pub const FIELD_OFFLINE_COUNT: &str = "❌ Offline";
pub const FIELD_ONLINE_LIST: &str = "🟢 Online players";
pub const FIELD_OFFLINE_LIST: &str = "🔴 Offline players";
pub const FIELD_BOT_STATUS: &str = "🚀 Bot status";

pub fn render(report: &Report, options: &RenderOptions) -> RenderedReport {
    let updated = field(
        FIELD_UPDATED,
        format!("<t:{}:R>", report.generated_at.timestamp()),
    );

    let mut rendered = match &report.outcome {
        ReportOutcome::EmptyWatchlist => RenderedReport {
            title: "ℹ️ Watchlist is empty".to_string(),
            description: "No players are being watched yet. Use `add` to watch a player."
                .to_string(),
            color: ReportColor::Orange,
            fields: vec![updated],
            footer: None,
            generated_at: report.generated_at,
        },
        ReportOutcome::FetchFailed { reason } => RenderedReport {
            title: "❌ Something went wrong".to_string(),
            description: format!(
                "Could not reach the {} player list.\n`{reason}`",
                options.server_label
            ),
            color: ReportColor::Red,
            fields: vec![updated],
            footer: None,
            generated_at: report.generated_at,
        },
        ReportOutcome::Normal(summary) => {
            let present_list = if summary.present_list.is_empty() {
                "No watched players are online right now.".to_string()
            } else {
                summary.present_list.clone()
            };
            let absent_list = if summary.absent_list.is_empty() {
                "Everyone is online!".to_string()
            } else {
                summary.absent_list.clone()
            };
            RenderedReport {
                title: format!("Player status report ({})", options.server_label),
                description: "Status of the watched players.".to_string(),
                color: ReportColor::Blue,
                fields: vec![
                    updated,
                    field(
                        FIELD_WATCHLIST,
                        format!("{} / {} players", report.watch_count, report.capacity),
                    ),
                    field(
                        FIELD_ONLINE_COUNT,
                        format!("{} players", summary.present_count),
                    ),
                    field(
                        FIELD_OFFLINE_COUNT,
                        format!("{} players", summary.absent_count),
                    ),
                    field(FIELD_ONLINE_LIST, present_list),
                    field(FIELD_OFFLINE_LIST, absent_list),
                ],
                footer: Some(format!("{} · auto-check", options.server_label)),
                generated_at: report.generated_at,
            }
        }
    };

    if options.first_run {
        rendered.fields.push(field(
            FIELD_BOT_STATUS,
            "Started / restarted successfully".to_string(),
        ));
    }
    rendered
}

impl RenderedReport {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }

    /// Terminal-friendly rendering for on-demand checks.
    ///
    /// Chat timestamp markup is replaced by the RFC 3339 generation time.
    pub fn to_plain_text(&self) -> String {
        let mut out = format!("{}\n{}\n", self.title, self.description);
        for f in &self.fields {
            let value = if f.name == FIELD_UPDATED {
                self.generated_at.to_rfc3339_opts(SecondsFormat::Secs, true)
            } else {
                f.value.clone()
            };
            out.push_str(&format!("\n{}\n{}\n", f.name, value));
        }
        if let Some(footer) = &self.footer {
            out.push_str(&format!("\n{footer}\n"));
        }
        out
    }
}

fn field(name: &str, value: String) -> ReportField {
    ReportField {
        name: name.to_string(),
        value,
    }
}
