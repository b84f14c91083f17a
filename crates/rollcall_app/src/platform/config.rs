use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(&'static str),
    #[error("{key} must be a positive whole number, got {value:?}")]
    NotANumber { key: &'static str, value: String },
}

/// Runtime settings, read from `ROLLCALL_*` environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bot_token: Option<String>,
    pub channel_id: Option<u64>,
    pub server_url: String,
    pub server_label: String,
    pub api_base: String,
    pub data_dir: PathBuf,
    pub interval: Duration,
    pub max_slots: usize,
    pub fetch_timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let channel_id = match get("ROLLCALL_CHANNEL_ID") {
            Some(raw) => Some(parse_positive("ROLLCALL_CHANNEL_ID", &raw)?),
            None => None,
        };
        let interval_minutes = match get("ROLLCALL_INTERVAL_MINUTES") {
            Some(raw) => parse_positive("ROLLCALL_INTERVAL_MINUTES", &raw)?,
            None => 15,
        };
        let max_slots = match get("ROLLCALL_MAX_SLOTS") {
            Some(raw) => parse_positive("ROLLCALL_MAX_SLOTS", &raw)?,
            None => 20,
        };
        let fetch_timeout_secs = match get("ROLLCALL_FETCH_TIMEOUT_SECS") {
            Some(raw) => parse_positive("ROLLCALL_FETCH_TIMEOUT_SECS", &raw)?,
            None => 10,
        };

        Ok(Self {
            bot_token: get("ROLLCALL_BOT_TOKEN"),
            channel_id,
            server_url: get("ROLLCALL_SERVER_URL")
                .unwrap_or_else(|| "http://127.0.0.1:30120/players.json".to_string()),
            server_label: get("ROLLCALL_SERVER_LABEL").unwrap_or_else(|| "Game Server".to_string()),
            api_base: get("ROLLCALL_API_BASE")
                .unwrap_or_else(|| "https://discord.com/api/v10".to_string()),
            data_dir: get("ROLLCALL_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./data")),
            interval: Duration::from_secs(interval_minutes * 60),
            max_slots: max_slots as usize,
            fetch_timeout: Duration::from_secs(fetch_timeout_secs),
        })
    }

    /// Token and channel, needed only when publishing.
    pub fn chat_credentials(&self) -> Result<(&str, u64), ConfigError> {
        let token = self
            .bot_token
            .as_deref()
            .ok_or(ConfigError::Missing("ROLLCALL_BOT_TOKEN"))?;
        let channel = self
            .channel_id
            .ok_or(ConfigError::Missing("ROLLCALL_CHANNEL_ID"))?;
        Ok((token, channel))
    }
}

fn parse_positive(key: &'static str, raw: &str) -> Result<u64, ConfigError> {
    match raw.parse::<u64>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(ConfigError::NotANumber {
            key,
            value: raw.to_string(),
        }),
    }
}
