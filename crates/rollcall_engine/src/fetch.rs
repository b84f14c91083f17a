use std::time::Duration;

use futures_util::StreamExt;
use rollcall_core::OnlinePlayer;
use rollcall_logging::rollcall_debug;
use serde_json::Value;

use crate::{FailureKind, FetchError};

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
}

impl FetchSettings {
    pub fn for_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(10),
            max_bytes: 2 * 1024 * 1024,
        }
    }
}

/// Source of the names currently online on the game server.
#[async_trait::async_trait]
pub trait RosterSource: Send + Sync {
    /// Rows without a name are dropped before returning.
    async fn fetch(&self) -> Result<Vec<OnlinePlayer>, FetchError>;
}

/// Reads a FiveM-style `players.json` array over HTTP.
#[derive(Debug, Clone)]
pub struct ReqwestRosterSource {
    settings: FetchSettings,
    client: reqwest::Client,
}

impl ReqwestRosterSource {
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    pub fn settings(&self) -> &FetchSettings {
        &self.settings
    }
}

#[async_trait::async_trait]
impl RosterSource for ReqwestRosterSource {
    async fn fetch(&self) -> Result<Vec<OnlinePlayer>, FetchError> {
        let parsed = reqwest::Url::parse(&self.settings.url)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        if let Some(content_len) = response.content_length() {
            if content_len > self.settings.max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.settings.max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.settings.max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.settings.max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }

        // Servers often mislabel the content type, so the body is parsed regardless.
        let names = parse_roster(&bytes)?;
        rollcall_debug!(
            "Fetched roster url={} bytes={} online={}",
            self.settings.url,
            bytes.len(),
            names.len()
        );
        Ok(names)
    }
}

/// Extracts player names from a JSON array of roster rows.
pub fn parse_roster(body: &[u8]) -> Result<Vec<OnlinePlayer>, FetchError> {
    let rows: Vec<Value> = serde_json::from_slice(body)
        .map_err(|err| FetchError::new(FailureKind::Parse, err.to_string()))?;
    let total = rows.len();
    let names: Vec<OnlinePlayer> = rows
        .iter()
        .filter_map(|row| row.get("name").and_then(Value::as_str))
        .map(ToOwned::to_owned)
        .collect();
    if names.len() < total {
        rollcall_debug!("Dropped {} roster rows without a name", total - names.len());
    }
    Ok(names)
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}
