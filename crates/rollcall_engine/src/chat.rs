use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use rollcall_core::{ChatFailure, MessageRef, RenderedReport};
use rollcall_logging::rollcall_trace;
use serde::Deserialize;
use serde_json::{json, Value};

/// Where the report message lives.
#[async_trait::async_trait]
pub trait ChatTarget: Send + Sync {
    async fn create(&self, content: &RenderedReport) -> Result<MessageRef, ChatFailure>;

    /// Fetches `message_ref` and replaces its content.
    async fn fetch_and_edit(
        &self,
        message_ref: MessageRef,
        content: &RenderedReport,
    ) -> Result<(), ChatFailure>;
}

#[derive(Debug, Clone)]
pub struct DiscordSettings {
    pub api_base: String,
    pub token: String,
    pub channel_id: u64,
    pub request_timeout: Duration,
}

impl DiscordSettings {
    pub fn new(token: impl Into<String>, channel_id: u64) -> Self {
        Self {
            api_base: "https://discord.com/api/v10".to_string(),
            token: token.into(),
            channel_id,
            request_timeout: Duration::from_secs(10),
        }
    }
}

/// Posts and edits the report as a single embed through the Discord REST API.
#[derive(Debug, Clone)]
pub struct DiscordChatTarget {
    settings: DiscordSettings,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct PostedMessage {
    id: String,
}

impl DiscordChatTarget {
    pub fn new(settings: DiscordSettings) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(settings.request_timeout)
            .build()?;
        Ok(Self { settings, client })
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/channels/{}/messages",
            self.settings.api_base.trim_end_matches('/'),
            self.settings.channel_id
        )
    }

    fn message_url(&self, message_ref: MessageRef) -> String {
        format!("{}/{}", self.messages_url(), message_ref.get())
    }

    async fn send(
        &self,
        method: Method,
        url: String,
        body: Option<&Value>,
    ) -> Result<Vec<u8>, ChatFailure> {
        rollcall_trace!("Discord {} {}", method, url);
        let mut request = self
            .client
            .request(method, url)
            .header(AUTHORIZATION, format!("Bot {}", self.settings.token));
        if let Some(body) = body {
            let bytes =
                serde_json::to_vec(body).map_err(|err| ChatFailure::Other(err.to_string()))?;
            request = request.header(CONTENT_TYPE, "application/json").body(bytes);
        }

        let response = request
            .send()
            .await
            .map_err(|err| ChatFailure::Other(err.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(classify_status(status));
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|err| ChatFailure::Other(err.to_string()))?;
        Ok(bytes.to_vec())
    }
}

#[async_trait::async_trait]
impl ChatTarget for DiscordChatTarget {
    async fn create(&self, content: &RenderedReport) -> Result<MessageRef, ChatFailure> {
        let body = embed_payload(content);
        let bytes = self
            .send(Method::POST, self.messages_url(), Some(&body))
            .await?;
        let posted: PostedMessage = serde_json::from_slice(&bytes)
            .map_err(|err| ChatFailure::Other(format!("unreadable message reply: {err}")))?;
        posted
            .id
            .parse::<u64>()
            .map(MessageRef::new)
            .map_err(|err| ChatFailure::Other(format!("bad message id {:?}: {err}", posted.id)))
    }

    async fn fetch_and_edit(
        &self,
        message_ref: MessageRef,
        content: &RenderedReport,
    ) -> Result<(), ChatFailure> {
        self.send(Method::GET, self.message_url(message_ref), None)
            .await?;
        let body = embed_payload(content);
        self.send(Method::PATCH, self.message_url(message_ref), Some(&body))
            .await?;
        Ok(())
    }
}

fn classify_status(status: StatusCode) -> ChatFailure {
    match status {
        StatusCode::NOT_FOUND => ChatFailure::NotFound,
        StatusCode::FORBIDDEN => ChatFailure::Forbidden,
        other => ChatFailure::Other(format!("http status {}", other.as_u16())),
    }
}

/// Message body carrying the report as one embed.
pub fn embed_payload(content: &RenderedReport) -> Value {
    let fields: Vec<Value> = content
        .fields
        .iter()
        .map(|field| {
            json!({
                "name": field.name,
                "value": field.value,
                "inline": false,
            })
        })
        .collect();

    let mut embed = json!({
        "title": content.title,
        "description": content.description,
        "color": content.color.rgb(),
        "fields": fields,
    });
    if let Some(footer) = &content.footer {
        embed["footer"] = json!({ "text": footer });
    }
    json!({ "embeds": [embed] })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rollcall_core::{ReportColor, ReportField};

    #[test]
    fn payload_wraps_a_single_embed() {
        let content = RenderedReport {
            title: "T".to_string(),
            description: "D".to_string(),
            color: ReportColor::Red,
            fields: vec![ReportField {
                name: "n".to_string(),
                value: "v".to_string(),
            }],
            footer: Some("f".to_string()),
            generated_at: chrono::Utc::now(),
        };
        let payload = embed_payload(&content);
        assert_eq!(payload["embeds"].as_array().map(Vec::len), Some(1));
        assert_eq!(payload["embeds"][0]["color"], 0xe74c3c);
        assert_eq!(payload["embeds"][0]["fields"][0]["value"], "v");
        assert_eq!(payload["embeds"][0]["footer"]["text"], "f");
    }

    #[test]
    fn statuses_are_classified() {
        assert_eq!(classify_status(StatusCode::NOT_FOUND), ChatFailure::NotFound);
        assert_eq!(classify_status(StatusCode::FORBIDDEN), ChatFailure::Forbidden);
        assert_eq!(
            classify_status(StatusCode::TOO_MANY_REQUESTS),
            ChatFailure::Other("http status 429".to_string())
        );
    }
}
