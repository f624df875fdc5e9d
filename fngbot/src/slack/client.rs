//! Thin async client for the Slack Web API methods the bot uses.
//!
//! Wraps `reqwest::Client`; the bot token and API base come from the
//! per-request [`Config`].

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::CollaboratorError;
use crate::services::ChatPlatform;
use crate::slack::views;

/// Generic Slack API response envelope.
#[derive(Debug, Deserialize)]
struct SlackApiResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

/// Slack Web API client.
#[derive(Debug, Clone)]
pub struct SlackClient {
    http: reqwest::Client,
}

impl SlackClient {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// POST a JSON body to a Web API method and check the `ok` flag.
    async fn call_api(
        &self,
        config: &Config,
        api_method: &str,
        body: &Value,
    ) -> Result<(), CollaboratorError> {
        let url = format!(
            "{}/{}",
            config.slack_api_base.trim_end_matches('/'),
            api_method
        );

        let response = self
            .http
            .post(&url)
            .bearer_auth(&config.slack_api_key)
            .header("Pragma", "No-Cache")
            .header("Cache-Control", "private, no-cache, no-store, must-revalidate")
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        debug!(api_method, status = status.as_u16(), body = %text, "slack_api_response");

        if !status.is_success() {
            return Err(CollaboratorError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let parsed: SlackApiResponse = serde_json::from_str(&text)?;
        if !parsed.ok {
            let code = parsed.error.unwrap_or_else(|| "unknown_error".to_string());
            return Err(CollaboratorError::Api {
                message: format!("{} failed", api_method),
                code,
            });
        }

        Ok(())
    }
}

#[async_trait]
impl ChatPlatform for SlackClient {
    async fn open_form(&self, config: &Config, trigger_id: &str) -> Result<(), CollaboratorError> {
        info!(trigger_id = %trigger_id, "slack_open_form");
        self.call_api(config, "views.open", &views::invite_form(trigger_id))
            .await
    }

    async fn post_message(&self, config: &Config, channel: &str, text: &str) -> bool {
        let body = json!({"channel": channel, "text": text});

        match self.call_api(config, "chat.postMessage", &body).await {
            Ok(()) => {
                info!(channel = %channel, "slack_message_posted");
                true
            }
            Err(e) => {
                warn!(channel = %channel, error = %e, "slack_message_failed");
                false
            }
        }
    }
}
