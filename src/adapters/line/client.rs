//! LINE Messaging API client.

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use std::time::Duration;

use super::flex;
use crate::domain::conversation::OutboundMessage;
use crate::domain::foundation::LineUserId;
use crate::ports::{MessagingClient, MessagingError};

/// The platform accepts at most five message objects per request.
pub const MAX_MESSAGES_PER_REQUEST: usize = 5;

/// Upper bound on downloaded image content.
pub const MAX_CONTENT_BYTES: usize = 10 * 1024 * 1024;

#[derive(Clone)]
pub struct LineClientConfig {
    pub channel_access_token: SecretString,
    /// Messaging API base, e.g. `https://api.line.me`.
    pub api_base_url: String,
    /// Content API base, e.g. `https://api-data.line.me`.
    pub data_api_base_url: String,
    pub timeout: Duration,
}

pub struct LineMessagingClient {
    config: LineClientConfig,
    client: Client,
}

impl LineMessagingClient {
    pub fn new(config: LineClientConfig) -> Result<Self, MessagingError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| MessagingError::Transport(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { config, client })
    }

    fn url(base: &str, path: &str) -> String {
        format!("{}{}", base.trim_end_matches('/'), path)
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.config.channel_access_token.expose_secret())
    }

    async fn post(&self, path: &str, body: serde_json::Value) -> Result<(), MessagingError> {
        let response = self
            .client
            .post(Self::url(&self.config.api_base_url, path))
            .header("Authorization", self.bearer())
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        check_status(response).await.map(|_| ())
    }
}

fn transport_error(e: reqwest::Error) -> MessagingError {
    if e.is_timeout() {
        MessagingError::Transport(format!("Request timed out: {}", e))
    } else if e.is_connect() {
        MessagingError::Transport(format!("Connection failed: {}", e))
    } else {
        MessagingError::Transport(e.to_string())
    }
}

async fn check_status(response: Response) -> Result<Response, MessagingError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(MessagingError::Api {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl MessagingClient for LineMessagingClient {
    async fn reply(
        &self,
        reply_token: &str,
        messages: &[OutboundMessage],
    ) -> Result<(), MessagingError> {
        // A reply token is single-use, so extra messages cannot be sent in a
        // second request.
        if messages.len() > MAX_MESSAGES_PER_REQUEST {
            tracing::warn!(
                count = messages.len(),
                "Reply exceeds platform message limit, truncating"
            );
        }
        let rendered = flex::render_all(&messages[..messages.len().min(MAX_MESSAGES_PER_REQUEST)]);
        self.post(
            "/v2/bot/message/reply",
            json!({ "replyToken": reply_token, "messages": rendered }),
        )
        .await
    }

    async fn push(
        &self,
        to: &LineUserId,
        messages: &[OutboundMessage],
    ) -> Result<(), MessagingError> {
        for chunk in messages.chunks(MAX_MESSAGES_PER_REQUEST) {
            self.post(
                "/v2/bot/message/push",
                json!({ "to": to.as_str(), "messages": flex::render_all(chunk) }),
            )
            .await?;
        }
        Ok(())
    }

    async fn fetch_content(&self, message_id: &str) -> Result<Vec<u8>, MessagingError> {
        let url = Self::url(
            &self.config.data_api_base_url,
            &format!("/v2/bot/message/{}/content", message_id),
        );
        let response = self
            .client
            .get(url)
            .header("Authorization", self.bearer())
            .send()
            .await
            .map_err(transport_error)?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(MessagingError::ContentNotFound(message_id.to_string()));
        }
        let response = check_status(response).await?;
        if response
            .content_length()
            .is_some_and(|len| len as usize > MAX_CONTENT_BYTES)
        {
            return Err(MessagingError::ContentTooLarge {
                limit: MAX_CONTENT_BYTES,
            });
        }

        let mut body = Vec::new();
        let mut chunks = response.bytes_stream();
        while let Some(chunk) = chunks.next().await {
            let chunk = chunk.map_err(transport_error)?;
            if body.len() + chunk.len() > MAX_CONTENT_BYTES {
                return Err(MessagingError::ContentTooLarge {
                    limit: MAX_CONTENT_BYTES,
                });
            }
            body.extend_from_slice(&chunk);
        }
        Ok(body)
    }
}

impl std::fmt::Debug for LineMessagingClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineMessagingClient")
            .field("api_base_url", &self.config.api_base_url)
            .field("data_api_base_url", &self.config.data_api_base_url)
            .finish_non_exhaustive()
    }
}
