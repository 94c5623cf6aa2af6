//! Recording messaging client for tests and local development.
//!
//! Captures every reply and push instead of calling the platform, serves
//! image content from a seeded map, and can be told to fail content fetches
//! or pushes to chosen recipients.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::conversation::OutboundMessage;
use crate::domain::foundation::LineUserId;
use crate::ports::{MessagingClient, MessagingError};

/// A captured outbound delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SentMessage {
    Reply {
        reply_token: String,
        messages: Vec<OutboundMessage>,
    },
    Push {
        to: LineUserId,
        messages: Vec<OutboundMessage>,
    },
}

impl SentMessage {
    pub fn messages(&self) -> &[OutboundMessage] {
        match self {
            SentMessage::Reply { messages, .. } | SentMessage::Push { messages, .. } => messages,
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    sent: Vec<SentMessage>,
    content: HashMap<String, Vec<u8>>,
    fail_content: bool,
    unreachable: HashSet<LineUserId>,
}

#[derive(Debug, Clone, Default)]
pub struct RecordingMessagingClient {
    inner: Arc<RwLock<Inner>>,
}

impl RecordingMessagingClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `fetch_content` return these bytes for the message id.
    pub async fn add_content(&self, message_id: impl Into<String>, bytes: Vec<u8>) {
        self.inner
            .write()
            .await
            .content
            .insert(message_id.into(), bytes);
    }

    /// Makes every content fetch fail with a transport error.
    pub async fn fail_content_fetches(&self, fail: bool) {
        self.inner.write().await.fail_content = fail;
    }

    /// Makes pushes to this user fail.
    pub async fn make_unreachable(&self, user: LineUserId) {
        self.inner.write().await.unreachable.insert(user);
    }

    pub async fn sent(&self) -> Vec<SentMessage> {
        self.inner.read().await.sent.clone()
    }

    /// Messages of the most recent delivery.
    pub async fn last_messages(&self) -> Vec<OutboundMessage> {
        self.inner
            .read()
            .await
            .sent
            .last()
            .map(|s| s.messages().to_vec())
            .unwrap_or_default()
    }

    pub async fn pushes_to(&self, user: &LineUserId) -> Vec<Vec<OutboundMessage>> {
        self.inner
            .read()
            .await
            .sent
            .iter()
            .filter_map(|s| match s {
                SentMessage::Push { to, messages } if to == user => Some(messages.clone()),
                _ => None,
            })
            .collect()
    }

    pub async fn clear(&self) {
        self.inner.write().await.sent.clear();
    }
}

#[async_trait]
impl MessagingClient for RecordingMessagingClient {
    async fn reply(
        &self,
        reply_token: &str,
        messages: &[OutboundMessage],
    ) -> Result<(), MessagingError> {
        self.inner.write().await.sent.push(SentMessage::Reply {
            reply_token: reply_token.to_string(),
            messages: messages.to_vec(),
        });
        Ok(())
    }

    async fn push(
        &self,
        to: &LineUserId,
        messages: &[OutboundMessage],
    ) -> Result<(), MessagingError> {
        let mut inner = self.inner.write().await;
        if inner.unreachable.contains(to) {
            return Err(MessagingError::Api {
                status: 400,
                message: format!("Failed to send to {}", to),
            });
        }
        inner.sent.push(SentMessage::Push {
            to: to.clone(),
            messages: messages.to_vec(),
        });
        Ok(())
    }

    async fn fetch_content(&self, message_id: &str) -> Result<Vec<u8>, MessagingError> {
        let inner = self.inner.read().await;
        if inner.fail_content {
            return Err(MessagingError::Transport("content fetch disabled".to_string()));
        }
        inner
            .content
            .get(message_id)
            .cloned()
            .ok_or_else(|| MessagingError::ContentNotFound(message_id.to_string()))
    }
}
