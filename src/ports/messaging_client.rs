//! Outbound chat messaging port.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::conversation::OutboundMessage;
use crate::domain::foundation::LineUserId;

/// Errors raised by the messaging platform client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagingError {
    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Platform returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Content not found: {0}")]
    ContentNotFound(String),

    #[error("Content exceeds {limit} bytes")]
    ContentTooLarge { limit: usize },
}

/// Send/receive primitives of the chat platform.
#[async_trait]
pub trait MessagingClient: Send + Sync {
    /// Answer an inbound event using its one-shot reply token.
    async fn reply(
        &self,
        reply_token: &str,
        messages: &[OutboundMessage],
    ) -> Result<(), MessagingError>;

    /// Send out-of-band to a user.
    async fn push(&self, to: &LineUserId, messages: &[OutboundMessage])
        -> Result<(), MessagingError>;

    /// Download the binary content of an uploaded message (image).
    async fn fetch_content(&self, message_id: &str) -> Result<Vec<u8>, MessagingError>;
}
