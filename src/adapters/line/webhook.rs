//! LINE webhook payload types.
//!
//! Only the fields the recording workflow consumes are modelled; unknown
//! event and message kinds deserialize into catch-all variants so one new
//! platform feature never fails a whole delivery.

use serde::Deserialize;

use crate::domain::conversation::InboundEvent;
use crate::domain::foundation::LineUserId;

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEnvelope {
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub events: Vec<WebhookEvent>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum WebhookEvent {
    Message {
        #[serde(rename = "replyToken")]
        reply_token: String,
        source: EventSource,
        message: MessageContent,
    },
    Postback {
        #[serde(rename = "replyToken")]
        reply_token: String,
        source: EventSource,
        postback: PostbackContent,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventSource {
    #[serde(rename = "userId", default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum MessageContent {
    Text { id: String, text: String },
    Image { id: String },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostbackContent {
    pub data: String,
}

/// A webhook event reduced to what the recording workflow needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEvent {
    pub line_user_id: LineUserId,
    pub reply_token: String,
    pub event: InboundEvent,
}

impl WebhookEvent {
    /// Maps a platform event to a chat event.
    ///
    /// Returns `None` for event kinds the workflow does not handle and for
    /// events without a user source (group or room without user id).
    pub fn into_chat_event(self) -> Option<ChatEvent> {
        let (reply_token, source, event) = match self {
            WebhookEvent::Message {
                reply_token,
                source,
                message,
            } => {
                let event = match message {
                    MessageContent::Text { text, .. } => InboundEvent::text(text),
                    MessageContent::Image { id } => InboundEvent::image(id),
                    MessageContent::Other => InboundEvent::Unsupported,
                };
                (reply_token, source, event)
            }
            WebhookEvent::Postback {
                reply_token,
                source,
                postback,
            } => (reply_token, source, InboundEvent::postback(&postback.data)),
            WebhookEvent::Other => return None,
        };

        let line_user_id = source.user_id.and_then(|id| LineUserId::new(id).ok())?;
        Some(ChatEvent {
            line_user_id,
            reply_token,
            event,
        })
    }
}
