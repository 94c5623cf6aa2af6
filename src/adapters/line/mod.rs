//! LINE platform adapters.
//!
//! - `client` - Messaging API reply/push/content fetch
//! - `flex` - outbound prompt rendering
//! - `signature` - webhook signature verification
//! - `webhook` - inbound payload types

mod client;
pub mod flex;
mod signature;
mod webhook;

pub use client::{LineClientConfig, LineMessagingClient, MAX_MESSAGES_PER_REQUEST};
pub use signature::{SignatureError, SignatureVerifier, SIGNATURE_HEADER};
pub use webhook::{ChatEvent, EventSource, MessageContent, PostbackContent, WebhookEnvelope, WebhookEvent};
