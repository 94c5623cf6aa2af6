//! `POST /webhooks/line` - LINE webhook deliveries.
//!
//! The signature is checked against the raw body before anything is parsed.
//! Events are handled one by one; a failing event is logged and never stops
//! the rest of the delivery.

use axum::body::Bytes;
use axum::extract::{Json, State};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::Router;
use serde_json::json;

use crate::adapters::line::{WebhookEnvelope, SIGNATURE_HEADER};
use crate::application::handlers::HandleChatEventCommand;
use crate::domain::foundation::CommandMetadata;

use super::error::ApiError;
use super::state::AppState;

pub fn webhook_routes() -> Router<AppState> {
    Router::new().route("/webhooks/line", post(handle_line_webhook))
}

pub async fn handle_line_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok());
    if let Err(e) = state.signature_verifier.verify(&body, signature) {
        tracing::warn!(error = %e, "Rejected webhook delivery");
        return Err(ApiError::InvalidSignature);
    }

    let envelope: WebhookEnvelope = serde_json::from_slice(&body)
        .map_err(|e| ApiError::bad_request(format!("Malformed webhook body: {}", e)))?;

    let handler = state.handle_chat_event_handler();
    let total = envelope.events.len();
    let mut handled = 0;
    for event in envelope.events {
        let Some(chat) = event.into_chat_event() else {
            continue;
        };
        let cmd = HandleChatEventCommand {
            line_user_id: chat.line_user_id,
            reply_token: chat.reply_token,
            event: chat.event,
        };
        let metadata = CommandMetadata::platform().with_source("webhook");
        // Failures are already logged with the conversation context.
        if handler.handle(cmd, metadata).await.is_ok() {
            handled += 1;
        }
    }

    tracing::debug!(total, handled, "Webhook delivery processed");
    Ok(Json(json!({ "success": true })))
}
