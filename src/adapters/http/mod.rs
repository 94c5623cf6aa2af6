//! HTTP adapters - REST API implementations.
//!
//! - `webhook` - LINE webhook deliveries
//! - `api` - mini-app and web JSON endpoints
//! - `photos` - signed photo links

pub mod api;
mod error;
mod photos;
mod state;
mod webhook;

use axum::extract::Json;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use serde_json::json;

pub use error::{ApiError, ErrorResponse};
pub use state::AppState;

/// GET /health
pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// Create the complete application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(webhook::webhook_routes())
        .merge(photos::photo_routes())
        .nest("/api", api::api_routes())
        .with_state(state)
}
