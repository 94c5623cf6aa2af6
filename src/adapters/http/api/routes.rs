//! Axum router configuration for the JSON API.

use axum::{
    routing::{get, post},
    Router,
};

use super::super::state::AppState;
use super::handlers::{
    admit_line_member, get_liff_session, get_recipe, post_comment, submit_seasonings,
};

/// Create the API router, mounted at `/api`.
///
/// # Routes
///
/// ## Mini-app
/// - `GET /liff/sessions/:id` - seasoning candidates for the session
/// - `POST /liff/seasonings` - multi-select submission
///
/// ## Web
/// - `GET /sessions/:id` - recorded recipe
/// - `POST /comments` - question to the cook
///
/// ## Platform hooks
/// - `POST /members/line` - link a redeemed invitation to a conversation
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/liff/sessions/:id", get(get_liff_session))
        .route("/liff/seasonings", post(submit_seasonings))
        .route("/sessions/:id", get(get_recipe))
        .route("/comments", post(post_comment))
        .route("/members/line", post(admit_line_member))
}
