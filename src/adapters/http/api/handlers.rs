//! HTTP handlers for the mini-app and web endpoints.
//!
//! These handlers connect Axum routes to application layer command/query handlers.

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::handlers::{
    AdmitLineMemberCommand, GetRecipeQuery, GetSeasoningOptionsQuery, PostCommentCommand,
    SubmitSeasoningsCommand,
};
use crate::domain::foundation::{CommandMetadata, SessionId};

use super::super::error::ApiError;
use super::super::state::AppState;
use super::dto::{
    AdmitMemberRequest, AdmitMemberResponse, PostCommentRequest, PostCommentResponse,
    SubmitSeasoningsRequest, SubmitSeasoningsResponse,
};

fn parse_session_id(raw: &str) -> Result<SessionId, ApiError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ApiError::bad_request("sessionId is required"));
    }
    raw.parse()
        .map_err(|_| ApiError::bad_request(format!("Invalid session id '{}'", raw)))
}

// ════════════════════════════════════════════════════════════════════════════════
// Mini-app
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/liff/sessions/:id - Seasoning candidates for the session's dish
pub async fn get_liff_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let query = GetSeasoningOptionsQuery {
        session_id: parse_session_id(&session_id)?,
    };
    let view = state.get_seasoning_options_handler().handle(query).await?;
    Ok(Json(view))
}

/// POST /api/liff/seasonings - Multi-select submission
pub async fn submit_seasonings(
    State(state): State<AppState>,
    Json(request): Json<SubmitSeasoningsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let session_id = parse_session_id(&request.session_id)?;
    let seasoning_ids = request
        .seasonings
        .ok_or_else(|| ApiError::bad_request("seasonings is required"))?;
    let cmd = SubmitSeasoningsCommand {
        session_id,
        seasoning_ids,
    };
    let metadata = CommandMetadata::platform().with_source("liff");

    let result = state.submit_seasonings_handler().handle(cmd, metadata).await?;

    Ok(Json(SubmitSeasoningsResponse::from(result)))
}

// ════════════════════════════════════════════════════════════════════════════════
// Web
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/comments - Ask the cook a question about a session
pub async fn post_comment(
    State(state): State<AppState>,
    Json(request): Json<PostCommentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = PostCommentCommand {
        session_id: request.session_id,
        content: request.content,
    };
    let metadata = CommandMetadata::member(request.member_id).with_source("api");

    let result = state.post_comment_handler().handle(cmd, metadata).await?;

    Ok((StatusCode::CREATED, Json(PostCommentResponse::from(result))))
}

/// GET /api/sessions/:id - Recorded recipe of a session
pub async fn get_recipe(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let query = GetRecipeQuery {
        session_id: parse_session_id(&session_id)?,
    };
    let recipe = state.get_recipe_handler().handle(query).await?;
    Ok(Json(recipe))
}

/// POST /api/members/line - Invitation redemption hook
pub async fn admit_line_member(
    State(state): State<AppState>,
    Json(request): Json<AdmitMemberRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = AdmitLineMemberCommand {
        member_id: request.member_id,
        line_user_id: request.line_user_id,
    };
    let metadata = CommandMetadata::platform().with_source("invitation");

    let conversation = state.admit_line_member_handler().handle(cmd, metadata).await?;

    Ok(Json(AdmitMemberResponse::from(conversation)))
}
