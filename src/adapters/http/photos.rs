//! `GET /photos/*path` - serves stored photos through signed links.

use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use serde::Deserialize;

use super::error::ApiError;
use super::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SignedPhotoQuery {
    pub expires: i64,
    pub signature: String,
}

pub fn photo_routes() -> Router<AppState> {
    Router::new().route("/photos/*path", get(get_photo))
}

pub async fn get_photo(
    State(state): State<AppState>,
    Path(path): Path<String>,
    Query(query): Query<SignedPhotoQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let bytes = state
        .workflow
        .ports()
        .photos
        .open_signed(&path, query.expires, &query.signature)
        .await
        .map_err(|e| {
            tracing::debug!(path = %path, error = %e, "Photo request refused");
            ApiError::from(e)
        })?;

    Ok((
        [
            (header::CONTENT_TYPE, "image/jpeg"),
            (header::CACHE_CONTROL, "private, max-age=300"),
        ],
        bytes,
    ))
}
