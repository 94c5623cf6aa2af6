//! HTTP error mapping shared by every endpoint.

use axum::extract::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};

use crate::domain::conversation::RecordingError;
use crate::domain::foundation::DomainError;
use crate::ports::StorageError;

/// Standard error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub error_code: String,
    /// Human-readable error message.
    pub message: String,
    /// Additional details (optional).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(
        error_code: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
            details: Some(details),
        }
    }
}

/// API error type that converts application errors to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    Recording(RecordingError),
    Storage(StorageError),
    InvalidSignature,
    BadRequest(String),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }
}

impl From<RecordingError> for ApiError {
    fn from(err: RecordingError) -> Self {
        ApiError::Recording(err)
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::Recording(err.into())
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        ApiError::Storage(err)
    }
}

fn recording_status(err: &RecordingError) -> StatusCode {
    match err {
        RecordingError::Validation { .. } => StatusCode::BAD_REQUEST,
        RecordingError::SessionNotFound(_) | RecordingError::Unregistered => {
            StatusCode::NOT_FOUND
        }
        RecordingError::InvalidState(_) => StatusCode::CONFLICT,
        RecordingError::Forbidden => StatusCode::FORBIDDEN,
        RecordingError::Busy => StatusCode::SERVICE_UNAVAILABLE,
        RecordingError::Infrastructure(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match &self {
            ApiError::Recording(err) => {
                let status = recording_status(err);
                let body = match err {
                    RecordingError::Validation { field, message } => ErrorResponse::with_details(
                        err.code().to_string(),
                        message.clone(),
                        serde_json::json!({ "field": field }),
                    ),
                    // Internal details stay in the logs.
                    RecordingError::Infrastructure(detail) => {
                        tracing::error!(error = %detail, "Request failed");
                        ErrorResponse::new(err.code().to_string(), "Internal server error")
                    }
                    _ => ErrorResponse::new(err.code().to_string(), err.to_string()),
                };
                (status, body)
            }
            ApiError::Storage(err) => {
                let (status, code) = match err {
                    StorageError::NotFound(_) => (StatusCode::NOT_FOUND, "PHOTO_NOT_FOUND"),
                    StorageError::InvalidPath(_) => (StatusCode::BAD_REQUEST, "INVALID_PATH"),
                    StorageError::InvalidSignature => {
                        (StatusCode::FORBIDDEN, "INVALID_SIGNATURE")
                    }
                    StorageError::Expired => (StatusCode::FORBIDDEN, "URL_EXPIRED"),
                    StorageError::Io(detail) => {
                        tracing::error!(error = %detail, "Photo storage failed");
                        (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR")
                    }
                };
                (status, ErrorResponse::new(code, err.to_string()))
            }
            ApiError::InvalidSignature => (
                StatusCode::UNAUTHORIZED,
                ErrorResponse::new("INVALID_SIGNATURE", "Webhook signature verification failed"),
            ),
            ApiError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("BAD_REQUEST", message.clone()),
            ),
        };
        (status, Json(body)).into_response()
    }
}
