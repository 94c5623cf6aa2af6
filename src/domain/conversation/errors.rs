//! Recording workflow errors.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, SessionId, ValidationError};

/// Errors surfaced by the recording workflow and related handlers.
#[derive(Debug, Clone, Error)]
pub enum RecordingError {
    /// Chat identity has no member record.
    #[error("LINE user is not a member of any family space")]
    Unregistered,

    /// The event is not valid in the conversation's current state.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Cooking session not found: {0}")]
    SessionNotFound(SessionId),

    #[error("Validation failed for '{field}': {message}")]
    Validation { field: String, message: String },

    /// Another event for the same user is being processed.
    #[error("Conversation is busy, try again")]
    Busy,

    #[error("Permission denied")]
    Forbidden,

    #[error("Infrastructure error: {0}")]
    Infrastructure(String),
}

impl RecordingError {
    pub fn invalid_state(message: impl Into<String>) -> Self {
        RecordingError::InvalidState(message.into())
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        RecordingError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        RecordingError::Infrastructure(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            RecordingError::Unregistered => ErrorCode::MemberNotFound,
            RecordingError::InvalidState(_) => ErrorCode::InvalidStateTransition,
            RecordingError::SessionNotFound(_) => ErrorCode::SessionNotFound,
            RecordingError::Validation { .. } => ErrorCode::ValidationFailed,
            RecordingError::Busy => ErrorCode::LockUnavailable,
            RecordingError::Forbidden => ErrorCode::Forbidden,
            RecordingError::Infrastructure(_) => ErrorCode::InternalError,
        }
    }
}

impl From<DomainError> for RecordingError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::MemberNotFound => RecordingError::Unregistered,
            ErrorCode::InvalidStateTransition | ErrorCode::ConcurrentModification => {
                RecordingError::InvalidState(err.message)
            }
            ErrorCode::LockUnavailable => RecordingError::Busy,
            ErrorCode::Forbidden | ErrorCode::Unauthorized => RecordingError::Forbidden,
            ErrorCode::ValidationFailed
            | ErrorCode::EmptyField
            | ErrorCode::OutOfRange
            | ErrorCode::InvalidFormat => RecordingError::Validation {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            _ => RecordingError::Infrastructure(err.to_string()),
        }
    }
}

impl From<ValidationError> for RecordingError {
    fn from(err: ValidationError) -> Self {
        let field = match &err {
            ValidationError::EmptyField { field }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::InvalidFormat { field, .. } => field.clone(),
        };
        RecordingError::Validation {
            field,
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lock_failure_maps_to_busy() {
        let err: RecordingError =
            DomainError::new(ErrorCode::LockUnavailable, "lease held").into();
        assert!(matches!(err, RecordingError::Busy));
        assert_eq!(err.code(), ErrorCode::LockUnavailable);
    }

    #[test]
    fn version_conflict_maps_to_invalid_state() {
        let err: RecordingError =
            DomainError::new(ErrorCode::ConcurrentModification, "stale version").into();
        assert!(matches!(err, RecordingError::InvalidState(_)));
    }

    #[test]
    fn database_error_maps_to_infrastructure() {
        let err: RecordingError = DomainError::database("connection reset").into();
        assert!(matches!(err, RecordingError::Infrastructure(_)));
    }

    #[test]
    fn validation_error_keeps_field() {
        let err: RecordingError = ValidationError::empty_field("session_id").into();
        match err {
            RecordingError::Validation { field, .. } => assert_eq!(field, "session_id"),
            other => panic!("unexpected {:?}", other),
        }
    }
}
