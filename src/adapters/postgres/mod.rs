//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresConversationStateRepository` - versioned conversation cursor
//! - `PostgresCookingSessionRepository` - sessions plus history queries
//! - `PostgresCookingEventLog` - append-only action log
//! - `PostgresSessionSeasoningRepository` - idempotent seasoning records
//! - `PostgresCommentRepository` - session comments
//! - `PostgresMemberDirectory` - member lookups

mod comment_repository;
mod conversation_state_repository;
mod cooking_event_log;
mod cooking_session_repository;
mod member_directory;
mod session_seasoning_repository;

pub use comment_repository::PostgresCommentRepository;
pub use conversation_state_repository::PostgresConversationStateRepository;
pub use cooking_event_log::PostgresCookingEventLog;
pub use cooking_session_repository::PostgresCookingSessionRepository;
pub use member_directory::PostgresMemberDirectory;
pub use session_seasoning_repository::PostgresSessionSeasoningRepository;

use sqlx::postgres::PgRow;
use sqlx::{Postgres, Row};

use crate::domain::foundation::{DomainError, ErrorCode};

/// Maps a sqlx error into a `DatabaseError` prefixed with what was attempted.
fn db_error(context: &'static str) -> impl Fn(sqlx::Error) -> DomainError {
    move |e| DomainError::new(ErrorCode::DatabaseError, format!("{}: {}", context, e))
}

/// Reads a column, mapping decode failures into a `DatabaseError`.
fn column<'r, T>(row: &'r PgRow, name: &str) -> Result<T, DomainError>
where
    T: sqlx::Decode<'r, Postgres> + sqlx::Type<Postgres>,
{
    row.try_get(name).map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to get {}: {}", name, e),
        )
    })
}

/// Wraps a value-object parse failure of stored data into a `DatabaseError`.
fn corrupt(name: &str, err: impl std::fmt::Display) -> DomainError {
    DomainError::new(
        ErrorCode::DatabaseError,
        format!("Invalid {} in database: {}", name, err),
    )
}
