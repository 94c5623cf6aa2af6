//! PostgreSQL implementation of SessionSeasoningRepository.

use async_trait::async_trait;
use sqlx::PgPool;

use super::{column, corrupt, db_error};
use crate::domain::catalog::SlotClassification;
use crate::domain::cooking::SessionSeasoning;
use crate::domain::foundation::{
    DomainError, SeasoningId, SessionId, SessionSeasoningId, Timestamp,
};
use crate::ports::SessionSeasoningRepository;

/// Relies on `UNIQUE (session_id, seasoning_id)`: a redelivered insert
/// hits `ON CONFLICT DO NOTHING` and reports `false`.
#[derive(Clone)]
pub struct PostgresSessionSeasoningRepository {
    pool: PgPool,
}

impl PostgresSessionSeasoningRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionSeasoningRepository for PostgresSessionSeasoningRepository {
    async fn insert_if_absent(&self, record: &SessionSeasoning) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            INSERT INTO session_seasonings (
                id, session_id, seasoning_id, photo_path, is_slot_a, is_slot_b, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (session_id, seasoning_id) DO NOTHING
            "#,
        )
        .bind(record.id().as_uuid())
        .bind(record.session_id().as_uuid())
        .bind(record.seasoning_id().as_str())
        .bind(record.photo_path())
        .bind(record.is_slot_a())
        .bind(record.is_slot_b())
        .bind(record.created_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to insert session seasoning"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_by_session(
        &self,
        session_id: &SessionId,
    ) -> Result<Vec<SessionSeasoning>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, session_id, seasoning_id, photo_path, is_slot_a, is_slot_b, created_at
            FROM session_seasonings
            WHERE session_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(session_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to fetch session seasonings"))?;

        rows.iter()
            .map(|row| {
                let id: uuid::Uuid = column(row, "id")?;
                let session: uuid::Uuid = column(row, "session_id")?;
                let seasoning: String = column(row, "seasoning_id")?;
                let photo_path: Option<String> = column(row, "photo_path")?;
                let is_slot_a: bool = column(row, "is_slot_a")?;
                let is_slot_b: bool = column(row, "is_slot_b")?;
                let created_at: chrono::DateTime<chrono::Utc> = column(row, "created_at")?;
                Ok(SessionSeasoning::reconstitute(
                    SessionSeasoningId::from_uuid(id),
                    SessionId::from_uuid(session),
                    SeasoningId::new(seasoning).map_err(|e| corrupt("seasoning_id", e))?,
                    photo_path,
                    SlotClassification {
                        is_slot_a,
                        is_slot_b,
                    },
                    Timestamp::from_datetime(created_at),
                ))
            })
            .collect()
    }
}
