//! PostgreSQL implementation of CookingEventLog.

use async_trait::async_trait;
use sqlx::PgPool;

use super::{column, corrupt, db_error};
use crate::domain::cooking::{CookingEvent, CookingEventKind};
use crate::domain::foundation::{CookingEventId, DomainError, SessionId, Timestamp};
use crate::ports::CookingEventLog;

#[derive(Clone)]
pub struct PostgresCookingEventLog {
    pool: PgPool,
}

impl PostgresCookingEventLog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CookingEventLog for PostgresCookingEventLog {
    async fn append(&self, event: &CookingEvent) -> Result<(), DomainError> {
        sqlx::query(
            "INSERT INTO cooking_events (id, session_id, event_type, created_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(event.id.as_uuid())
        .bind(event.session_id.as_uuid())
        .bind(event.kind.as_str())
        .bind(event.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to append cooking event"))?;

        Ok(())
    }

    async fn find_by_session(
        &self,
        session_id: &SessionId,
    ) -> Result<Vec<CookingEvent>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, session_id, event_type, created_at
            FROM cooking_events
            WHERE session_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(session_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to fetch cooking events"))?;

        rows.iter()
            .map(|row| {
                let id: uuid::Uuid = column(row, "id")?;
                let session: uuid::Uuid = column(row, "session_id")?;
                let kind: String = column(row, "event_type")?;
                let created_at: chrono::DateTime<chrono::Utc> = column(row, "created_at")?;
                Ok(CookingEvent {
                    id: CookingEventId::from_uuid(id),
                    session_id: SessionId::from_uuid(session),
                    kind: kind
                        .parse::<CookingEventKind>()
                        .map_err(|e| corrupt("event_type", e))?,
                    created_at: Timestamp::from_datetime(created_at),
                })
            })
            .collect()
    }
}
