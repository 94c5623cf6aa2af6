//! PostgreSQL implementation of ConversationStateRepository.

use async_trait::async_trait;
use sqlx::PgPool;

use super::{column, corrupt, db_error};
use crate::domain::conversation::{ConversationPhase, ConversationState, LifecycleState};
use crate::domain::foundation::{
    DomainError, ErrorCode, LineUserId, MemberId, Timestamp,
};
use crate::ports::ConversationStateRepository;

/// PostgreSQL implementation of ConversationStateRepository.
///
/// The phase is stored split into `state` (lifecycle name) and `state_data`
/// (the variant payload); `current_session_id` mirrors the active session.
#[derive(Clone)]
pub struct PostgresConversationStateRepository {
    pool: PgPool,
}

impl PostgresConversationStateRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConversationStateRepository for PostgresConversationStateRepository {
    async fn find(
        &self,
        line_user_id: &LineUserId,
    ) -> Result<Option<ConversationState>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT line_user_id, member_id, state, state_data, version, updated_at
            FROM line_conversation_states
            WHERE line_user_id = $1
            "#,
        )
        .bind(line_user_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to fetch conversation state"))?;

        row.map(|r| row_to_state(&r)).transpose()
    }

    async fn initialize(
        &self,
        line_user_id: &LineUserId,
        member_id: &MemberId,
    ) -> Result<ConversationState, DomainError> {
        let row = sqlx::query(
            r#"
            INSERT INTO line_conversation_states (
                line_user_id, member_id, current_session_id, state, state_data, version, updated_at
            ) VALUES ($1, $2, NULL, 'idle', '{}'::jsonb, 1, NOW())
            ON CONFLICT (line_user_id) DO UPDATE SET
                member_id = EXCLUDED.member_id,
                current_session_id = NULL,
                state = 'idle',
                state_data = '{}'::jsonb,
                version = line_conversation_states.version + 1,
                updated_at = NOW()
            RETURNING line_user_id, member_id, state, state_data, version, updated_at
            "#,
        )
        .bind(line_user_id.as_str())
        .bind(member_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to initialize conversation state"))?;

        row_to_state(&row)
    }

    async fn save(&self, state: &ConversationState) -> Result<(), DomainError> {
        let (lifecycle, data) = state.phase().to_storage();

        let result = sqlx::query(
            r#"
            INSERT INTO line_conversation_states (
                line_user_id, member_id, current_session_id, state, state_data, version, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6 + 1, $7)
            ON CONFLICT (line_user_id) DO UPDATE SET
                member_id = EXCLUDED.member_id,
                current_session_id = EXCLUDED.current_session_id,
                state = EXCLUDED.state,
                state_data = EXCLUDED.state_data,
                version = EXCLUDED.version,
                updated_at = EXCLUDED.updated_at
            WHERE line_conversation_states.version = $6
            "#,
        )
        .bind(state.line_user_id().as_str())
        .bind(state.member_id().map(|m| *m.as_uuid()))
        .bind(state.active_session_id().map(|s| *s.as_uuid()))
        .bind(lifecycle.as_str())
        .bind(&data)
        .bind(state.version())
        .bind(state.updated_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to save conversation state"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::ConcurrentModification,
                format!(
                    "Conversation state of {} changed since version {}",
                    state.line_user_id(),
                    state.version()
                ),
            )
            .with_detail("line_user_id", state.line_user_id().as_str()));
        }

        Ok(())
    }
}

fn row_to_state(row: &sqlx::postgres::PgRow) -> Result<ConversationState, DomainError> {
    let line_user_id: String = column(row, "line_user_id")?;
    let member_id: Option<uuid::Uuid> = column(row, "member_id")?;
    let state: String = column(row, "state")?;
    let data: serde_json::Value = column(row, "state_data")?;
    let version: i64 = column(row, "version")?;
    let updated_at: chrono::DateTime<chrono::Utc> = column(row, "updated_at")?;

    let lifecycle: LifecycleState = state.parse().map_err(|e| corrupt("state", e))?;
    let phase =
        ConversationPhase::from_storage(lifecycle, data).map_err(|e| corrupt("state_data", e))?;

    Ok(ConversationState::reconstitute(
        LineUserId::new(line_user_id).map_err(|e| corrupt("line_user_id", e))?,
        member_id.map(MemberId::from_uuid),
        phase,
        version,
        Timestamp::from_datetime(updated_at),
    ))
}
