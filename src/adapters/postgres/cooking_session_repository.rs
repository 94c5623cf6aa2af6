//! PostgreSQL implementation of CookingSessionRepository.

use async_trait::async_trait;
use sqlx::PgPool;

use super::{column, corrupt, db_error};
use crate::domain::cooking::{CookingSession, CookingStatus, Servings, TasteStatus};
use crate::domain::foundation::{
    DishId, DomainError, ErrorCode, FamilySpaceId, MemberId, SessionId, Timestamp,
};
use crate::ports::CookingSessionRepository;

const SESSION_COLUMNS: &str = "id, family_space_id, member_id, dish_id, status, servings, \
     taste_status, slot_a_satisfied, slot_b_satisfied, started_at, completed_at";

#[derive(Clone)]
pub struct PostgresCookingSessionRepository {
    pool: PgPool,
}

impl PostgresCookingSessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CookingSessionRepository for PostgresCookingSessionRepository {
    async fn save(&self, session: &CookingSession) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO cooking_sessions (
                id, family_space_id, member_id, dish_id, status, servings, taste_status,
                slot_a_satisfied, slot_b_satisfied, started_at, completed_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(session.id().as_uuid())
        .bind(session.family_space_id().as_uuid())
        .bind(session.member_id().as_uuid())
        .bind(session.dish_id().as_str())
        .bind(session.status().as_str())
        .bind(session.servings().map(|s| s.value()))
        .bind(session.taste_status().map(|t| t.as_str()))
        .bind(session.slot_a_satisfied())
        .bind(session.slot_b_satisfied())
        .bind(session.started_at().as_datetime())
        .bind(session.completed_at().map(|t| *t.as_datetime()))
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to insert cooking session"))?;

        Ok(())
    }

    async fn update(&self, session: &CookingSession) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE cooking_sessions SET
                status = $2,
                servings = $3,
                taste_status = $4,
                slot_a_satisfied = $5,
                slot_b_satisfied = $6,
                completed_at = $7
            WHERE id = $1
            "#,
        )
        .bind(session.id().as_uuid())
        .bind(session.status().as_str())
        .bind(session.servings().map(|s| s.value()))
        .bind(session.taste_status().map(|t| t.as_str()))
        .bind(session.slot_a_satisfied())
        .bind(session.slot_b_satisfied())
        .bind(session.completed_at().map(|t| *t.as_datetime()))
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to update cooking session"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::SessionNotFound,
                format!("Cooking session not found: {}", session.id()),
            ));
        }

        Ok(())
    }

    async fn find_by_id(&self, id: &SessionId) -> Result<Option<CookingSession>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM cooking_sessions WHERE id = $1",
            SESSION_COLUMNS
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to fetch cooking session"))?;

        row.map(|r| row_to_session(&r)).transpose()
    }

    async fn recent_dish_ids(
        &self,
        family_space_id: &FamilySpaceId,
        limit: usize,
    ) -> Result<Vec<DishId>, DomainError> {
        let rows: Vec<(String,)> = sqlx::query_as(
            r#"
            SELECT dish_id FROM cooking_sessions
            WHERE family_space_id = $1
            ORDER BY started_at DESC
            LIMIT $2
            "#,
        )
        .bind(family_space_id.as_uuid())
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to fetch recent dishes"))?;

        rows.into_iter()
            .map(|(id,)| DishId::new(id).map_err(|e| corrupt("dish_id", e)))
            .collect()
    }

    async fn dish_counts(
        &self,
        family_space_id: &FamilySpaceId,
    ) -> Result<Vec<(DishId, i64)>, DomainError> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            r#"
            SELECT dish_id, COUNT(*) AS cooked
            FROM cooking_sessions
            WHERE family_space_id = $1
            GROUP BY dish_id
            "#,
        )
        .bind(family_space_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to count dishes"))?;

        rows.into_iter()
            .map(|(id, count)| {
                DishId::new(id)
                    .map(|id| (id, count))
                    .map_err(|e| corrupt("dish_id", e))
            })
            .collect()
    }
}

fn row_to_session(row: &sqlx::postgres::PgRow) -> Result<CookingSession, DomainError> {
    let id: uuid::Uuid = column(row, "id")?;
    let family_space_id: uuid::Uuid = column(row, "family_space_id")?;
    let member_id: uuid::Uuid = column(row, "member_id")?;
    let dish_id: String = column(row, "dish_id")?;
    let status: String = column(row, "status")?;
    let servings: Option<i32> = column(row, "servings")?;
    let taste: Option<String> = column(row, "taste_status")?;
    let slot_a: bool = column(row, "slot_a_satisfied")?;
    let slot_b: bool = column(row, "slot_b_satisfied")?;
    let started_at: chrono::DateTime<chrono::Utc> = column(row, "started_at")?;
    let completed_at: Option<chrono::DateTime<chrono::Utc>> = column(row, "completed_at")?;

    let status: CookingStatus = status.parse().map_err(|e| corrupt("status", e))?;
    let servings = servings
        .map(Servings::new)
        .transpose()
        .map_err(|e| corrupt("servings", e))?;
    let taste = taste
        .map(|t| t.parse::<TasteStatus>())
        .transpose()
        .map_err(|e| corrupt("taste_status", e))?;

    Ok(CookingSession::reconstitute(
        SessionId::from_uuid(id),
        FamilySpaceId::from_uuid(family_space_id),
        MemberId::from_uuid(member_id),
        DishId::new(dish_id).map_err(|e| corrupt("dish_id", e))?,
        status,
        servings,
        taste,
        slot_a,
        slot_b,
        Timestamp::from_datetime(started_at),
        completed_at.map(Timestamp::from_datetime),
    ))
}
