//! PostgreSQL implementation of MemberDirectory.

use async_trait::async_trait;
use sqlx::PgPool;

use super::{column, corrupt, db_error};
use crate::domain::foundation::{DomainError, FamilySpaceId, LineUserId, MemberId};
use crate::domain::membership::{Member, MemberRole};
use crate::ports::MemberDirectory;

#[derive(Clone)]
pub struct PostgresMemberDirectory {
    pool: PgPool,
}

impl PostgresMemberDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MemberDirectory for PostgresMemberDirectory {
    async fn find_by_line_user(
        &self,
        line_user_id: &LineUserId,
    ) -> Result<Option<Member>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, family_space_id, line_user_id, display_name, role
            FROM members
            WHERE line_user_id = $1
            "#,
        )
        .bind(line_user_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to fetch member by LINE user"))?;

        row.map(|r| row_to_member(&r)).transpose()
    }

    async fn find_by_id(&self, id: &MemberId) -> Result<Option<Member>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, family_space_id, line_user_id, display_name, role
            FROM members
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to fetch member"))?;

        row.map(|r| row_to_member(&r)).transpose()
    }

    async fn link_line_user(
        &self,
        id: &MemberId,
        line_user_id: &LineUserId,
    ) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE members
            SET line_user_id = $1
            WHERE id = $2
              AND (line_user_id IS NULL OR line_user_id = $1)
              AND NOT EXISTS (
                  SELECT 1 FROM members other
                  WHERE other.line_user_id = $1 AND other.id <> $2
              )
            "#,
        )
        .bind(line_user_id.as_str())
        .bind(id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to link LINE user"))?;

        Ok(result.rows_affected() == 1)
    }

    async fn notifiable_editors(
        &self,
        family_space_id: &FamilySpaceId,
    ) -> Result<Vec<Member>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, family_space_id, line_user_id, display_name, role
            FROM members
            WHERE family_space_id = $1
              AND role = 'editor'
              AND line_user_id IS NOT NULL
            ORDER BY created_at
            "#,
        )
        .bind(family_space_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to fetch editors"))?;

        rows.iter().map(row_to_member).collect()
    }
}

fn row_to_member(row: &sqlx::postgres::PgRow) -> Result<Member, DomainError> {
    let id: uuid::Uuid = column(row, "id")?;
    let family_space_id: uuid::Uuid = column(row, "family_space_id")?;
    let line_user_id: Option<String> = column(row, "line_user_id")?;
    let display_name: String = column(row, "display_name")?;
    let role: String = column(row, "role")?;

    Ok(Member {
        id: MemberId::from_uuid(id),
        family_space_id: FamilySpaceId::from_uuid(family_space_id),
        line_user_id: line_user_id
            .map(LineUserId::new)
            .transpose()
            .map_err(|e| corrupt("line_user_id", e))?,
        display_name,
        role: role.parse::<MemberRole>().map_err(|e| corrupt("role", e))?,
    })
}
