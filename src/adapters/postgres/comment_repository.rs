//! PostgreSQL implementation of CommentRepository.

use async_trait::async_trait;
use sqlx::PgPool;

use super::{column, corrupt, db_error};
use crate::domain::cooking::{Comment, CommentSource};
use crate::domain::foundation::{CommentId, DomainError, MemberId, SessionId, Timestamp};
use crate::ports::CommentRepository;

#[derive(Clone)]
pub struct PostgresCommentRepository {
    pool: PgPool,
}

impl PostgresCommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn save(&self, comment: &Comment) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO comments (id, session_id, member_id, content, source, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(comment.id.as_uuid())
        .bind(comment.session_id.as_uuid())
        .bind(comment.member_id.as_uuid())
        .bind(&comment.content)
        .bind(comment.source.as_str())
        .bind(comment.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to insert comment"))?;

        Ok(())
    }

    async fn find_by_session(&self, session_id: &SessionId) -> Result<Vec<Comment>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, session_id, member_id, content, source, created_at
            FROM comments
            WHERE session_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(session_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to fetch comments"))?;

        rows.iter()
            .map(|row| {
                let id: uuid::Uuid = column(row, "id")?;
                let session: uuid::Uuid = column(row, "session_id")?;
                let member: uuid::Uuid = column(row, "member_id")?;
                let content: String = column(row, "content")?;
                let source: String = column(row, "source")?;
                let created_at: chrono::DateTime<chrono::Utc> = column(row, "created_at")?;
                Ok(Comment {
                    id: CommentId::from_uuid(id),
                    session_id: SessionId::from_uuid(session),
                    member_id: MemberId::from_uuid(member),
                    content,
                    source: source
                        .parse::<CommentSource>()
                        .map_err(|e| corrupt("source", e))?,
                    created_at: Timestamp::from_datetime(created_at),
                })
            })
            .collect()
    }
}
