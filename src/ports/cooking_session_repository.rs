//! Cooking session persistence ports.

use async_trait::async_trait;

use crate::domain::cooking::{Comment, CookingEvent, CookingSession, SessionSeasoning};
use crate::domain::foundation::{DishId, DomainError, FamilySpaceId, SessionId};

/// Repository port for the CookingSession aggregate.
#[async_trait]
pub trait CookingSessionRepository: Send + Sync {
    /// Save a new session.
    async fn save(&self, session: &CookingSession) -> Result<(), DomainError>;

    /// Update an existing session.
    ///
    /// # Errors
    ///
    /// - `SessionNotFound` if the session doesn't exist
    async fn update(&self, session: &CookingSession) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &SessionId) -> Result<Option<CookingSession>, DomainError>;

    /// Dish ids of the family's most recent sessions, newest first.
    async fn recent_dish_ids(
        &self,
        family_space_id: &FamilySpaceId,
        limit: usize,
    ) -> Result<Vec<DishId>, DomainError>;

    /// Number of sessions per dish across the family's history.
    async fn dish_counts(
        &self,
        family_space_id: &FamilySpaceId,
    ) -> Result<Vec<(DishId, i64)>, DomainError>;
}

/// Append-only log of cooking actions.
#[async_trait]
pub trait CookingEventLog: Send + Sync {
    async fn append(&self, event: &CookingEvent) -> Result<(), DomainError>;

    /// Events of a session in insertion order.
    async fn find_by_session(&self, session_id: &SessionId)
        -> Result<Vec<CookingEvent>, DomainError>;
}

/// Recorded seasonings of a session.
#[async_trait]
pub trait SessionSeasoningRepository: Send + Sync {
    /// Insert unless the (session, seasoning) pair already exists.
    ///
    /// Returns `false` when the row already existed; that is not an error.
    async fn insert_if_absent(&self, record: &SessionSeasoning) -> Result<bool, DomainError>;

    async fn find_by_session(
        &self,
        session_id: &SessionId,
    ) -> Result<Vec<SessionSeasoning>, DomainError>;
}

/// Comments on cooking sessions.
#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn save(&self, comment: &Comment) -> Result<(), DomainError>;

    /// Comments of a session, oldest first.
    async fn find_by_session(&self, session_id: &SessionId) -> Result<Vec<Comment>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ports_are_object_safe() {
        fn _sessions(_repo: &dyn CookingSessionRepository) {}
        fn _events(_log: &dyn CookingEventLog) {}
        fn _seasonings(_repo: &dyn SessionSeasoningRepository) {}
        fn _comments(_repo: &dyn CommentRepository) {}
    }
}
