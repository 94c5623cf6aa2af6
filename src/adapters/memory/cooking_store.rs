//! In-memory cooking records: sessions, event log, seasonings and comments.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::cooking::{Comment, CookingEvent, CookingSession, SessionSeasoning};
use crate::domain::foundation::{DishId, DomainError, ErrorCode, FamilySpaceId, SessionId};
use crate::ports::{
    CommentRepository, CookingEventLog, CookingSessionRepository, SessionSeasoningRepository,
};

/// Sessions in insertion order, so history queries are deterministic even
/// when start timestamps collide.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCookingSessionRepository {
    sessions: Arc<RwLock<Vec<CookingSession>>>,
}

impl InMemoryCookingSessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn all(&self) -> Vec<CookingSession> {
        self.sessions.read().await.clone()
    }
}

#[async_trait]
impl CookingSessionRepository for InMemoryCookingSessionRepository {
    async fn save(&self, session: &CookingSession) -> Result<(), DomainError> {
        let mut sessions = self.sessions.write().await;
        if sessions.iter().any(|s| s.id() == session.id()) {
            return Err(DomainError::database(format!(
                "Cooking session already exists: {}",
                session.id()
            )));
        }
        sessions.push(session.clone());
        Ok(())
    }

    async fn update(&self, session: &CookingSession) -> Result<(), DomainError> {
        let mut sessions = self.sessions.write().await;
        match sessions.iter_mut().find(|s| s.id() == session.id()) {
            Some(stored) => {
                *stored = session.clone();
                Ok(())
            }
            None => Err(DomainError::new(
                ErrorCode::SessionNotFound,
                format!("Cooking session not found: {}", session.id()),
            )),
        }
    }

    async fn find_by_id(&self, id: &SessionId) -> Result<Option<CookingSession>, DomainError> {
        Ok(self
            .sessions
            .read()
            .await
            .iter()
            .find(|s| s.id() == id)
            .cloned())
    }

    async fn recent_dish_ids(
        &self,
        family_space_id: &FamilySpaceId,
        limit: usize,
    ) -> Result<Vec<DishId>, DomainError> {
        let sessions = self.sessions.read().await;
        let mut family: Vec<(usize, &CookingSession)> = sessions
            .iter()
            .enumerate()
            .filter(|(_, s)| s.family_space_id() == family_space_id)
            .collect();
        family.sort_by(|(ia, a), (ib, b)| {
            b.started_at()
                .as_datetime()
                .cmp(a.started_at().as_datetime())
                .then(ib.cmp(ia))
        });
        Ok(family
            .into_iter()
            .take(limit)
            .map(|(_, s)| s.dish_id().clone())
            .collect())
    }

    async fn dish_counts(
        &self,
        family_space_id: &FamilySpaceId,
    ) -> Result<Vec<(DishId, i64)>, DomainError> {
        let sessions = self.sessions.read().await;
        let mut counts: HashMap<DishId, i64> = HashMap::new();
        for session in sessions
            .iter()
            .filter(|s| s.family_space_id() == family_space_id)
        {
            *counts.entry(session.dish_id().clone()).or_insert(0) += 1;
        }
        Ok(counts.into_iter().collect())
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryCookingEventLog {
    events: Arc<RwLock<Vec<CookingEvent>>>,
}

impl InMemoryCookingEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn all(&self) -> Vec<CookingEvent> {
        self.events.read().await.clone()
    }
}

#[async_trait]
impl CookingEventLog for InMemoryCookingEventLog {
    async fn append(&self, event: &CookingEvent) -> Result<(), DomainError> {
        self.events.write().await.push(event.clone());
        Ok(())
    }

    async fn find_by_session(
        &self,
        session_id: &SessionId,
    ) -> Result<Vec<CookingEvent>, DomainError> {
        Ok(self
            .events
            .read()
            .await
            .iter()
            .filter(|e| &e.session_id == session_id)
            .cloned()
            .collect())
    }
}

/// Enforces one row per (session, seasoning), like the table's unique key.
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionSeasoningRepository {
    rows: Arc<RwLock<Vec<SessionSeasoning>>>,
}

impl InMemorySessionSeasoningRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn all(&self) -> Vec<SessionSeasoning> {
        self.rows.read().await.clone()
    }
}

#[async_trait]
impl SessionSeasoningRepository for InMemorySessionSeasoningRepository {
    async fn insert_if_absent(&self, record: &SessionSeasoning) -> Result<bool, DomainError> {
        let mut rows = self.rows.write().await;
        let exists = rows.iter().any(|r| {
            r.session_id() == record.session_id() && r.seasoning_id() == record.seasoning_id()
        });
        if exists {
            return Ok(false);
        }
        rows.push(record.clone());
        Ok(true)
    }

    async fn find_by_session(
        &self,
        session_id: &SessionId,
    ) -> Result<Vec<SessionSeasoning>, DomainError> {
        Ok(self
            .rows
            .read()
            .await
            .iter()
            .filter(|r| r.session_id() == session_id)
            .cloned()
            .collect())
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryCommentRepository {
    comments: Arc<RwLock<Vec<Comment>>>,
}

impl InMemoryCommentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn all(&self) -> Vec<Comment> {
        self.comments.read().await.clone()
    }
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepository {
    async fn save(&self, comment: &Comment) -> Result<(), DomainError> {
        self.comments.write().await.push(comment.clone());
        Ok(())
    }

    async fn find_by_session(&self, session_id: &SessionId) -> Result<Vec<Comment>, DomainError> {
        Ok(self
            .comments
            .read()
            .await
            .iter()
            .filter(|c| &c.session_id == session_id)
            .cloned()
            .collect())
    }
}
