//! In-memory conversation state store with the same version semantics as
//! the PostgreSQL adapter.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::conversation::{ConversationPhase, ConversationState};
use crate::domain::foundation::{DomainError, ErrorCode, LineUserId, MemberId, Timestamp};
use crate::ports::ConversationStateRepository;

#[derive(Debug, Clone, Default)]
pub struct InMemoryConversationStateRepository {
    states: Arc<RwLock<HashMap<LineUserId, ConversationState>>>,
}

impl InMemoryConversationStateRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a stored state as is (test setup).
    pub async fn insert(&self, state: ConversationState) {
        self.states
            .write()
            .await
            .insert(state.line_user_id().clone(), state);
    }

    pub async fn len(&self) -> usize {
        self.states.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.states.read().await.is_empty()
    }
}

#[async_trait]
impl ConversationStateRepository for InMemoryConversationStateRepository {
    async fn find(
        &self,
        line_user_id: &LineUserId,
    ) -> Result<Option<ConversationState>, DomainError> {
        Ok(self.states.read().await.get(line_user_id).cloned())
    }

    async fn initialize(
        &self,
        line_user_id: &LineUserId,
        member_id: &MemberId,
    ) -> Result<ConversationState, DomainError> {
        let mut states = self.states.write().await;
        let version = states.get(line_user_id).map(|s| s.version() + 1).unwrap_or(1);
        let state = ConversationState::reconstitute(
            line_user_id.clone(),
            Some(*member_id),
            ConversationPhase::Idle,
            version,
            Timestamp::now(),
        );
        states.insert(line_user_id.clone(), state.clone());
        Ok(state)
    }

    async fn save(&self, state: &ConversationState) -> Result<(), DomainError> {
        let mut states = self.states.write().await;
        if let Some(stored) = states.get(state.line_user_id()) {
            if stored.version() != state.version() {
                return Err(DomainError::new(
                    ErrorCode::ConcurrentModification,
                    format!(
                        "Conversation state was modified concurrently (expected version {}, found {})",
                        state.version(),
                        stored.version()
                    ),
                )
                .with_detail("line_user_id", state.line_user_id().as_str()));
            }
        }

        let mut next = state.clone();
        next.mark_persisted();
        states.insert(state.line_user_id().clone(), next);
        Ok(())
    }
}
