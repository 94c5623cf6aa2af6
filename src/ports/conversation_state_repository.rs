//! Conversation state repository port.
//!
//! One row per LINE identity. Writes are guarded by an optimistic version
//! check so a stale reader can never overwrite a newer transition.

use async_trait::async_trait;

use crate::domain::conversation::ConversationState;
use crate::domain::foundation::{DomainError, LineUserId, MemberId};

#[async_trait]
pub trait ConversationStateRepository: Send + Sync {
    /// Find the conversation of a LINE user.
    async fn find(&self, line_user_id: &LineUserId)
        -> Result<Option<ConversationState>, DomainError>;

    /// Upsert an idle conversation with an empty payload linked to the member.
    ///
    /// Used on member admission; resets any previous state.
    async fn initialize(
        &self,
        line_user_id: &LineUserId,
        member_id: &MemberId,
    ) -> Result<ConversationState, DomainError>;

    /// Persist the state if the stored version still equals `state.version()`.
    ///
    /// A missing row is inserted. On success the stored version is
    /// `state.version() + 1`.
    ///
    /// # Errors
    ///
    /// - `ConcurrentModification` if the stored version moved on
    /// - `DatabaseError` on persistence failure
    async fn save(&self, state: &ConversationState) -> Result<(), DomainError>;
}
