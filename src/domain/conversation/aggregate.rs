//! ConversationState aggregate - the durable cursor of one chat identity.

use serde::{Deserialize, Serialize};

use super::phase::ConversationPhase;
use super::state::LifecycleState;
use crate::domain::foundation::{
    LineUserId, MemberId, SessionId, StateMachine, Timestamp, ValidationError,
};

/// Per-user conversation state.
///
/// # Invariants
///
/// - `idle` implies no active session (guaranteed by [`ConversationPhase`])
/// - phase changes go through [`ConversationState::advance`], which enforces
///   the lifecycle transition table
/// - `version` is the optimistic concurrency token of the stored row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationState {
    line_user_id: LineUserId,
    member_id: Option<MemberId>,
    phase: ConversationPhase,
    version: i64,
    updated_at: Timestamp,
}

impl ConversationState {
    /// A fresh idle conversation, as created on member admission.
    pub fn idle(line_user_id: LineUserId, member_id: Option<MemberId>) -> Self {
        Self {
            line_user_id,
            member_id,
            phase: ConversationPhase::Idle,
            version: 0,
            updated_at: Timestamp::now(),
        }
    }

    /// Reconstitute from persistence.
    pub fn reconstitute(
        line_user_id: LineUserId,
        member_id: Option<MemberId>,
        phase: ConversationPhase,
        version: i64,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            line_user_id,
            member_id,
            phase,
            version,
            updated_at,
        }
    }

    pub fn line_user_id(&self) -> &LineUserId {
        &self.line_user_id
    }

    pub fn member_id(&self) -> Option<&MemberId> {
        self.member_id.as_ref()
    }

    pub fn phase(&self) -> &ConversationPhase {
        &self.phase
    }

    pub fn lifecycle(&self) -> LifecycleState {
        self.phase.lifecycle()
    }

    pub fn active_session_id(&self) -> Option<SessionId> {
        self.phase.active_session_id()
    }

    pub fn version(&self) -> i64 {
        self.version
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    /// Links the conversation to a member.
    pub fn link_member(&mut self, member_id: MemberId) {
        self.member_id = Some(member_id);
        self.updated_at = Timestamp::now();
    }

    /// Moves to the next phase after validating the lifecycle transition.
    pub fn advance(&mut self, next: ConversationPhase) -> Result<(), ValidationError> {
        self.lifecycle().transition_to(next.lifecycle())?;
        self.phase = next;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Records that the stored row moved to the next version.
    pub fn mark_persisted(&mut self) {
        self.version += 1;
    }
}
