//! Runs the slot-satisfaction check for a session and persists the result.

use std::sync::Arc;

use crate::domain::conversation::RecordingError;
use crate::domain::cooking::{evaluate, CompletionPolicy, CookingSession};
use crate::domain::foundation::{SessionId, Timestamp};
use crate::ports::{CookingSessionRepository, SessionSeasoningRepository};

#[derive(Clone)]
pub struct CompletionChecker {
    sessions: Arc<dyn CookingSessionRepository>,
    seasonings: Arc<dyn SessionSeasoningRepository>,
    policy: CompletionPolicy,
}

impl CompletionChecker {
    pub fn new(
        sessions: Arc<dyn CookingSessionRepository>,
        seasonings: Arc<dyn SessionSeasoningRepository>,
        policy: CompletionPolicy,
    ) -> Self {
        Self {
            sessions,
            seasonings,
            policy,
        }
    }

    /// Evaluates the recorded seasonings and stores the derived flags and
    /// status. Returns the updated session.
    pub async fn check(&self, session_id: &SessionId) -> Result<CookingSession, RecordingError> {
        let mut session = self
            .sessions
            .find_by_id(session_id)
            .await?
            .ok_or(RecordingError::SessionNotFound(*session_id))?;
        let recorded = self.seasonings.find_by_session(session_id).await?;

        let evaluation = evaluate(&session, &recorded);
        session.apply_evaluation(evaluation, self.policy, Timestamp::now());
        self.sessions.update(&session).await?;

        tracing::info!(
            session_id = %session_id,
            status = %session.status(),
            slot_a = evaluation.slot_a_satisfied,
            slot_b = evaluation.slot_b_satisfied,
            policy = ?self.policy,
            "Completion check"
        );
        Ok(session)
    }
}
