//! SubmitSeasoningsHandler - Command handler for the mini-app multi-select.
//!
//! The mini-app posts the selection outside of any chat event, so replies
//! are pushed to the cook instead of answering a reply token.

use crate::domain::conversation::{InboundEvent, LifecycleState, RecordingError};
use crate::domain::foundation::{CommandMetadata, SeasoningId, SessionId};

use super::workflow::{Delivery, RecordingWorkflow};

/// Command carrying the raw selection from the mini-app.
#[derive(Debug, Clone)]
pub struct SubmitSeasoningsCommand {
    pub session_id: SessionId,
    pub seasoning_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitSeasoningsResult {
    pub session_id: SessionId,
    pub state: LifecycleState,
    pub photo_queue_length: usize,
}

pub struct SubmitSeasoningsHandler {
    workflow: RecordingWorkflow,
}

impl SubmitSeasoningsHandler {
    pub fn new(workflow: RecordingWorkflow) -> Self {
        Self { workflow }
    }

    pub async fn handle(
        &self,
        cmd: SubmitSeasoningsCommand,
        metadata: CommandMetadata,
    ) -> Result<SubmitSeasoningsResult, RecordingError> {
        let ports = self.workflow.ports();

        // 1. Parse ids and check them against the catalog
        let mut seasoning_ids = Vec::with_capacity(cmd.seasoning_ids.len());
        for raw in &cmd.seasoning_ids {
            let id = SeasoningId::new(raw.as_str())?;
            if ports.catalog.seasoning(&id).is_none() {
                return Err(RecordingError::validation(
                    "seasoning_ids",
                    format!("unknown seasoning '{}'", raw),
                ));
            }
            seasoning_ids.push(id);
        }

        // 2. Resolve the cook of the session
        let session = ports
            .sessions
            .find_by_id(&cmd.session_id)
            .await?
            .ok_or(RecordingError::SessionNotFound(cmd.session_id))?;
        let cook = ports
            .members
            .find_by_id(session.member_id())
            .await?
            .ok_or(RecordingError::Unregistered)?;
        let line_user_id = cook.line_user_id.ok_or_else(|| {
            RecordingError::validation("session_id", "session owner has no LINE account")
        })?;

        // 3. Feed the selection into the cook's conversation
        let outcome = self
            .workflow
            .process(
                &line_user_id,
                InboundEvent::SeasoningsSelected {
                    session_id: cmd.session_id,
                    seasoning_ids,
                },
                Delivery::Push,
                &metadata,
            )
            .await?;

        Ok(SubmitSeasoningsResult {
            session_id: cmd.session_id,
            state: outcome.state,
            photo_queue_length: outcome.photo_queue_length,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::SentMessage;
    use crate::application::handlers::testing::TestApp;
    use crate::domain::conversation::{ConversationPhase, ConversationState};
    use crate::domain::cooking::CookingSession;
    use crate::domain::foundation::DishId;
    use crate::ports::CookingSessionRepository;

    /// A misoshiru session whose cook is waiting on the mini-app.
    async fn pending_selection(app: &TestApp) -> SessionId {
        let session = CookingSession::start(
            app.cook.family_space_id,
            app.cook.id,
            DishId::new("misoshiru").unwrap(),
        );
        app.sessions.save(&session).await.unwrap();
        let session_id = *session.id();

        let mut state = ConversationState::idle(app.cook_line_id(), Some(app.cook.id));
        for phase in [
            ConversationPhase::SelectingDish,
            ConversationPhase::Cooking { session_id },
            ConversationPhase::SelectingServings { session_id },
            ConversationPhase::SelectingSeasonings { session_id },
        ] {
            state.advance(phase).unwrap();
        }
        app.states.insert(state).await;
        session_id
    }

    fn command(session_id: SessionId, ids: &[&str]) -> SubmitSeasoningsCommand {
        SubmitSeasoningsCommand {
            session_id,
            seasoning_ids: ids.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn selection_is_pushed_to_the_cook() {
        let app = TestApp::new();
        let session_id = pending_selection(&app).await;
        let handler = SubmitSeasoningsHandler::new(app.workflow());

        let result = handler
            .handle(
                command(session_id, &["miso_white", "dashi_pack"]),
                CommandMetadata::platform(),
            )
            .await
            .unwrap();

        assert_eq!(result.state, LifecycleState::AwaitingPhoto);
        assert_eq!(result.photo_queue_length, 2);
        let sent = app.messaging.sent().await;
        assert!(matches!(
            sent.as_slice(),
            [SentMessage::Push { to, .. }] if to == &app.cook_line_id()
        ));
    }

    #[tokio::test]
    async fn unknown_seasoning_is_a_validation_error() {
        let app = TestApp::new();
        let session_id = pending_selection(&app).await;
        let handler = SubmitSeasoningsHandler::new(app.workflow());

        let err = handler
            .handle(command(session_id, &["truffle"]), CommandMetadata::platform())
            .await
            .unwrap_err();

        assert!(matches!(err, RecordingError::Validation { .. }));
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let app = TestApp::new();
        let handler = SubmitSeasoningsHandler::new(app.workflow());

        let err = handler
            .handle(
                command(SessionId::new(), &["miso_red"]),
                CommandMetadata::platform(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, RecordingError::SessionNotFound(_)));
    }

    #[tokio::test]
    async fn session_not_awaiting_selection_is_invalid_state() {
        let app = TestApp::new();
        let session_id = pending_selection(&app).await;
        let handler = SubmitSeasoningsHandler::new(app.workflow());
        handler
            .handle(command(session_id, &["no_dashi"]), CommandMetadata::platform())
            .await
            .unwrap();

        let err = handler
            .handle(command(session_id, &["no_dashi"]), CommandMetadata::platform())
            .await
            .unwrap_err();

        assert!(matches!(err, RecordingError::InvalidState(_)));
    }
}
