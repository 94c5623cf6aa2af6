//! AdmitLineMemberHandler - links a member's LINE identity and gives them a
//! fresh conversation once the invitation flow has accepted them.

use std::sync::Arc;

use crate::domain::conversation::{ConversationState, RecordingError};
use crate::domain::foundation::{CommandMetadata, LineUserId, MemberId};
use crate::ports::{ConversationStateRepository, MemberDirectory};

#[derive(Debug, Clone)]
pub struct AdmitLineMemberCommand {
    pub member_id: MemberId,
    pub line_user_id: LineUserId,
}

pub struct AdmitLineMemberHandler {
    members: Arc<dyn MemberDirectory>,
    states: Arc<dyn ConversationStateRepository>,
}

impl AdmitLineMemberHandler {
    pub fn new(
        members: Arc<dyn MemberDirectory>,
        states: Arc<dyn ConversationStateRepository>,
    ) -> Self {
        Self { members, states }
    }

    pub async fn handle(
        &self,
        cmd: AdmitLineMemberCommand,
        metadata: CommandMetadata,
    ) -> Result<ConversationState, RecordingError> {
        if !metadata.actor.is_platform() {
            return Err(RecordingError::Forbidden);
        }

        let member = self
            .members
            .find_by_id(&cmd.member_id)
            .await?
            .ok_or(RecordingError::Unregistered)?;

        // The LINE identity must be the one the member signed up with.
        match &member.line_user_id {
            Some(linked) if linked != &cmd.line_user_id => {
                tracing::warn!(
                    member_id = %cmd.member_id,
                    line_user_id = %cmd.line_user_id,
                    "LINE identity does not match member"
                );
                return Err(RecordingError::Forbidden);
            }
            Some(_) => {}
            None => {
                let linked = self
                    .members
                    .link_line_user(&cmd.member_id, &cmd.line_user_id)
                    .await?;
                if !linked {
                    tracing::warn!(
                        member_id = %cmd.member_id,
                        line_user_id = %cmd.line_user_id,
                        "LINE identity already belongs to another member"
                    );
                    return Err(RecordingError::Forbidden);
                }
                tracing::info!(
                    member_id = %cmd.member_id,
                    line_user_id = %cmd.line_user_id,
                    "LINE identity linked to member"
                );
            }
        }

        let state = self
            .states
            .initialize(&cmd.line_user_id, &cmd.member_id)
            .await?;

        tracing::info!(
            member_id = %cmd.member_id,
            line_user_id = %cmd.line_user_id,
            version = state.version(),
            "Conversation initialized for member"
        );
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::testing::TestApp;
    use crate::application::handlers::recording::Delivery;
    use crate::domain::conversation::{ConversationPhase, InboundEvent, LifecycleState};

    fn handler(app: &TestApp) -> AdmitLineMemberHandler {
        AdmitLineMemberHandler::new(app.members.clone(), app.states.clone())
    }

    #[tokio::test]
    async fn admission_creates_idle_conversation() {
        let app = TestApp::new();

        let state = handler(&app)
            .handle(
                AdmitLineMemberCommand {
                    member_id: app.cook.id,
                    line_user_id: app.cook_line_id(),
                },
                CommandMetadata::platform(),
            )
            .await
            .unwrap();

        assert_eq!(state.lifecycle(), LifecycleState::Idle);
        assert_eq!(state.member_id(), Some(&app.cook.id));
        assert_eq!(app.states.len().await, 1);
    }

    #[tokio::test]
    async fn readmission_resets_a_recording_in_progress() {
        let app = TestApp::new();
        let mut state = ConversationState::idle(app.cook_line_id(), Some(app.cook.id));
        state.advance(ConversationPhase::SelectingDish).unwrap();
        app.states.insert(state).await;

        let state = handler(&app)
            .handle(
                AdmitLineMemberCommand {
                    member_id: app.cook.id,
                    line_user_id: app.cook_line_id(),
                },
                CommandMetadata::platform(),
            )
            .await
            .unwrap();

        assert_eq!(state.phase(), &ConversationPhase::Idle);
        assert_eq!(state.version(), 1);
    }

    #[tokio::test]
    async fn mismatched_line_identity_is_forbidden() {
        let app = TestApp::new();

        let err = handler(&app)
            .handle(
                AdmitLineMemberCommand {
                    member_id: app.cook.id,
                    line_user_id: app.grandma_line_id(),
                },
                CommandMetadata::platform(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, RecordingError::Forbidden));
        assert!(app.states.is_empty().await);
    }

    #[tokio::test]
    async fn admission_links_an_unlinked_member_who_can_then_record() {
        let app = TestApp::new();
        let newbie = LineUserId::new("Unewbie").unwrap();

        handler(&app)
            .handle(
                AdmitLineMemberCommand {
                    member_id: app.viewer.id,
                    line_user_id: newbie.clone(),
                },
                CommandMetadata::platform(),
            )
            .await
            .unwrap();

        let linked = app.members.find_by_line_user(&newbie).await.unwrap();
        assert_eq!(linked.map(|m| m.id), Some(app.viewer.id));

        app.workflow()
            .process(
                &newbie,
                InboundEvent::text("開始"),
                Delivery::Reply("reply-token".to_string()),
                &CommandMetadata::platform(),
            )
            .await
            .unwrap();

        let state = app.states.find(&newbie).await.unwrap().unwrap();
        assert_eq!(state.lifecycle(), LifecycleState::SelectingDish);
        assert_eq!(state.member_id(), Some(&app.viewer.id));
    }

    #[tokio::test]
    async fn identity_owned_by_another_member_is_forbidden() {
        let app = TestApp::new();

        let err = handler(&app)
            .handle(
                AdmitLineMemberCommand {
                    member_id: app.viewer.id,
                    line_user_id: app.grandma_line_id(),
                },
                CommandMetadata::platform(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, RecordingError::Forbidden));
        assert!(app.states.is_empty().await);
        let viewer = app.members.find_by_id(&app.viewer.id).await.unwrap().unwrap();
        assert_eq!(viewer.line_user_id, None);
    }

    #[tokio::test]
    async fn unknown_member_is_unregistered() {
        let app = TestApp::new();

        let err = handler(&app)
            .handle(
                AdmitLineMemberCommand {
                    member_id: MemberId::new(),
                    line_user_id: app.cook_line_id(),
                },
                CommandMetadata::platform(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, RecordingError::Unregistered));
    }

    #[tokio::test]
    async fn members_cannot_admit_themselves() {
        let app = TestApp::new();

        let err = handler(&app)
            .handle(
                AdmitLineMemberCommand {
                    member_id: app.cook.id,
                    line_user_id: app.cook_line_id(),
                },
                CommandMetadata::member(app.cook.id),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, RecordingError::Forbidden));
    }
}
