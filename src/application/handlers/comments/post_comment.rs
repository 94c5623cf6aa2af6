//! PostCommentHandler - Command handler for questions asked on the web.
//!
//! Saving the comment always succeeds on its own; notifying the family's
//! editors is best effort. An editor that was reached and is not in the
//! middle of a recording is moved to `awaiting_reply` so their next chat
//! message is stored as the answer.

use crate::application::handlers::recording::{ConversationGuard, RecordingPorts};
use crate::domain::conversation::{
    replies, ConversationPhase, ConversationState, LifecycleState, OutboundMessage,
    RecordingError,
};
use crate::domain::cooking::{Comment, CommentSource};
use crate::domain::foundation::{CommandMetadata, SessionId};
use crate::domain::membership::Member;

/// Fallback dish label when the session's dish left the catalog.
const UNKNOWN_DISH_NAME: &str = "料理";

#[derive(Debug, Clone)]
pub struct PostCommentCommand {
    pub session_id: SessionId,
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct PostCommentResult {
    pub comment: Comment,
    /// Editors a notification was delivered to.
    pub notified: usize,
    /// Editors whose conversation now awaits a reply.
    pub awaiting_reply: usize,
}

pub struct PostCommentHandler {
    ports: RecordingPorts,
    guard: ConversationGuard,
}

impl PostCommentHandler {
    pub fn new(ports: RecordingPorts, guard: ConversationGuard) -> Self {
        Self { ports, guard }
    }

    pub async fn handle(
        &self,
        cmd: PostCommentCommand,
        metadata: CommandMetadata,
    ) -> Result<PostCommentResult, RecordingError> {
        // 1. Only members comment
        let commenter_id = metadata
            .actor
            .member_id()
            .ok_or(RecordingError::Forbidden)?;

        // 2. Load the session and check family membership
        let session = self
            .ports
            .sessions
            .find_by_id(&cmd.session_id)
            .await?
            .ok_or(RecordingError::SessionNotFound(cmd.session_id))?;
        let commenter = self
            .ports
            .members
            .find_by_id(&commenter_id)
            .await?
            .filter(|m| m.belongs_to(session.family_space_id()))
            .ok_or(RecordingError::Forbidden)?;

        // 3. Persist
        let comment = Comment::new(
            cmd.session_id,
            commenter.id,
            cmd.content,
            CommentSource::Web,
        )?;
        self.ports.comments.save(&comment).await?;

        // 4. Notify editors
        let dish_name = self
            .ports
            .catalog
            .dish(session.dish_id())
            .map(|d| d.name.as_str())
            .unwrap_or(UNKNOWN_DISH_NAME);
        let notification = [OutboundMessage::text(replies::comment_notification(
            &commenter.display_name,
            dish_name,
            &comment.content,
        ))];

        let editors = match self
            .ports
            .members
            .notifiable_editors(session.family_space_id())
            .await
        {
            Ok(editors) => editors,
            Err(e) => {
                tracing::error!(
                    session_id = %cmd.session_id,
                    error = %e,
                    "Failed to load editors for comment notification"
                );
                Vec::new()
            }
        };

        let mut notified = 0;
        let mut awaiting_reply = 0;
        for editor in &editors {
            match self.notify(editor, &notification, cmd.session_id).await {
                Ok(moved) => {
                    notified += 1;
                    if moved {
                        awaiting_reply += 1;
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        member_id = %editor.id,
                        session_id = %cmd.session_id,
                        error = %e,
                        "Comment notification failed"
                    );
                }
            }
        }

        tracing::info!(
            session_id = %cmd.session_id,
            comment_id = %comment.id,
            notified,
            awaiting_reply,
            "Comment posted"
        );

        Ok(PostCommentResult {
            comment,
            notified,
            awaiting_reply,
        })
    }

    /// Pushes the notification, then points the editor's conversation at
    /// the session. Returns whether the conversation was moved.
    async fn notify(
        &self,
        editor: &Member,
        messages: &[OutboundMessage],
        session_id: SessionId,
    ) -> Result<bool, RecordingError> {
        let Some(line_user_id) = editor.line_user_id.as_ref() else {
            return Ok(false);
        };

        self.ports
            .messaging
            .push(line_user_id, messages)
            .await
            .map_err(|e| RecordingError::infrastructure(e.to_string()))?;

        let lease = self.guard.acquire(line_user_id).await?;
        let result = self.await_reply(editor, session_id).await;
        self.guard.release(&lease).await;
        result
    }

    async fn await_reply(
        &self,
        editor: &Member,
        session_id: SessionId,
    ) -> Result<bool, RecordingError> {
        let Some(line_user_id) = editor.line_user_id.as_ref() else {
            return Ok(false);
        };
        let mut state = match self.ports.states.find(line_user_id).await? {
            Some(state) => state,
            None => ConversationState::idle(line_user_id.clone(), Some(editor.id)),
        };

        // Never interrupt a recording in progress.
        if !matches!(
            state.lifecycle(),
            LifecycleState::Idle | LifecycleState::AwaitingReply
        ) {
            return Ok(false);
        }

        state
            .advance(ConversationPhase::AwaitingReply { session_id })
            .map_err(|e| RecordingError::invalid_state(e.to_string()))?;
        self.ports.states.save(&state).await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::testing::TestApp;
    use crate::domain::cooking::CookingSession;
    use crate::domain::foundation::{DishId, LineUserId};
    use crate::ports::{ConversationStateRepository, CookingSessionRepository};

    async fn session(app: &TestApp) -> SessionId {
        let session = CookingSession::start(
            app.cook.family_space_id,
            app.cook.id,
            DishId::new("nikujaga").unwrap(),
        );
        app.sessions.save(&session).await.unwrap();
        *session.id()
    }

    fn handler(app: &TestApp) -> PostCommentHandler {
        let workflow = app.workflow();
        PostCommentHandler::new(app.ports(), workflow.guard().clone())
    }

    fn command(session_id: SessionId, content: &str) -> PostCommentCommand {
        PostCommentCommand {
            session_id,
            content: content.to_string(),
        }
    }

    async fn lifecycle(app: &TestApp, user: &LineUserId) -> Option<LifecycleState> {
        app.states
            .find(user)
            .await
            .unwrap()
            .map(|s| s.lifecycle())
    }

    #[tokio::test]
    async fn comment_notifies_editors_and_awaits_their_reply() {
        let app = TestApp::new();
        let session_id = session(&app).await;

        let result = handler(&app)
            .handle(
                command(session_id, "お砂糖はどのくらい？"),
                CommandMetadata::member(app.viewer.id),
            )
            .await
            .unwrap();

        assert_eq!(result.comment.source, CommentSource::Web);
        assert_eq!(result.notified, 2);
        assert_eq!(result.awaiting_reply, 2);
        let pushed = app.messaging.pushes_to(&app.cook_line_id()).await;
        assert_eq!(
            pushed,
            vec![vec![OutboundMessage::text(replies::comment_notification(
                "たろう",
                "肉じゃが",
                "お砂糖はどのくらい？"
            ))]]
        );
        assert_eq!(
            lifecycle(&app, &app.cook_line_id()).await,
            Some(LifecycleState::AwaitingReply)
        );
        assert!(app
            .messaging
            .pushes_to(&LineUserId::new("Uother").unwrap())
            .await
            .is_empty());
    }

    #[tokio::test]
    async fn editor_mid_recording_is_notified_but_not_moved() {
        let app = TestApp::new();
        let session_id = session(&app).await;
        let mut recording = ConversationState::idle(app.cook_line_id(), Some(app.cook.id));
        recording.advance(ConversationPhase::SelectingDish).unwrap();
        app.states.insert(recording).await;

        let result = handler(&app)
            .handle(
                command(session_id, "質問です"),
                CommandMetadata::member(app.viewer.id),
            )
            .await
            .unwrap();

        assert_eq!(result.notified, 2);
        assert_eq!(result.awaiting_reply, 1);
        assert_eq!(
            lifecycle(&app, &app.cook_line_id()).await,
            Some(LifecycleState::SelectingDish)
        );
    }

    #[tokio::test]
    async fn unreachable_editor_keeps_state_and_others_still_notified() {
        let app = TestApp::new();
        let session_id = session(&app).await;
        app.messaging.make_unreachable(app.grandma_line_id()).await;

        let result = handler(&app)
            .handle(
                command(session_id, "質問です"),
                CommandMetadata::member(app.viewer.id),
            )
            .await
            .unwrap();

        assert_eq!(result.notified, 1);
        assert_eq!(lifecycle(&app, &app.grandma_line_id()).await, None);
        assert_eq!(app.comments.all().await.len(), 1);
    }

    #[tokio::test]
    async fn member_of_another_family_is_forbidden() {
        let app = TestApp::new();
        let session_id = session(&app).await;

        let err = handler(&app)
            .handle(
                command(session_id, "質問です"),
                CommandMetadata::member(app.outsider.id),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, RecordingError::Forbidden));
        assert!(app.comments.all().await.is_empty());
    }

    #[tokio::test]
    async fn platform_actor_cannot_comment() {
        let app = TestApp::new();
        let session_id = session(&app).await;

        let err = handler(&app)
            .handle(command(session_id, "質問です"), CommandMetadata::platform())
            .await
            .unwrap_err();

        assert!(matches!(err, RecordingError::Forbidden));
    }

    #[tokio::test]
    async fn blank_comment_is_rejected() {
        let app = TestApp::new();
        let session_id = session(&app).await;

        let err = handler(&app)
            .handle(command(session_id, "   "), CommandMetadata::member(app.viewer.id))
            .await
            .unwrap_err();

        assert!(matches!(err, RecordingError::Validation { .. }));
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let app = TestApp::new();

        let err = handler(&app)
            .handle(
                command(SessionId::new(), "質問です"),
                CommandMetadata::member(app.viewer.id),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, RecordingError::SessionNotFound(_)));
    }
}
