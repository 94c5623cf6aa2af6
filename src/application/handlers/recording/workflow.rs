//! RecordingWorkflow - executes state-machine decisions for one chat user.
//!
//! Every inbound event runs under the user's conversation lock:
//!
//! 1. resolve the member behind the chat identity
//! 2. load (or create) the conversation state
//! 3. `decide` what the event means in the current phase
//! 4. perform the side effects of that intent
//! 5. advance and persist the state
//! 6. deliver the replies
//!
//! State is only advanced after the side effects succeed, so a failed write
//! leaves the user where they were and the same input can be retried.

use crate::domain::conversation::{
    decide, replies, ConversationPhase, ConversationState, CookingAction, DishMenu,
    InboundEvent, Intent, LifecycleState, OutboundMessage, Prompt, RecordingError,
    RECENT_SESSION_WINDOW,
};
use crate::domain::cooking::{
    Comment, CommentSource, CookingEvent, CookingEventKind, CookingSession, SessionSeasoning,
};
use crate::domain::foundation::{CommandMetadata, LineUserId, SeasoningId, SessionId, Timestamp};
use crate::domain::membership::Member;
use crate::ports::photo_path;

use super::completion::CompletionChecker;
use super::context::{RecordingPorts, RecordingSettings};
use super::guard::ConversationGuard;

/// Content type used for stored seasoning photos.
const PHOTO_CONTENT_TYPE: &str = "image/jpeg";

/// How replies reach the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// Answer a webhook event with its reply token.
    Reply(String),
    /// Push to the user; used when the trigger did not come from chat.
    Push,
}

/// What happened to the conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowOutcome {
    pub intent: &'static str,
    pub state: LifecycleState,
    pub photo_queue_length: usize,
}

/// Side effects done; where to go and what to say.
struct Step {
    next: Option<ConversationPhase>,
    messages: Vec<OutboundMessage>,
}

impl Step {
    fn to(next: ConversationPhase, messages: Vec<OutboundMessage>) -> Self {
        Self {
            next: Some(next),
            messages,
        }
    }

    fn stay(messages: Vec<OutboundMessage>) -> Self {
        Self {
            next: None,
            messages,
        }
    }
}

#[derive(Clone)]
pub struct RecordingWorkflow {
    ports: RecordingPorts,
    settings: RecordingSettings,
    guard: ConversationGuard,
    completion: CompletionChecker,
}

impl RecordingWorkflow {
    pub fn new(ports: RecordingPorts, settings: RecordingSettings) -> Self {
        let guard = ConversationGuard::new(
            ports.lock.clone(),
            settings.lock_ttl,
            settings.lock_attempts,
            settings.lock_retry_delay,
        );
        let completion = CompletionChecker::new(
            ports.sessions.clone(),
            ports.seasonings.clone(),
            settings.completion_policy,
        );
        Self {
            ports,
            settings,
            guard,
            completion,
        }
    }

    pub fn ports(&self) -> &RecordingPorts {
        &self.ports
    }

    pub fn settings(&self) -> &RecordingSettings {
        &self.settings
    }

    pub fn guard(&self) -> &ConversationGuard {
        &self.guard
    }

    /// Processes one inbound event for a chat user.
    ///
    /// Only the platform may drive a conversation.
    pub async fn process(
        &self,
        line_user_id: &LineUserId,
        event: InboundEvent,
        delivery: Delivery,
        metadata: &CommandMetadata,
    ) -> Result<WorkflowOutcome, RecordingError> {
        if !metadata.actor.is_platform() {
            return Err(RecordingError::Forbidden);
        }

        let lease = self.guard.acquire(line_user_id).await?;
        let result = self.process_locked(line_user_id, event, &delivery).await;
        self.guard.release(&lease).await;
        result
    }

    async fn process_locked(
        &self,
        line_user_id: &LineUserId,
        event: InboundEvent,
        delivery: &Delivery,
    ) -> Result<WorkflowOutcome, RecordingError> {
        let Some(member) = self.ports.members.find_by_line_user(line_user_id).await? else {
            tracing::info!(line_user_id = %line_user_id, "Event from unregistered LINE user");
            if matches!(event, InboundEvent::Text { .. }) {
                self.deliver(
                    line_user_id,
                    delivery,
                    &[OutboundMessage::text(replies::UNREGISTERED)],
                )
                .await;
            }
            return Err(RecordingError::Unregistered);
        };

        let mut state = match self.ports.states.find(line_user_id).await? {
            Some(state) => state,
            None => ConversationState::idle(line_user_id.clone(), Some(member.id)),
        };
        let mut changed = false;
        if state.member_id() != Some(&member.id) {
            state.link_member(member.id);
            changed = true;
        }

        let intent = decide(state.phase(), &event, &self.ports.catalog);
        let intent_name = intent.name();
        tracing::info!(
            line_user_id = %line_user_id,
            state = %state.lifecycle(),
            event = event.kind(),
            intent = intent_name,
            "Conversation event"
        );

        let step = match self.execute(&member, intent).await {
            Ok(step) => step,
            Err(e) => {
                log_failure(&state, intent_name, &e);
                return Err(e);
            }
        };

        if let Some(next) = step.next {
            state
                .advance(next)
                .map_err(|e| RecordingError::invalid_state(e.to_string()))?;
            changed = true;
        }
        if changed {
            if let Err(e) = self.ports.states.save(&state).await {
                let e = RecordingError::from(e);
                log_failure(&state, intent_name, &e);
                return Err(e);
            }
            state.mark_persisted();
        }

        self.deliver(line_user_id, delivery, &step.messages).await;

        Ok(WorkflowOutcome {
            intent: intent_name,
            state: state.lifecycle(),
            photo_queue_length: queue_length(state.phase()),
        })
    }

    async fn execute(&self, member: &Member, intent: Intent) -> Result<Step, RecordingError> {
        match intent {
            Intent::BeginRecording => self.begin_recording(member).await,
            Intent::StartCooking { dish_id } => {
                let session = CookingSession::start(member.family_space_id, member.id, dish_id);
                self.ports.sessions.save(&session).await?;
                self.append_event(*session.id(), CookingEventKind::Start)
                    .await?;
                let dish_name = self.dish_name(&session);
                Ok(Step::to(
                    ConversationPhase::Cooking {
                        session_id: *session.id(),
                    },
                    vec![OutboundMessage::prompt(Prompt::cooking_actions(dish_name))],
                ))
            }
            Intent::LogCookingAction { session_id, action } => {
                self.log_cooking_action(session_id, action).await
            }
            Intent::RecordServings {
                session_id,
                servings,
            } => {
                let mut session = self.load_session(&session_id).await?;
                session.record_servings(servings);
                self.ports.sessions.update(&session).await?;
                Ok(Step::to(
                    ConversationPhase::SelectingSeasonings { session_id },
                    vec![OutboundMessage::prompt(Prompt::seasoning_picker(
                        &self.settings.liff_base_url,
                        session_id,
                    ))],
                ))
            }
            Intent::RecordSeasonings {
                session_id,
                seasoning_ids,
            } => self.record_seasonings(session_id, seasoning_ids).await,
            Intent::AcceptPhoto {
                session_id,
                seasoning_id,
                classification,
                image_id,
                next,
            } => {
                let path = match self.store_photo(&session_id, &seasoning_id, &image_id).await {
                    Ok(path) => path,
                    Err(reason) => {
                        tracing::warn!(
                            session_id = %session_id,
                            seasoning_id = %seasoning_id,
                            error = %reason,
                            "Failed to store seasoning photo"
                        );
                        return Ok(Step::stay(vec![OutboundMessage::text(
                            replies::PHOTO_FAILED,
                        )]));
                    }
                };
                self.ports
                    .seasonings
                    .insert_if_absent(&SessionSeasoning::record(
                        session_id,
                        seasoning_id,
                        Some(path),
                        classification,
                    ))
                    .await?;

                let thanks = OutboundMessage::text(replies::PHOTO_THANKS);
                let next_head = match &next {
                    ConversationPhase::AwaitingPhoto { photo_queue, .. } => {
                        photo_queue.first().cloned()
                    }
                    _ => None,
                };
                match next_head {
                    Some(head) => {
                        let name = self.ports.catalog.seasoning_name(&head);
                        Ok(Step::to(
                            next,
                            vec![
                                thanks,
                                OutboundMessage::prompt(Prompt::photo_request(name)),
                            ],
                        ))
                    }
                    None => {
                        let mut step = self.finish(&session_id).await?;
                        step.messages.insert(0, thanks);
                        Ok(step)
                    }
                }
            }
            Intent::FinishRecording { session_id } => self.finish(&session_id).await,
            Intent::SaveReply { session_id, text } => {
                let comment = Comment::new(session_id, member.id, text, CommentSource::Line)?;
                self.ports.comments.save(&comment).await?;
                Ok(Step::to(
                    ConversationPhase::Idle,
                    vec![OutboundMessage::text(replies::REPLY_SAVED)],
                ))
            }
            Intent::RejectSubmission => Err(RecordingError::invalid_state(
                "No seasoning selection is pending for this session",
            )),
            Intent::Hint => Ok(Step::stay(vec![OutboundMessage::text(replies::HINT)])),
            Intent::Ignore => Ok(Step::stay(Vec::new())),
        }
    }

    async fn begin_recording(&self, member: &Member) -> Result<Step, RecordingError> {
        let recent = self
            .ports
            .sessions
            .recent_dish_ids(&member.family_space_id, RECENT_SESSION_WINDOW)
            .await?;
        let counts = self
            .ports
            .sessions
            .dish_counts(&member.family_space_id)
            .await?;
        let menu = DishMenu::build(&self.ports.catalog, &recent, &counts);
        Ok(Step::to(
            ConversationPhase::SelectingDish,
            vec![OutboundMessage::prompt(Prompt::dish_selection(menu))],
        ))
    }

    async fn log_cooking_action(
        &self,
        session_id: SessionId,
        action: CookingAction,
    ) -> Result<Step, RecordingError> {
        match action {
            CookingAction::SeasoningAdded => {
                self.append_event(session_id, CookingEventKind::SeasoningAdded)
                    .await?;
                Ok(Step::stay(vec![OutboundMessage::text(
                    replies::SEASONING_ADDED,
                )]))
            }
            CookingAction::Taste(taste) => {
                let mut session = self.load_session(&session_id).await?;
                session.record_taste(taste);
                self.ports.sessions.update(&session).await?;
                self.append_event(session_id, CookingEventKind::Taste(taste))
                    .await?;
                Ok(Step::stay(vec![OutboundMessage::taste_reply(taste)]))
            }
            CookingAction::Complete => {
                self.append_event(session_id, CookingEventKind::Complete)
                    .await?;
                Ok(Step::to(
                    ConversationPhase::SelectingServings { session_id },
                    vec![
                        OutboundMessage::text(replies::COOKING_COMPLETE),
                        OutboundMessage::prompt(Prompt::servings()),
                    ],
                ))
            }
        }
    }

    /// Records the mini-app selection. Seasonings that need a photo are
    /// queued and recorded when their photo arrives; the rest are recorded
    /// now with their classification frozen.
    async fn record_seasonings(
        &self,
        session_id: SessionId,
        seasoning_ids: Vec<SeasoningId>,
    ) -> Result<Step, RecordingError> {
        let session = self.load_session(&session_id).await?;
        let catalog = &self.ports.catalog;

        let mut selected: Vec<SeasoningId> = Vec::with_capacity(seasoning_ids.len());
        for id in seasoning_ids {
            if catalog.seasoning(&id).is_none() {
                return Err(RecordingError::validation(
                    "seasoning_ids",
                    format!("unknown seasoning '{}'", id),
                ));
            }
            if !selected.contains(&id) {
                selected.push(id);
            }
        }

        let dish_id = session.dish_id();
        let mut photo_queue = Vec::new();
        let mut slot_a_seasonings = Vec::new();
        let mut slot_b_seasonings = Vec::new();
        for id in selected {
            let classification = catalog.classify(dish_id, &id);
            if classification.is_slot_a {
                slot_a_seasonings.push(id.clone());
            }
            if classification.is_slot_b {
                slot_b_seasonings.push(id.clone());
            }
            if catalog.requires_photo(dish_id, &id) {
                photo_queue.push(id);
            } else {
                self.ports
                    .seasonings
                    .insert_if_absent(&SessionSeasoning::record(
                        session_id,
                        id,
                        None,
                        classification,
                    ))
                    .await?;
            }
        }

        tracing::info!(
            session_id = %session_id,
            photo_queue_length = photo_queue.len(),
            slot_a = slot_a_seasonings.len(),
            slot_b = slot_b_seasonings.len(),
            "Seasonings selected"
        );

        match photo_queue.first() {
            Some(head) => {
                let name = catalog.seasoning_name(head);
                Ok(Step::to(
                    ConversationPhase::AwaitingPhoto {
                        session_id,
                        photo_queue,
                        slot_a_seasonings,
                        slot_b_seasonings,
                    },
                    vec![OutboundMessage::prompt(Prompt::photo_request(name))],
                ))
            }
            None => self.finish(&session_id).await,
        }
    }

    /// Runs the completion check and ends the recording.
    async fn finish(&self, session_id: &SessionId) -> Result<Step, RecordingError> {
        let session = self.completion.check(session_id).await?;
        let reply = if session.status().is_completed() {
            replies::RECORDING_COMPLETE
        } else {
            replies::RECORDING_SAVED
        };
        Ok(Step::to(
            ConversationPhase::Idle,
            vec![OutboundMessage::text(reply)],
        ))
    }

    async fn store_photo(
        &self,
        session_id: &SessionId,
        seasoning_id: &SeasoningId,
        image_id: &str,
    ) -> Result<String, String> {
        let bytes = self
            .ports
            .messaging
            .fetch_content(image_id)
            .await
            .map_err(|e| e.to_string())?;
        let path = photo_path(
            session_id,
            seasoning_id.as_str(),
            Timestamp::now().as_unix_millis(),
        );
        self.ports
            .photos
            .upload(&path, &bytes, PHOTO_CONTENT_TYPE)
            .await
            .map_err(|e| e.to_string())?;
        Ok(path)
    }

    async fn load_session(&self, session_id: &SessionId) -> Result<CookingSession, RecordingError> {
        self.ports
            .sessions
            .find_by_id(session_id)
            .await?
            .ok_or(RecordingError::SessionNotFound(*session_id))
    }

    async fn append_event(
        &self,
        session_id: SessionId,
        kind: CookingEventKind,
    ) -> Result<(), RecordingError> {
        self.ports
            .events
            .append(&CookingEvent::new(session_id, kind))
            .await?;
        Ok(())
    }

    fn dish_name(&self, session: &CookingSession) -> String {
        self.ports
            .catalog
            .dish(session.dish_id())
            .map(|d| d.name.clone())
            .unwrap_or_else(|| session.dish_id().to_string())
    }

    /// Sends messages; delivery failures never roll back a transition.
    pub(crate) async fn deliver(
        &self,
        line_user_id: &LineUserId,
        delivery: &Delivery,
        messages: &[OutboundMessage],
    ) {
        if messages.is_empty() {
            return;
        }
        let result = match delivery {
            Delivery::Reply(token) => self.ports.messaging.reply(token, messages).await,
            Delivery::Push => self.ports.messaging.push(line_user_id, messages).await,
        };
        if let Err(e) = result {
            tracing::warn!(
                line_user_id = %line_user_id,
                error = %e,
                "Failed to deliver messages"
            );
        }
    }
}

fn queue_length(phase: &ConversationPhase) -> usize {
    match phase {
        ConversationPhase::AwaitingPhoto { photo_queue, .. } => photo_queue.len(),
        _ => 0,
    }
}

fn log_failure(state: &ConversationState, intent: &str, error: &RecordingError) {
    let session_id = state.phase().referenced_session_id();
    match error {
        RecordingError::InvalidState(_) | RecordingError::Validation { .. } => {
            tracing::warn!(
                line_user_id = %state.line_user_id(),
                session_id = ?session_id,
                state = %state.lifecycle(),
                intent,
                error = %error,
                "Conversation event rejected"
            );
        }
        _ => {
            tracing::error!(
                line_user_id = %state.line_user_id(),
                session_id = ?session_id,
                state = %state.lifecycle(),
                intent,
                error = %error,
                "Conversation event failed"
            );
        }
    }
}
