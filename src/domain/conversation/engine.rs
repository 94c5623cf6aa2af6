//! Recording state machine decision function.
//!
//! `decide` maps the current phase and an inbound event to an [`Intent`]:
//! what the application layer must persist, where the conversation goes
//! next and what to tell the user. It performs no I/O; the application
//! layer executes the intent and only then advances the stored state.

use serde::{Deserialize, Serialize};

use super::inbound::{is_start_command, ButtonAction, CookingAction, InboundEvent};
use super::phase::ConversationPhase;
use crate::domain::catalog::{Catalog, SlotClassification};
use crate::domain::cooking::Servings;
use crate::domain::foundation::{DishId, SeasoningId, SessionId};

/// The decision for one inbound event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum Intent {
    /// Send the dish picker and move to `selecting_dish`.
    BeginRecording,
    /// Create a session for the dish and move to `cooking`.
    StartCooking { dish_id: DishId },
    /// Log a cooking action; `complete` moves to `selecting_servings`.
    LogCookingAction {
        session_id: SessionId,
        action: CookingAction,
    },
    /// Store servings and move to `selecting_seasonings`.
    RecordServings {
        session_id: SessionId,
        servings: Servings,
    },
    /// Classify and record the mini-app selection.
    RecordSeasonings {
        session_id: SessionId,
        seasoning_ids: Vec<SeasoningId>,
    },
    /// Store the photo for the queue head, then go to `next`.
    AcceptPhoto {
        session_id: SessionId,
        seasoning_id: SeasoningId,
        classification: SlotClassification,
        image_id: String,
        next: ConversationPhase,
    },
    /// Photo arrived with nothing queued: run the completion check.
    FinishRecording { session_id: SessionId },
    /// Save the text as the cook's answer on the session.
    SaveReply { session_id: SessionId, text: String },
    /// Mini-app submission for a session that is not awaiting one.
    RejectSubmission,
    /// Reply with the generic hint, no state change.
    Hint,
    /// Do nothing, say nothing.
    Ignore,
}

impl Intent {
    pub fn name(&self) -> &'static str {
        match self {
            Intent::BeginRecording => "begin_recording",
            Intent::StartCooking { .. } => "start_cooking",
            Intent::LogCookingAction { .. } => "log_cooking_action",
            Intent::RecordServings { .. } => "record_servings",
            Intent::RecordSeasonings { .. } => "record_seasonings",
            Intent::AcceptPhoto { .. } => "accept_photo",
            Intent::FinishRecording { .. } => "finish_recording",
            Intent::SaveReply { .. } => "save_reply",
            Intent::RejectSubmission => "reject_submission",
            Intent::Hint => "hint",
            Intent::Ignore => "ignore",
        }
    }
}

/// Decides what an inbound event means in the current phase.
pub fn decide(phase: &ConversationPhase, event: &InboundEvent, catalog: &Catalog) -> Intent {
    if let InboundEvent::Text { text } = event {
        if is_start_command(text) {
            return Intent::BeginRecording;
        }
    }

    if let InboundEvent::SeasoningsSelected {
        session_id,
        seasoning_ids,
    } = event
    {
        return match phase {
            ConversationPhase::SelectingSeasonings {
                session_id: active,
            } if active == session_id => Intent::RecordSeasonings {
                session_id: *session_id,
                seasoning_ids: seasoning_ids.clone(),
            },
            _ => Intent::RejectSubmission,
        };
    }

    let unrecognized = if phase.lifecycle().ignores_unexpected_messages() {
        Intent::Ignore
    } else {
        Intent::Hint
    };

    match (phase, event) {
        (
            ConversationPhase::SelectingDish,
            InboundEvent::Button {
                action: ButtonAction::SelectDish(dish_id),
            },
        ) => match catalog.dish(dish_id) {
            Some(_) => Intent::StartCooking {
                dish_id: dish_id.clone(),
            },
            None => Intent::Hint,
        },

        (
            ConversationPhase::Cooking { session_id },
            InboundEvent::Button {
                action: ButtonAction::Cooking(action),
            },
        ) => Intent::LogCookingAction {
            session_id: *session_id,
            action: *action,
        },

        (
            ConversationPhase::SelectingServings { session_id },
            InboundEvent::Button {
                action: ButtonAction::Servings(value),
            },
        ) => match Servings::new(*value) {
            Ok(servings) => Intent::RecordServings {
                session_id: *session_id,
                servings,
            },
            Err(_) => Intent::Hint,
        },

        (
            ConversationPhase::AwaitingPhoto {
                session_id,
                photo_queue,
                slot_a_seasonings,
                slot_b_seasonings,
            },
            InboundEvent::Image { image_id },
        ) => match photo_queue.split_first() {
            Some((head, rest)) => {
                let next = if rest.is_empty() {
                    ConversationPhase::Idle
                } else {
                    ConversationPhase::AwaitingPhoto {
                        session_id: *session_id,
                        photo_queue: rest.to_vec(),
                        slot_a_seasonings: slot_a_seasonings.clone(),
                        slot_b_seasonings: slot_b_seasonings.clone(),
                    }
                };
                Intent::AcceptPhoto {
                    session_id: *session_id,
                    seasoning_id: head.clone(),
                    classification: SlotClassification {
                        is_slot_a: slot_a_seasonings.contains(head),
                        is_slot_b: slot_b_seasonings.contains(head),
                    },
                    image_id: image_id.clone(),
                    next,
                }
            }
            None => Intent::FinishRecording {
                session_id: *session_id,
            },
        },

        (ConversationPhase::AwaitingReply { session_id }, InboundEvent::Text { text })
            if !text.trim().is_empty() =>
        {
            Intent::SaveReply {
                session_id: *session_id,
                text: text.clone(),
            }
        }

        _ => unrecognized,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cooking::TasteStatus;

    fn catalog() -> std::sync::Arc<Catalog> {
        Catalog::builtin().unwrap()
    }

    fn seasoning(id: &str) -> SeasoningId {
        SeasoningId::new(id).unwrap()
    }

    fn awaiting_photo(session_id: SessionId, queue: &[&str]) -> ConversationPhase {
        ConversationPhase::AwaitingPhoto {
            session_id,
            photo_queue: queue.iter().map(|s| seasoning(s)).collect(),
            slot_a_seasonings: vec![seasoning("miso_red")],
            slot_b_seasonings: vec![seasoning("dashi_powder")],
        }
    }

    mod start {
        use super::*;

        #[test]
        fn start_from_idle_begins_recording() {
            let intent = decide(&ConversationPhase::Idle, &InboundEvent::text("開始"), &catalog());
            assert_eq!(intent, Intent::BeginRecording);
        }

        #[test]
        fn start_is_honoured_mid_recording() {
            let phase = ConversationPhase::Cooking {
                session_id: SessionId::new(),
            };
            let intent = decide(&phase, &InboundEvent::text("Start"), &catalog());
            assert_eq!(intent, Intent::BeginRecording);
        }

        #[test]
        fn start_is_honoured_while_awaiting_reply() {
            let phase = ConversationPhase::AwaitingReply {
                session_id: SessionId::new(),
            };
            let intent = decide(&phase, &InboundEvent::text("はじめる"), &catalog());
            assert_eq!(intent, Intent::BeginRecording);
        }

        #[test]
        fn other_text_in_idle_gets_hint() {
            let intent = decide(&ConversationPhase::Idle, &InboundEvent::text("hello"), &catalog());
            assert_eq!(intent, Intent::Hint);
        }
    }

    mod dish_selection {
        use super::*;

        #[test]
        fn known_dish_starts_cooking() {
            let intent = decide(
                &ConversationPhase::SelectingDish,
                &InboundEvent::postback("select_dish:misoshiru"),
                &catalog(),
            );
            assert_eq!(
                intent,
                Intent::StartCooking {
                    dish_id: DishId::new("misoshiru").unwrap()
                }
            );
        }

        #[test]
        fn unknown_dish_gets_hint() {
            let intent = decide(
                &ConversationPhase::SelectingDish,
                &InboundEvent::postback("select_dish:sushi"),
                &catalog(),
            );
            assert_eq!(intent, Intent::Hint);
        }

        #[test]
        fn dish_postback_outside_selecting_dish_gets_hint() {
            let intent = decide(
                &ConversationPhase::Idle,
                &InboundEvent::postback("select_dish:curry"),
                &catalog(),
            );
            assert_eq!(intent, Intent::Hint);
        }
    }

    mod cooking {
        use super::*;

        #[test]
        fn taste_action_is_logged_for_active_session() {
            let session_id = SessionId::new();
            let intent = decide(
                &ConversationPhase::Cooking { session_id },
                &InboundEvent::postback("cooking:taste_thin"),
                &catalog(),
            );
            assert_eq!(
                intent,
                Intent::LogCookingAction {
                    session_id,
                    action: CookingAction::Taste(TasteStatus::Thin),
                }
            );
        }

        #[test]
        fn unknown_cooking_action_gets_hint() {
            let intent = decide(
                &ConversationPhase::Cooking {
                    session_id: SessionId::new(),
                },
                &InboundEvent::postback("cooking:unknown_action"),
                &catalog(),
            );
            assert_eq!(intent, Intent::Hint);
        }

        #[test]
        fn stale_cooking_button_after_completion_gets_hint() {
            let intent = decide(
                &ConversationPhase::SelectingServings {
                    session_id: SessionId::new(),
                },
                &InboundEvent::postback("cooking:complete"),
                &catalog(),
            );
            assert_eq!(intent, Intent::Hint);
        }
    }

    mod servings {
        use super::*;

        #[test]
        fn valid_servings_are_recorded() {
            let session_id = SessionId::new();
            let intent = decide(
                &ConversationPhase::SelectingServings { session_id },
                &InboundEvent::postback("servings:4"),
                &catalog(),
            );
            assert_eq!(
                intent,
                Intent::RecordServings {
                    session_id,
                    servings: Servings::new(4).unwrap(),
                }
            );
        }

        #[test]
        fn zero_servings_gets_hint() {
            let intent = decide(
                &ConversationPhase::SelectingServings {
                    session_id: SessionId::new(),
                },
                &InboundEvent::postback("servings:0"),
                &catalog(),
            );
            assert_eq!(intent, Intent::Hint);
        }
    }

    mod seasonings {
        use super::*;

        #[test]
        fn submission_for_active_session_is_recorded() {
            let session_id = SessionId::new();
            let event = InboundEvent::SeasoningsSelected {
                session_id,
                seasoning_ids: vec![seasoning("miso_red")],
            };
            let intent = decide(
                &ConversationPhase::SelectingSeasonings { session_id },
                &event,
                &catalog(),
            );
            assert!(matches!(intent, Intent::RecordSeasonings { .. }));
        }

        #[test]
        fn submission_for_other_session_is_rejected() {
            let event = InboundEvent::SeasoningsSelected {
                session_id: SessionId::new(),
                seasoning_ids: vec![seasoning("miso_red")],
            };
            let intent = decide(
                &ConversationPhase::SelectingSeasonings {
                    session_id: SessionId::new(),
                },
                &event,
                &catalog(),
            );
            assert_eq!(intent, Intent::RejectSubmission);
        }

        #[test]
        fn submission_in_wrong_state_is_rejected() {
            let session_id = SessionId::new();
            let event = InboundEvent::SeasoningsSelected {
                session_id,
                seasoning_ids: vec![],
            };
            let intent = decide(&ConversationPhase::Cooking { session_id }, &event, &catalog());
            assert_eq!(intent, Intent::RejectSubmission);
        }
    }

    mod photos {
        use super::*;

        #[test]
        fn first_photo_pops_queue_head_and_keeps_slot_lists() {
            let session_id = SessionId::new();
            let phase = awaiting_photo(session_id, &["miso_red", "dashi_powder"]);

            let intent = decide(&phase, &InboundEvent::image("img-1"), &catalog());

            assert_eq!(
                intent,
                Intent::AcceptPhoto {
                    session_id,
                    seasoning_id: seasoning("miso_red"),
                    classification: SlotClassification {
                        is_slot_a: true,
                        is_slot_b: false,
                    },
                    image_id: "img-1".to_string(),
                    next: awaiting_photo(session_id, &["dashi_powder"]),
                }
            );
        }

        #[test]
        fn last_photo_leads_to_idle() {
            let session_id = SessionId::new();
            let phase = awaiting_photo(session_id, &["dashi_powder"]);

            let Intent::AcceptPhoto {
                next,
                classification,
                ..
            } = decide(&phase, &InboundEvent::image("img-2"), &catalog())
            else {
                panic!("expected photo acceptance");
            };

            assert_eq!(next, ConversationPhase::Idle);
            assert!(classification.is_slot_b);
        }

        #[test]
        fn photo_with_empty_queue_finishes_recording() {
            let session_id = SessionId::new();
            let intent = decide(
                &awaiting_photo(session_id, &[]),
                &InboundEvent::image("img"),
                &catalog(),
            );
            assert_eq!(intent, Intent::FinishRecording { session_id });
        }

        #[test]
        fn text_while_awaiting_photo_is_ignored() {
            let phase = awaiting_photo(SessionId::new(), &["miso_red"]);
            let intent = decide(&phase, &InboundEvent::text("here you go"), &catalog());
            assert_eq!(intent, Intent::Ignore);
        }

        #[test]
        fn image_outside_awaiting_photo_gets_hint() {
            let intent = decide(&ConversationPhase::Idle, &InboundEvent::image("img"), &catalog());
            assert_eq!(intent, Intent::Hint);
        }
    }

    mod replies {
        use super::*;

        #[test]
        fn text_while_awaiting_reply_is_saved() {
            let session_id = SessionId::new();
            let intent = decide(
                &ConversationPhase::AwaitingReply { session_id },
                &InboundEvent::text("Two spoons of miso"),
                &catalog(),
            );
            assert_eq!(
                intent,
                Intent::SaveReply {
                    session_id,
                    text: "Two spoons of miso".to_string(),
                }
            );
        }

        #[test]
        fn image_while_awaiting_reply_is_ignored() {
            let intent = decide(
                &ConversationPhase::AwaitingReply {
                    session_id: SessionId::new(),
                },
                &InboundEvent::image("img"),
                &catalog(),
            );
            assert_eq!(intent, Intent::Ignore);
        }
    }
}
