//! Conversation lifecycle states.
//!
//! Defines where a chat identity is within the multi-turn recording flow
//! and which moves between those positions are legal.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{StateMachine, ValidationError};

/// The lifecycle state of a LINE conversation.
///
/// - `Idle`: nothing in flight
/// - `SelectingDish`: dish picker was sent
/// - `Cooking`: session started, cooking buttons active
/// - `SelectingServings`: cooking finished, servings picker sent
/// - `SelectingSeasonings`: mini-app link sent
/// - `AwaitingPhoto`: photo-required seasonings queued
/// - `AwaitingReply`: a viewer asked a question, next text is the answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    #[default]
    Idle,
    SelectingDish,
    Cooking,
    SelectingServings,
    SelectingSeasonings,
    AwaitingPhoto,
    AwaitingReply,
}

impl LifecycleState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::SelectingDish => "selecting_dish",
            Self::Cooking => "cooking",
            Self::SelectingServings => "selecting_servings",
            Self::SelectingSeasonings => "selecting_seasonings",
            Self::AwaitingPhoto => "awaiting_photo",
            Self::AwaitingReply => "awaiting_reply",
        }
    }

    /// States where unexpected message types are dropped without a reply.
    pub fn ignores_unexpected_messages(&self) -> bool {
        matches!(self, Self::AwaitingPhoto | Self::AwaitingReply)
    }
}

impl StateMachine for LifecycleState {
    fn can_transition_to(&self, target: &Self) -> bool {
        use LifecycleState::*;
        matches!(
            (self, target),
            // "start" is honoured everywhere
            (_, SelectingDish) |
            (SelectingDish, Cooking) |
            (Cooking, SelectingServings) |
            (SelectingServings, SelectingSeasonings) |
            (SelectingSeasonings, AwaitingPhoto) |
            (SelectingSeasonings, Idle) |
            (AwaitingPhoto, AwaitingPhoto) |
            (AwaitingPhoto, Idle) |
            (Idle, AwaitingReply) |
            (AwaitingReply, AwaitingReply) |
            (AwaitingReply, Idle)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use LifecycleState::*;
        match self {
            Idle => vec![SelectingDish, AwaitingReply],
            SelectingDish => vec![SelectingDish, Cooking],
            Cooking => vec![SelectingDish, SelectingServings],
            SelectingServings => vec![SelectingDish, SelectingSeasonings],
            SelectingSeasonings => vec![SelectingDish, AwaitingPhoto, Idle],
            AwaitingPhoto => vec![SelectingDish, AwaitingPhoto, Idle],
            AwaitingReply => vec![SelectingDish, AwaitingReply, Idle],
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for LifecycleState {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use LifecycleState::*;
        match s {
            "idle" => Ok(Idle),
            "selecting_dish" => Ok(SelectingDish),
            "cooking" => Ok(Cooking),
            "selecting_servings" => Ok(SelectingServings),
            "selecting_seasonings" => Ok(SelectingSeasonings),
            "awaiting_photo" => Ok(AwaitingPhoto),
            "awaiting_reply" => Ok(AwaitingReply),
            other => Err(ValidationError::invalid_format(
                "state",
                format!("unknown conversation state '{}'", other),
            )),
        }
    }
}
