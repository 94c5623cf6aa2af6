//! Typed per-state payload of a conversation.
//!
//! Each variant carries exactly the data its lifecycle state needs, so a
//! state change can never leave stale fields from the previous state behind.

use serde::{Deserialize, Serialize};

use super::state::LifecycleState;
use crate::domain::foundation::{SeasoningId, SessionId};

/// Where a conversation is, together with the data that position requires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum ConversationPhase {
    #[default]
    Idle,
    SelectingDish,
    Cooking {
        session_id: SessionId,
    },
    SelectingServings {
        session_id: SessionId,
    },
    SelectingSeasonings {
        session_id: SessionId,
    },
    AwaitingPhoto {
        session_id: SessionId,
        photo_queue: Vec<SeasoningId>,
        slot_a_seasonings: Vec<SeasoningId>,
        slot_b_seasonings: Vec<SeasoningId>,
    },
    AwaitingReply {
        /// Session the answered question was asked on.
        session_id: SessionId,
    },
}

impl ConversationPhase {
    pub fn lifecycle(&self) -> LifecycleState {
        match self {
            Self::Idle => LifecycleState::Idle,
            Self::SelectingDish => LifecycleState::SelectingDish,
            Self::Cooking { .. } => LifecycleState::Cooking,
            Self::SelectingServings { .. } => LifecycleState::SelectingServings,
            Self::SelectingSeasonings { .. } => LifecycleState::SelectingSeasonings,
            Self::AwaitingPhoto { .. } => LifecycleState::AwaitingPhoto,
            Self::AwaitingReply { .. } => LifecycleState::AwaitingReply,
        }
    }

    /// The in-progress cooking session, if any.
    ///
    /// `AwaitingReply` references a session but is not recording it, so it
    /// reports no active session.
    pub fn active_session_id(&self) -> Option<SessionId> {
        match self {
            Self::Cooking { session_id }
            | Self::SelectingServings { session_id }
            | Self::SelectingSeasonings { session_id }
            | Self::AwaitingPhoto { session_id, .. } => Some(*session_id),
            Self::Idle | Self::SelectingDish | Self::AwaitingReply { .. } => None,
        }
    }

    /// Any session referenced by the phase, recording or not.
    pub fn referenced_session_id(&self) -> Option<SessionId> {
        match self {
            Self::AwaitingReply { session_id } => Some(*session_id),
            other => other.active_session_id(),
        }
    }

    /// Splits the phase into the stored `(state, state_data)` pair.
    ///
    /// Unit variants store an empty object.
    pub fn to_storage(&self) -> (LifecycleState, serde_json::Value) {
        let data = serde_json::to_value(self)
            .ok()
            .and_then(|mut v| v.get_mut("data").map(serde_json::Value::take))
            .unwrap_or_else(|| serde_json::json!({}));
        (self.lifecycle(), data)
    }

    /// Rebuilds a phase from the stored `(state, state_data)` pair.
    pub fn from_storage(
        state: LifecycleState,
        data: serde_json::Value,
    ) -> Result<Self, serde_json::Error> {
        let is_empty = match &data {
            serde_json::Value::Null => true,
            serde_json::Value::Object(map) => map.is_empty(),
            _ => false,
        };
        let tagged = if is_empty {
            serde_json::json!({ "state": state.as_str() })
        } else {
            serde_json::json!({ "state": state.as_str(), "data": data })
        };
        serde_json::from_value(tagged)
    }
}
