//! Inbound events, abstracted from the chat transport.

use serde::{Deserialize, Serialize};

use crate::domain::cooking::TasteStatus;
use crate::domain::foundation::{DishId, SeasoningId, SessionId};

/// Texts that start a new recording.
pub const START_COMMANDS: [&str; 3] = ["start", "開始", "はじめる"];

/// Returns true if the text is one of the start commands.
///
/// Matching is case-insensitive and ignores surrounding whitespace.
pub fn is_start_command(text: &str) -> bool {
    let normalized = text.trim().to_lowercase();
    START_COMMANDS.iter().any(|c| *c == normalized)
}

/// An event the recording state machine consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundEvent {
    Text { text: String },
    Button { action: ButtonAction },
    Image { image_id: String },
    /// Out-of-band submission from the seasoning mini-app.
    SeasoningsSelected {
        session_id: SessionId,
        seasoning_ids: Vec<SeasoningId>,
    },
    /// Any other message type (stickers, locations, ...).
    Unsupported,
}

impl InboundEvent {
    pub fn text(text: impl Into<String>) -> Self {
        InboundEvent::Text { text: text.into() }
    }

    /// Builds a button event from raw postback data.
    pub fn postback(data: &str) -> Self {
        InboundEvent::Button {
            action: ButtonAction::parse(data),
        }
    }

    pub fn image(image_id: impl Into<String>) -> Self {
        InboundEvent::Image {
            image_id: image_id.into(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            InboundEvent::Text { .. } => "text",
            InboundEvent::Button { .. } => "postback",
            InboundEvent::Image { .. } => "image",
            InboundEvent::SeasoningsSelected { .. } => "seasonings_selected",
            InboundEvent::Unsupported => "unsupported",
        }
    }
}

/// A cooking-card action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CookingAction {
    SeasoningAdded,
    Taste(TasteStatus),
    Complete,
}

/// A parsed `<actionKey>:<actionValue>` postback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonAction {
    SelectDish(DishId),
    Cooking(CookingAction),
    /// Servings value as sent; validated by the state machine.
    Servings(i32),
    /// Recognized key with a value that key does not define.
    Malformed { key: String, value: String },
    /// Unrecognized key.
    Unknown(String),
}

impl ButtonAction {
    /// Parses postback data; never fails, unknown input becomes a variant.
    pub fn parse(data: &str) -> Self {
        let (key, value) = data.split_once(':').unwrap_or((data, ""));
        let malformed = || ButtonAction::Malformed {
            key: key.to_string(),
            value: value.to_string(),
        };

        match key {
            "select_dish" => DishId::new(value)
                .map(ButtonAction::SelectDish)
                .unwrap_or_else(|_| malformed()),
            "cooking" => match value {
                "seasoning_added" => ButtonAction::Cooking(CookingAction::SeasoningAdded),
                "complete" => ButtonAction::Cooking(CookingAction::Complete),
                other => other
                    .strip_prefix("taste_")
                    .and_then(|t| t.parse::<TasteStatus>().ok())
                    .map(|t| ButtonAction::Cooking(CookingAction::Taste(t)))
                    .unwrap_or_else(malformed),
            },
            "servings" => value
                .trim()
                .parse::<i32>()
                .map(ButtonAction::Servings)
                .unwrap_or_else(|_| malformed()),
            other => ButtonAction::Unknown(other.to_string()),
        }
    }

    /// Renders the action back into postback data.
    pub fn to_data(&self) -> String {
        match self {
            ButtonAction::SelectDish(dish) => format!("select_dish:{}", dish),
            ButtonAction::Cooking(CookingAction::SeasoningAdded) => {
                "cooking:seasoning_added".to_string()
            }
            ButtonAction::Cooking(CookingAction::Taste(t)) => format!("cooking:taste_{}", t),
            ButtonAction::Cooking(CookingAction::Complete) => "cooking:complete".to_string(),
            ButtonAction::Servings(n) => format!("servings:{}", n),
            ButtonAction::Malformed { key, value } => format!("{}:{}", key, value),
            ButtonAction::Unknown(key) => key.clone(),
        }
    }
}
