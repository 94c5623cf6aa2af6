//! Append-only records owned by a cooking session.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::values::TasteStatus;
use crate::domain::catalog::SlotClassification;
use crate::domain::foundation::{
    CommentId, CookingEventId, MemberId, SeasoningId, SessionId, SessionSeasoningId, Timestamp,
    ValidationError,
};

/// Kind of a logged cooking action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum CookingEventKind {
    Start,
    SeasoningAdded,
    Taste(TasteStatus),
    Complete,
}

impl CookingEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CookingEventKind::Start => "start",
            CookingEventKind::SeasoningAdded => "seasoning_added",
            CookingEventKind::Taste(TasteStatus::Thin) => "taste_thin",
            CookingEventKind::Taste(TasteStatus::Perfect) => "taste_perfect",
            CookingEventKind::Taste(TasteStatus::Thick) => "taste_thick",
            CookingEventKind::Complete => "complete",
        }
    }
}

impl fmt::Display for CookingEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CookingEventKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start" => Ok(CookingEventKind::Start),
            "seasoning_added" => Ok(CookingEventKind::SeasoningAdded),
            "complete" => Ok(CookingEventKind::Complete),
            other => match other.strip_prefix("taste_") {
                Some(taste) => Ok(CookingEventKind::Taste(taste.parse()?)),
                None => Err(ValidationError::invalid_format(
                    "event_type",
                    format!("unknown cooking event '{}'", other),
                )),
            },
        }
    }
}

impl From<CookingEventKind> for String {
    fn from(kind: CookingEventKind) -> Self {
        kind.as_str().to_string()
    }
}

impl TryFrom<String> for CookingEventKind {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// One logged user action. Never mutated or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookingEvent {
    pub id: CookingEventId,
    pub session_id: SessionId,
    pub kind: CookingEventKind,
    pub created_at: Timestamp,
}

impl CookingEvent {
    pub fn new(session_id: SessionId, kind: CookingEventKind) -> Self {
        Self {
            id: CookingEventId::new(),
            session_id,
            kind,
            created_at: Timestamp::now(),
        }
    }
}

/// A seasoning recorded for a session with slot flags frozen at insertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSeasoning {
    id: SessionSeasoningId,
    session_id: SessionId,
    seasoning_id: SeasoningId,
    photo_path: Option<String>,
    classification: SlotClassification,
    created_at: Timestamp,
}

impl SessionSeasoning {
    pub fn record(
        session_id: SessionId,
        seasoning_id: SeasoningId,
        photo_path: Option<String>,
        classification: SlotClassification,
    ) -> Self {
        Self {
            id: SessionSeasoningId::new(),
            session_id,
            seasoning_id,
            photo_path,
            classification,
            created_at: Timestamp::now(),
        }
    }

    pub fn reconstitute(
        id: SessionSeasoningId,
        session_id: SessionId,
        seasoning_id: SeasoningId,
        photo_path: Option<String>,
        classification: SlotClassification,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            session_id,
            seasoning_id,
            photo_path,
            classification,
            created_at,
        }
    }

    pub fn id(&self) -> &SessionSeasoningId {
        &self.id
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn seasoning_id(&self) -> &SeasoningId {
        &self.seasoning_id
    }

    pub fn photo_path(&self) -> Option<&str> {
        self.photo_path.as_deref()
    }

    pub fn is_slot_a(&self) -> bool {
        self.classification.is_slot_a
    }

    pub fn is_slot_b(&self) -> bool {
        self.classification.is_slot_b
    }

    pub fn classification(&self) -> SlotClassification {
        self.classification
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }
}

/// Where a comment was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentSource {
    Web,
    Line,
}

impl CommentSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommentSource::Web => "web",
            CommentSource::Line => "line",
        }
    }
}

impl FromStr for CommentSource {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "web" => Ok(CommentSource::Web),
            "line" => Ok(CommentSource::Line),
            other => Err(ValidationError::invalid_format(
                "source",
                format!("unknown comment source '{}'", other),
            )),
        }
    }
}

/// Maximum length for comment content, in characters.
pub const MAX_COMMENT_LENGTH: usize = 2000;

/// A question or answer attached to a cooking session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub session_id: SessionId,
    pub member_id: MemberId,
    pub content: String,
    pub source: CommentSource,
    pub created_at: Timestamp,
}

impl Comment {
    /// Creates a comment, rejecting blank or oversized content.
    pub fn new(
        session_id: SessionId,
        member_id: MemberId,
        content: impl Into<String>,
        source: CommentSource,
    ) -> Result<Self, ValidationError> {
        let content = content.into();
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::empty_field("content"));
        }
        let length = trimmed.chars().count();
        if length > MAX_COMMENT_LENGTH {
            return Err(ValidationError::out_of_range(
                "content",
                1,
                MAX_COMMENT_LENGTH as i32,
                length as i32,
            ));
        }
        Ok(Self {
            id: CommentId::new(),
            session_id,
            member_id,
            content: trimmed.to_string(),
            source,
            created_at: Timestamp::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_kind_parses_taste_variants() {
        assert_eq!(
            "taste_perfect".parse::<CookingEventKind>(),
            Ok(CookingEventKind::Taste(TasteStatus::Perfect))
        );
        assert_eq!(
            CookingEventKind::Taste(TasteStatus::Thin).as_str(),
            "taste_thin"
        );
    }

    #[test]
    fn event_kind_rejects_unknown() {
        assert!("taste_salty".parse::<CookingEventKind>().is_err());
        assert!("explode".parse::<CookingEventKind>().is_err());
    }

    #[test]
    fn session_seasoning_exposes_frozen_flags() {
        let record = SessionSeasoning::record(
            SessionId::new(),
            SeasoningId::new("miso_red").unwrap(),
            Some("s/miso_red_1.jpg".to_string()),
            SlotClassification {
                is_slot_a: true,
                is_slot_b: false,
            },
        );
        assert!(record.is_slot_a());
        assert!(!record.is_slot_b());
        assert_eq!(record.photo_path(), Some("s/miso_red_1.jpg"));
    }

    #[test]
    fn comment_trims_content() {
        let comment = Comment::new(
            SessionId::new(),
            MemberId::new(),
            "  how much miso?  ",
            CommentSource::Web,
        )
        .unwrap();
        assert_eq!(comment.content, "how much miso?");
    }

    #[test]
    fn comment_rejects_blank_content() {
        let result = Comment::new(SessionId::new(), MemberId::new(), "   ", CommentSource::Line);
        assert!(matches!(result, Err(ValidationError::EmptyField { .. })));
    }

    #[test]
    fn comment_rejects_oversized_content() {
        let long = "あ".repeat(MAX_COMMENT_LENGTH + 1);
        let result = Comment::new(SessionId::new(), MemberId::new(), long, CommentSource::Web);
        assert!(matches!(result, Err(ValidationError::OutOfRange { .. })));
    }
}
