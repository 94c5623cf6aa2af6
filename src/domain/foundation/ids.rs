//! Strongly-typed identifier value objects.
//!
//! Database-generated entities use UUID identifiers. Chat-platform identities
//! and catalog keys are opaque strings that must never be empty.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::ValidationError;

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates an identifier from an existing UUID.
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $field:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates the identifier, rejecting empty or blank input.
            pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
                let id = id.into();
                if id.trim().is_empty() {
                    return Err(ValidationError::empty_field($field));
                }
                Ok(Self(id))
            }

            /// Returns the inner string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }
    };
}

uuid_id!(
    /// Unique identifier for a cooking session (one recording attempt).
    SessionId
);

uuid_id!(
    /// Unique identifier for a family space (the tenant boundary).
    FamilySpaceId
);

uuid_id!(
    /// Unique identifier for a member of a family space.
    MemberId
);

uuid_id!(
    /// Unique identifier for a comment on a cooking session.
    CommentId
);

uuid_id!(
    /// Unique identifier for an appended cooking event row.
    CookingEventId
);

uuid_id!(
    /// Unique identifier for a recorded session seasoning row.
    SessionSeasoningId
);

string_id!(
    /// Stable chat-platform identity of a user (LINE user id).
    LineUserId,
    "line_user_id"
);

string_id!(
    /// Catalog key of a dish (e.g. `misoshiru`).
    DishId,
    "dish_id"
);

string_id!(
    /// Catalog key of a seasoning (e.g. `miso_red`).
    SeasoningId,
    "seasoning_id"
);

string_id!(
    /// Catalog key of a dish template (e.g. `soup`).
    TemplateKey,
    "template_key"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_id_generates_unique_values() {
        assert_ne!(SessionId::new(), SessionId::new());
    }

    #[test]
    fn session_id_parses_from_string() {
        let id = SessionId::new();
        let parsed: SessionId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn session_id_rejects_garbage() {
        assert!("not-a-uuid".parse::<SessionId>().is_err());
    }

    #[test]
    fn uuid_ids_serialize_transparently() {
        let uuid = Uuid::new_v4();
        let id = MemberId::from_uuid(uuid);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", uuid));
    }

    #[test]
    fn line_user_id_rejects_empty() {
        assert!(LineUserId::new("").is_err());
        assert!(LineUserId::new("   ").is_err());
    }

    #[test]
    fn dish_id_roundtrips_through_json() {
        let id = DishId::new("misoshiru").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"misoshiru\"");
        let back: DishId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn seasoning_id_deserialization_rejects_empty() {
        let result: Result<SeasoningId, _> = serde_json::from_str("\"\"");
        assert!(result.is_err());
    }
}
