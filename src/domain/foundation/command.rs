//! Command metadata and the acting principal.
//!
//! Writes arrive from two very different places: the chat platform (webhook
//! deliveries and mini-app submissions, trusted after signature checks) and
//! authenticated family members acting through the web surface. Handlers
//! receive a `CommandMetadata` naming which of the two is acting so the
//! platform path never runs with a member's capabilities and vice versa.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::MemberId;

/// Principal on whose behalf a command executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Actor {
    /// Trusted internal actor for platform-triggered writes.
    Platform,
    /// A family member authenticated by the web surface.
    Member(MemberId),
}

impl Actor {
    pub fn is_platform(&self) -> bool {
        matches!(self, Actor::Platform)
    }

    /// Returns the member id when the actor is a member.
    pub fn member_id(&self) -> Option<MemberId> {
        match self {
            Actor::Platform => None,
            Actor::Member(id) => Some(*id),
        }
    }
}

/// Metadata context for command handlers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandMetadata {
    pub actor: Actor,

    #[serde(skip_serializing_if = "Option::is_none")]
    correlation_id: Option<String>,

    /// Source of this command (e.g. "webhook", "liff", "api").
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<String>,
}

impl CommandMetadata {
    /// Metadata for a platform-triggered command.
    pub fn platform() -> Self {
        Self::new(Actor::Platform)
    }

    /// Metadata for a command issued by a member.
    pub fn member(member_id: MemberId) -> Self {
        Self::new(Actor::Member(member_id))
    }

    pub fn new(actor: Actor) -> Self {
        Self {
            actor,
            correlation_id: None,
            source: None,
        }
    }

    /// Builder: Add correlation ID for request tracing.
    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }

    /// Builder: Add source identifier.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Returns the correlation ID, generating one if not set.
    pub fn correlation_id(&self) -> String {
        self.correlation_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string())
    }

    /// Returns the source if set.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_metadata_has_no_member() {
        let metadata = CommandMetadata::platform();
        assert!(metadata.actor.is_platform());
        assert_eq!(metadata.actor.member_id(), None);
    }

    #[test]
    fn member_metadata_carries_member_id() {
        let id = MemberId::new();
        let metadata = CommandMetadata::member(id).with_source("api");
        assert!(!metadata.actor.is_platform());
        assert_eq!(metadata.actor.member_id(), Some(id));
        assert_eq!(metadata.source(), Some("api"));
    }

    #[test]
    fn correlation_id_returns_set_value() {
        let metadata = CommandMetadata::platform().with_correlation_id("webhook-1");
        assert_eq!(metadata.correlation_id(), "webhook-1");
    }

    #[test]
    fn correlation_id_generates_if_missing() {
        assert!(!CommandMetadata::platform().correlation_id().is_empty());
    }

    #[test]
    fn serialization_skips_none_fields() {
        let json = serde_json::to_string(&CommandMetadata::platform()).unwrap();
        assert!(json.contains("\"platform\""));
        assert!(!json.contains("correlation_id"));
        assert!(!json.contains("source"));
    }
}
