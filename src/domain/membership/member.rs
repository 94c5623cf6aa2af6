//! Family space members.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{FamilySpaceId, LineUserId, MemberId, ValidationError};

/// Role of a member inside a family space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberRole {
    Admin,
    /// Records dishes over LINE and answers questions.
    Editor,
    /// Browses recipes and asks questions on the web.
    Viewer,
}

impl MemberRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberRole::Admin => "admin",
            MemberRole::Editor => "editor",
            MemberRole::Viewer => "viewer",
        }
    }
}

impl fmt::Display for MemberRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MemberRole {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(MemberRole::Admin),
            "editor" => Ok(MemberRole::Editor),
            "viewer" => Ok(MemberRole::Viewer),
            other => Err(ValidationError::invalid_format(
                "role",
                format!("unknown member role '{}'", other),
            )),
        }
    }
}

/// A participant in a family space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub family_space_id: FamilySpaceId,
    pub line_user_id: Option<LineUserId>,
    pub display_name: String,
    pub role: MemberRole,
}

impl Member {
    /// True when the member belongs to the given family space.
    pub fn belongs_to(&self, family_space_id: &FamilySpaceId) -> bool {
        &self.family_space_id == family_space_id
    }

    /// Editors reachable over LINE receive comment notifications.
    pub fn is_notifiable_editor(&self) -> bool {
        self.role == MemberRole::Editor && self.line_user_id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(role: MemberRole, line: Option<&str>) -> Member {
        Member {
            id: MemberId::new(),
            family_space_id: FamilySpaceId::new(),
            line_user_id: line.map(|l| LineUserId::new(l).unwrap()),
            display_name: "Mom".to_string(),
            role,
        }
    }

    #[test]
    fn role_parses_lowercase_names() {
        assert_eq!("editor".parse::<MemberRole>(), Ok(MemberRole::Editor));
        assert!("owner".parse::<MemberRole>().is_err());
    }

    #[test]
    fn only_editors_with_line_identity_are_notifiable() {
        assert!(member(MemberRole::Editor, Some("U1")).is_notifiable_editor());
        assert!(!member(MemberRole::Editor, None).is_notifiable_editor());
        assert!(!member(MemberRole::Viewer, Some("U2")).is_notifiable_editor());
        assert!(!member(MemberRole::Admin, Some("U3")).is_notifiable_editor());
    }

    #[test]
    fn belongs_to_compares_family_space() {
        let m = member(MemberRole::Viewer, None);
        assert!(m.belongs_to(&m.family_space_id.clone()));
        assert!(!m.belongs_to(&FamilySpaceId::new()));
    }
}
