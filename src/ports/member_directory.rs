//! Member directory port.
//!
//! Resolves chat identities and member ids to family-space members. The
//! invitation flow owns member creation; this side only reads members and
//! attaches a LINE identity on admission.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, FamilySpaceId, LineUserId, MemberId};
use crate::domain::membership::Member;

#[async_trait]
pub trait MemberDirectory: Send + Sync {
    async fn find_by_line_user(
        &self,
        line_user_id: &LineUserId,
    ) -> Result<Option<Member>, DomainError>;

    async fn find_by_id(&self, id: &MemberId) -> Result<Option<Member>, DomainError>;

    /// Attaches a LINE identity to a member that has none.
    ///
    /// Returns `false` when the member is linked to another identity or the
    /// identity already belongs to another member. Linking the same pair
    /// twice succeeds.
    async fn link_line_user(
        &self,
        id: &MemberId,
        line_user_id: &LineUserId,
    ) -> Result<bool, DomainError>;

    /// Editors of the family space that have a LINE identity.
    async fn notifiable_editors(
        &self,
        family_space_id: &FamilySpaceId,
    ) -> Result<Vec<Member>, DomainError>;
}
