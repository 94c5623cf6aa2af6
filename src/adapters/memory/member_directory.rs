//! In-memory member directory.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, FamilySpaceId, LineUserId, MemberId};
use crate::domain::membership::Member;
use crate::ports::MemberDirectory;

#[derive(Debug, Clone, Default)]
pub struct InMemoryMemberDirectory {
    members: Arc<RwLock<Vec<Member>>>,
}

impl InMemoryMemberDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_members(members: Vec<Member>) -> Self {
        Self {
            members: Arc::new(RwLock::new(members)),
        }
    }

    pub async fn add(&self, member: Member) {
        self.members.write().await.push(member);
    }
}

#[async_trait]
impl MemberDirectory for InMemoryMemberDirectory {
    async fn find_by_line_user(
        &self,
        line_user_id: &LineUserId,
    ) -> Result<Option<Member>, DomainError> {
        Ok(self
            .members
            .read()
            .await
            .iter()
            .find(|m| m.line_user_id.as_ref() == Some(line_user_id))
            .cloned())
    }

    async fn find_by_id(&self, id: &MemberId) -> Result<Option<Member>, DomainError> {
        Ok(self
            .members
            .read()
            .await
            .iter()
            .find(|m| &m.id == id)
            .cloned())
    }

    async fn link_line_user(
        &self,
        id: &MemberId,
        line_user_id: &LineUserId,
    ) -> Result<bool, DomainError> {
        let mut members = self.members.write().await;
        let taken = members
            .iter()
            .any(|m| &m.id != id && m.line_user_id.as_ref() == Some(line_user_id));
        if taken {
            return Ok(false);
        }

        match members.iter_mut().find(|m| &m.id == id) {
            Some(member) => match &member.line_user_id {
                Some(existing) => Ok(existing == line_user_id),
                None => {
                    member.line_user_id = Some(line_user_id.clone());
                    Ok(true)
                }
            },
            None => Ok(false),
        }
    }

    async fn notifiable_editors(
        &self,
        family_space_id: &FamilySpaceId,
    ) -> Result<Vec<Member>, DomainError> {
        Ok(self
            .members
            .read()
            .await
            .iter()
            .filter(|m| m.belongs_to(family_space_id) && m.is_notifiable_editor())
            .cloned()
            .collect())
    }
}
