//! In-memory wiring shared by handler tests.

use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;

use crate::adapters::memory::{
    InMemoryCommentRepository, InMemoryConversationLock, InMemoryConversationStateRepository,
    InMemoryCookingEventLog, InMemoryCookingSessionRepository, InMemoryMemberDirectory,
    InMemoryPhotoStorage, InMemorySessionSeasoningRepository, RecordingMessagingClient,
};
use crate::adapters::photos::UrlSigner;
use crate::domain::catalog::Catalog;
use crate::domain::foundation::{FamilySpaceId, LineUserId, MemberId};
use crate::domain::membership::{Member, MemberRole};

use super::recording::{RecordingPorts, RecordingSettings, RecordingWorkflow};

pub struct TestApp {
    pub catalog: Arc<Catalog>,
    pub members: Arc<InMemoryMemberDirectory>,
    pub states: Arc<InMemoryConversationStateRepository>,
    pub sessions: Arc<InMemoryCookingSessionRepository>,
    pub events: Arc<InMemoryCookingEventLog>,
    pub seasonings: Arc<InMemorySessionSeasoningRepository>,
    pub comments: Arc<InMemoryCommentRepository>,
    pub messaging: Arc<RecordingMessagingClient>,
    pub photos: Arc<InMemoryPhotoStorage>,
    pub lock: Arc<InMemoryConversationLock>,
    pub settings: RecordingSettings,
    /// Editor recording over LINE.
    pub cook: Member,
    /// Second editor of the same family.
    pub grandma: Member,
    /// Web-only viewer of the same family.
    pub viewer: Member,
    /// Member of another family space.
    pub outsider: Member,
}

fn member(
    family: FamilySpaceId,
    name: &str,
    role: MemberRole,
    line_user_id: Option<&str>,
) -> Member {
    Member {
        id: MemberId::new(),
        family_space_id: family,
        line_user_id: line_user_id.map(|id| LineUserId::new(id).unwrap()),
        display_name: name.to_string(),
        role,
    }
}

impl TestApp {
    pub fn new() -> Self {
        let family = FamilySpaceId::new();
        let cook = member(family, "お母さん", MemberRole::Editor, Some("Ucook"));
        let grandma = member(family, "おばあちゃん", MemberRole::Editor, Some("Ugrandma"));
        let viewer = member(family, "たろう", MemberRole::Viewer, None);
        let outsider = member(FamilySpaceId::new(), "よその人", MemberRole::Editor, Some("Uother"));

        let signer = UrlSigner::new(
            SecretString::new("photo-signing-key".to_string()),
            "https://recipes.example.com",
        );

        Self {
            catalog: Catalog::builtin().unwrap(),
            members: Arc::new(InMemoryMemberDirectory::with_members(vec![
                cook.clone(),
                grandma.clone(),
                viewer.clone(),
                outsider.clone(),
            ])),
            states: Arc::new(InMemoryConversationStateRepository::new()),
            sessions: Arc::new(InMemoryCookingSessionRepository::new()),
            events: Arc::new(InMemoryCookingEventLog::new()),
            seasonings: Arc::new(InMemorySessionSeasoningRepository::new()),
            comments: Arc::new(InMemoryCommentRepository::new()),
            messaging: Arc::new(RecordingMessagingClient::new()),
            photos: Arc::new(InMemoryPhotoStorage::new(signer)),
            lock: Arc::new(InMemoryConversationLock::new()),
            settings: RecordingSettings {
                liff_base_url: "https://liff.line.me/test-app".to_string(),
                lock_attempts: 1,
                lock_retry_delay: Duration::from_millis(1),
                ..RecordingSettings::default()
            },
            cook,
            grandma,
            viewer,
            outsider,
        }
    }

    pub fn ports(&self) -> RecordingPorts {
        RecordingPorts {
            catalog: self.catalog.clone(),
            members: self.members.clone(),
            states: self.states.clone(),
            sessions: self.sessions.clone(),
            events: self.events.clone(),
            seasonings: self.seasonings.clone(),
            comments: self.comments.clone(),
            messaging: self.messaging.clone(),
            photos: self.photos.clone(),
            lock: self.lock.clone(),
        }
    }

    pub fn workflow(&self) -> RecordingWorkflow {
        RecordingWorkflow::new(self.ports(), self.settings.clone())
    }

    pub fn cook_line_id(&self) -> LineUserId {
        self.cook.line_user_id.clone().unwrap()
    }

    pub fn grandma_line_id(&self) -> LineUserId {
        self.grandma.line_user_id.clone().unwrap()
    }
}
