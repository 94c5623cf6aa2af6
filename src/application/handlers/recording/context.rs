//! Collaborators and settings shared by the recording handlers.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::catalog::Catalog;
use crate::domain::cooking::CompletionPolicy;
use crate::ports::{
    CommentRepository, ConversationLock, ConversationStateRepository, CookingEventLog,
    CookingSessionRepository, MemberDirectory, MessagingClient, PhotoStorage,
    SessionSeasoningRepository,
};

/// Every port the recording flow touches.
#[derive(Clone)]
pub struct RecordingPorts {
    pub catalog: Arc<Catalog>,
    pub members: Arc<dyn MemberDirectory>,
    pub states: Arc<dyn ConversationStateRepository>,
    pub sessions: Arc<dyn CookingSessionRepository>,
    pub events: Arc<dyn CookingEventLog>,
    pub seasonings: Arc<dyn SessionSeasoningRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub messaging: Arc<dyn MessagingClient>,
    pub photos: Arc<dyn PhotoStorage>,
    pub lock: Arc<dyn ConversationLock>,
}

/// Tunables of the recording flow.
#[derive(Debug, Clone)]
pub struct RecordingSettings {
    pub completion_policy: CompletionPolicy,
    /// Base URL of the seasoning mini-app.
    pub liff_base_url: String,
    pub lock_ttl: Duration,
    pub lock_attempts: u32,
    pub lock_retry_delay: Duration,
    /// Lifetime of signed photo links in read models.
    pub photo_url_ttl_secs: i64,
}

impl Default for RecordingSettings {
    fn default() -> Self {
        Self {
            completion_policy: CompletionPolicy::default(),
            liff_base_url: "https://liff.line.me/app".to_string(),
            lock_ttl: Duration::from_secs(10),
            lock_attempts: 3,
            lock_retry_delay: Duration::from_millis(100),
            photo_url_ttl_secs: 3600,
        }
    }
}
