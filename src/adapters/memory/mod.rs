//! In-memory adapters for tests and single-instance development.
//!
//! Each implements the same port contract as its production counterpart,
//! including conversation-state versioning and seasoning uniqueness.

mod conversation_lock;
mod conversation_state_repository;
mod cooking_store;
mod member_directory;
mod messaging_client;
mod photo_storage;

pub use conversation_lock::InMemoryConversationLock;
pub use conversation_state_repository::InMemoryConversationStateRepository;
pub use cooking_store::{
    InMemoryCommentRepository, InMemoryCookingEventLog, InMemoryCookingSessionRepository,
    InMemorySessionSeasoningRepository,
};
pub use member_directory::InMemoryMemberDirectory;
pub use messaging_client::{RecordingMessagingClient, SentMessage};
pub use photo_storage::InMemoryPhotoStorage;
