//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Persistence
//!
//! - `ConversationStateRepository` - per-user conversation cursor
//! - `CookingSessionRepository`, `CookingEventLog`, `SessionSeasoningRepository`
//! - `CommentRepository`
//! - `MemberDirectory` - read-only member lookups
//!
//! ## Platform
//!
//! - `MessagingClient` - reply/push/content-fetch on the chat platform
//! - `PhotoStorage` - photo bytes and signed read URLs
//! - `ConversationLock` - per-user lease

mod conversation_lock;
mod conversation_state_repository;
mod cooking_session_repository;
mod member_directory;
mod messaging_client;
mod photo_storage;

pub use conversation_lock::{ConversationLock, LockLease};
pub use conversation_state_repository::ConversationStateRepository;
pub use cooking_session_repository::{
    CommentRepository, CookingEventLog, CookingSessionRepository, SessionSeasoningRepository,
};
pub use member_directory::MemberDirectory;
pub use messaging_client::{MessagingClient, MessagingError};
pub use photo_storage::{photo_path, PhotoStorage, StorageError};
