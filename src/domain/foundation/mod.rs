//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, timestamps, the state machine trait, command
//! metadata and error types that form the vocabulary of the recipe domain.

mod command;
mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use command::{Actor, CommandMetadata};
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{
    CommentId, CookingEventId, DishId, FamilySpaceId, LineUserId, MemberId, SeasoningId,
    SessionId, SessionSeasoningId, TemplateKey,
};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
