//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod comments;
pub mod membership;
pub mod recipes;
pub mod recording;

#[cfg(test)]
pub(crate) mod testing;

pub use comments::{PostCommentCommand, PostCommentHandler, PostCommentResult};
pub use membership::{AdmitLineMemberCommand, AdmitLineMemberHandler};
pub use recipes::{
    GetRecipeHandler, GetRecipeQuery, GetSeasoningOptionsHandler, GetSeasoningOptionsQuery,
    RecipeView, SeasoningOptionsView,
};
pub use recording::{
    CompletionChecker, ConversationGuard, Delivery, HandleChatEventCommand,
    HandleChatEventHandler, RecordingPorts, RecordingSettings, RecordingWorkflow,
    SubmitSeasoningsCommand, SubmitSeasoningsHandler, SubmitSeasoningsResult, WorkflowOutcome,
};
