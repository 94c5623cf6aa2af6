//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Following CQRS, it separates command handlers (write) from query handlers (read).

pub mod handlers;

pub use handlers::{
    // Recording
    Delivery, HandleChatEventCommand, HandleChatEventHandler, RecordingPorts,
    RecordingSettings, RecordingWorkflow, SubmitSeasoningsCommand, SubmitSeasoningsHandler,
    SubmitSeasoningsResult, WorkflowOutcome,
    // Comments and membership
    AdmitLineMemberCommand, AdmitLineMemberHandler, PostCommentCommand, PostCommentHandler,
    PostCommentResult,
    // Queries
    GetRecipeHandler, GetRecipeQuery, GetSeasoningOptionsHandler, GetSeasoningOptionsQuery,
    RecipeView, SeasoningOptionsView,
};
