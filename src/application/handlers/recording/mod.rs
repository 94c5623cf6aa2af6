//! Recording handlers - the LINE conversation that records a dish.

mod completion;
mod context;
mod guard;
mod handle_chat_event;
mod submit_seasonings;
mod workflow;

pub use completion::CompletionChecker;
pub use context::{RecordingPorts, RecordingSettings};
pub use guard::ConversationGuard;
pub use handle_chat_event::{HandleChatEventCommand, HandleChatEventHandler};
pub use submit_seasonings::{
    SubmitSeasoningsCommand, SubmitSeasoningsHandler, SubmitSeasoningsResult,
};
pub use workflow::{Delivery, RecordingWorkflow, WorkflowOutcome};
