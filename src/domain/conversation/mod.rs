//! Conversation module - the LINE recording state machine.
//!
//! - `state`: lifecycle states and their transition table
//! - `phase`: the typed payload carried by each state
//! - `aggregate`: the per-user durable conversation cursor
//! - `inbound`: transport-independent inbound events
//! - `engine`: the pure decision function
//! - `message`: outbound prompt content

mod aggregate;
mod engine;
mod errors;
mod inbound;
mod message;
mod phase;
mod state;

pub use aggregate::ConversationState;
pub use engine::{decide, Intent};
pub use errors::RecordingError;
pub use inbound::{is_start_command, ButtonAction, CookingAction, InboundEvent, START_COMMANDS};
pub use message::{
    replies, servings_choices, DishChoice, DishMenu, OutboundMessage, Prompt, ServingsChoice,
    RECENT_SESSION_WINDOW, SHORTLIST_LEN,
};
pub use phase::ConversationPhase;
pub use state::LifecycleState;
