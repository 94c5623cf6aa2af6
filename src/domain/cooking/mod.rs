//! Cooking module - recording sessions and the Slot-Satisfaction Engine.

mod completion;
mod records;
mod session;
mod values;

pub use completion::{evaluate, CompletionPolicy, SlotEvaluation};
pub use records::{
    Comment, CommentSource, CookingEvent, CookingEventKind, SessionSeasoning, MAX_COMMENT_LENGTH,
};
pub use session::CookingSession;
pub use values::{CookingStatus, Servings, TasteStatus};
