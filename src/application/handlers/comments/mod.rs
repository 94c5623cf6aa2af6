//! Comment handlers.

mod post_comment;

pub use post_comment::{PostCommentCommand, PostCommentHandler, PostCommentResult};
