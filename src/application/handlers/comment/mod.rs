//! Comment command handlers.

mod add_comment;

pub use add_comment::{AddCommentCommand, AddCommentHandler};
