//! Post module - blog entries, excerpts and archive rows.

mod aggregate;
mod excerpt;
mod rankings;

pub use aggregate::{NewPost, Post, MAX_TITLE_LENGTH};
pub use excerpt::{excerpt, plain_text, DEFAULT_EXCERPT_CHARS};
pub use rankings::{Archive, CommentedPost, PostSummary};
