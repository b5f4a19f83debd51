//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, timestamps, pagination and error types
//! that form the vocabulary of the blog domain.

mod archive_month;
mod errors;
mod ids;
mod pagination;
mod timestamp;

pub use archive_month::ArchiveMonth;
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{CommentId, LinkId, PostId, SubscriberId, TagId, UserId};
pub use pagination::{Page, Paged, DEFAULT_PAGE_SIZE};
pub use timestamp::Timestamp;
