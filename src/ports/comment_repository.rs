//! Comment repository port.

use crate::domain::comment::{Comment, CommentView, NewComment};
use crate::domain::foundation::{CommentId, DomainError, PostId, UserId};
use async_trait::async_trait;

#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn insert(&self, comment: &NewComment) -> Result<Comment, DomainError>;

    /// Flag one comment as seen by the blog owner.
    ///
    /// # Errors
    ///
    /// - `CommentNotFound` if the comment doesn't exist
    async fn mark_read(&self, id: CommentId) -> Result<(), DomainError>;

    /// Flag every unread comment as seen; returns how many changed.
    async fn mark_all_read(&self) -> Result<u64, DomainError>;

    /// Unread comments, newest first.
    async fn list_unread(&self) -> Result<Vec<Comment>, DomainError>;

    /// Delete a comment written by `owner`.
    ///
    /// # Errors
    ///
    /// - `CommentNotFound` if no comment with that id belongs to `owner`
    async fn delete(&self, id: CommentId, owner: UserId) -> Result<(), DomainError>;

    /// Comments on a post with author details, newest first.
    async fn list_by_post(&self, post_id: PostId) -> Result<Vec<CommentView>, DomainError>;

    async fn count(&self) -> Result<u64, DomainError>;
}
