//! Post repository port (write side).
//!
//! Defines the contract for persisting and retrieving Post aggregates.

use crate::domain::foundation::{DomainError, PostId};
use crate::domain::post::{NewPost, Post};
use async_trait::async_trait;

/// Repository port for Post aggregate persistence.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Store a new post and return it with its assigned id.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn insert(&self, post: &NewPost) -> Result<Post, DomainError>;

    /// Persist title, body and published flag.
    ///
    /// # Errors
    ///
    /// - `PostNotFound` if the post doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn update(&self, post: &Post) -> Result<(), DomainError>;

    /// Persist only the read counter.
    ///
    /// # Errors
    ///
    /// - `PostNotFound` if the post doesn't exist
    async fn update_view(&self, post: &Post) -> Result<(), DomainError>;

    /// Delete a post. Its tag links and comments go with it.
    ///
    /// # Errors
    ///
    /// - `PostNotFound` if the post doesn't exist
    async fn delete(&self, id: PostId) -> Result<(), DomainError>;

    /// Find a post by its ID, published or not.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, DomainError>;

    /// Count every post, drafts included.
    async fn count(&self) -> Result<u64, DomainError>;
}
