//! Tag repository port.
//!
//! Tags are created on demand when a post names them, so insertion is
//! first-or-create by name. The post↔tag association lives here too.

use crate::domain::foundation::{DomainError, PostId, TagId};
use crate::domain::tag::{PostTag, Tag, TagUsage};
use async_trait::async_trait;

#[async_trait]
pub trait TagRepository: Send + Sync {
    /// Return the tag called `name`, creating it if needed.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if the name is blank
    async fn insert_or_get(&self, name: &str) -> Result<Tag, DomainError>;

    /// Persist the tag's name.
    ///
    /// # Errors
    ///
    /// - `TagNotFound` if the tag doesn't exist
    async fn update(&self, tag: &Tag) -> Result<(), DomainError>;

    /// Delete a tag and detach it from every post.
    ///
    /// # Errors
    ///
    /// - `TagNotFound` if the tag doesn't exist
    async fn delete(&self, id: TagId) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: TagId) -> Result<Option<Tag>, DomainError>;

    /// Every tag, used or not, ordered by name.
    async fn list_all(&self) -> Result<Vec<Tag>, DomainError>;

    /// Tags on at least one published post, with that post count.
    async fn list_published_usage(&self) -> Result<Vec<TagUsage>, DomainError>;

    /// Tags attached to a post, ordered by name.
    async fn list_by_post(&self, post_id: PostId) -> Result<Vec<Tag>, DomainError>;

    async fn count(&self) -> Result<u64, DomainError>;

    /// Attach a tag to a post. Attaching twice is a no-op.
    async fn attach(&self, link: PostTag) -> Result<(), DomainError>;

    /// Remove every tag from a post.
    async fn detach_all(&self, post_id: PostId) -> Result<(), DomainError>;
}
