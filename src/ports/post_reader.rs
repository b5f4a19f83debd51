//! Post reader port (read side).
//!
//! Listing, counting and ranking queries over posts. Everything reader-facing
//! only sees published posts; `list_all` is the admin view that includes
//! drafts.
//!
//! # Ordering
//!
//! Lists are newest first (`created_at` descending) unless stated otherwise.

use crate::domain::foundation::{ArchiveMonth, DomainError, Page, TagId};
use crate::domain::post::{Archive, CommentedPost, Post};
use async_trait::async_trait;

/// Number of entries in each sidebar ranking.
pub const DEFAULT_RANKING_LIMIT: u32 = 5;

/// Reader port for post queries.
#[async_trait]
pub trait PostReader: Send + Sync {
    /// Published posts, optionally restricted to one tag.
    ///
    /// Returns everything when `page` is `None`.
    async fn list_published(
        &self,
        tag: Option<TagId>,
        page: Option<Page>,
    ) -> Result<Vec<Post>, DomainError>;

    /// Every post including drafts, optionally restricted to one tag.
    async fn list_all(&self, tag: Option<TagId>) -> Result<Vec<Post>, DomainError>;

    /// Count of what `list_published` returns without paging.
    async fn count_published(&self, tag: Option<TagId>) -> Result<u64, DomainError>;

    /// Published posts by read count, highest first.
    async fn most_viewed(&self, limit: u32) -> Result<Vec<Post>, DomainError>;

    /// Published posts by number of comments, highest first.
    ///
    /// Posts without comments are left out.
    async fn most_commented(&self, limit: u32) -> Result<Vec<CommentedPost>, DomainError>;

    /// Published post counts per month, latest month first.
    async fn archives(&self) -> Result<Vec<Archive>, DomainError>;

    /// Published posts created in `month`.
    async fn list_by_archive(
        &self,
        month: ArchiveMonth,
        page: Option<Page>,
    ) -> Result<Vec<Post>, DomainError>;

    /// Count of what `list_by_archive` returns without paging.
    async fn count_by_archive(&self, month: ArchiveMonth) -> Result<u64, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_reader_is_object_safe() {
        fn _accepts_dyn(_reader: &dyn PostReader) {}
    }
}
