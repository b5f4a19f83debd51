//! Read-model rows produced by the aggregate post queries.

use serde::{Deserialize, Serialize};

use super::Post;
use crate::domain::foundation::ArchiveMonth;

/// Number of published posts in one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Archive {
    pub month: ArchiveMonth,
    pub total: u64,
}

impl Archive {
    pub fn year(&self) -> i32 {
        self.month.year()
    }

    pub fn month_number(&self) -> u32 {
        self.month.month()
    }
}

/// A listing row: the post and its plain-text teaser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostSummary {
    pub post: Post,
    pub excerpt: String,
}

impl PostSummary {
    /// Summarise `post` with an excerpt of at most `excerpt_chars` characters.
    pub fn new(post: Post, excerpt_chars: usize) -> Self {
        let excerpt = post.excerpt_with_limit(excerpt_chars);
        Self { post, excerpt }
    }
}

/// A post together with how many comments it has received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentedPost {
    pub post: Post,
    pub comment_total: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{PostId, Timestamp};
    use crate::domain::post::NewPost;

    #[test]
    fn summary_uses_requested_excerpt_length() {
        let post = Post::from_new(
            PostId::from_db(1),
            NewPost::new("Title", "abcdefghij", true).unwrap(),
            Timestamp::now(),
        );
        let summary = PostSummary::new(post, 4);
        assert_eq!(summary.excerpt, "abcd...");
        assert_eq!(summary.post.title(), "Title");
    }
}
