//! SidebarHandler - Query handler for the blog sidebar.
//!
//! Every section is loaded concurrently. A section that fails is logged and
//! rendered empty, so the sidebar itself never fails.

use std::sync::Arc;

use serde::Serialize;
use tracing::warn;

use crate::domain::comment::Comment;
use crate::domain::foundation::DomainError;
use crate::domain::link::Link;
use crate::domain::post::{Archive, CommentedPost, Post};
use crate::domain::tag::TagUsage;
use crate::ports::{
    CommentRepository, LinkRepository, PostReader, TagRepository, DEFAULT_RANKING_LIMIT,
};

/// Everything shown next to the post list.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Sidebar {
    pub tags: Vec<TagUsage>,
    pub links: Vec<Link>,
    pub archives: Vec<Archive>,
    pub most_viewed: Vec<Post>,
    pub most_commented: Vec<CommentedPost>,
    pub unread_comments: Vec<Comment>,
}

/// Handler assembling the sidebar.
pub struct SidebarHandler {
    reader: Arc<dyn PostReader>,
    tags: Arc<dyn TagRepository>,
    links: Arc<dyn LinkRepository>,
    comments: Arc<dyn CommentRepository>,
    ranking_limit: u32,
}

impl SidebarHandler {
    pub fn new(
        reader: Arc<dyn PostReader>,
        tags: Arc<dyn TagRepository>,
        links: Arc<dyn LinkRepository>,
        comments: Arc<dyn CommentRepository>,
    ) -> Self {
        Self {
            reader,
            tags,
            links,
            comments,
            ranking_limit: DEFAULT_RANKING_LIMIT,
        }
    }

    /// Override the number of entries in the most-viewed/most-commented lists.
    pub fn with_ranking_limit(mut self, limit: u32) -> Self {
        self.ranking_limit = limit;
        self
    }

    pub async fn handle(&self) -> Sidebar {
        let (tags, links, archives, most_viewed, most_commented, unread_comments) = tokio::join!(
            self.tags.list_published_usage(),
            self.links.list(),
            self.reader.archives(),
            self.reader.most_viewed(self.ranking_limit),
            self.reader.most_commented(self.ranking_limit),
            self.comments.list_unread(),
        );

        Sidebar {
            tags: or_empty("tags", tags),
            links: or_empty("links", links),
            archives: or_empty("archives", archives),
            most_viewed: or_empty("most_viewed", most_viewed),
            most_commented: or_empty("most_commented", most_commented),
            unread_comments: or_empty("unread_comments", unread_comments),
        }
    }
}

fn or_empty<T>(section: &'static str, result: Result<Vec<T>, DomainError>) -> Vec<T> {
    result.unwrap_or_else(|err| {
        warn!(section, error = %err, "Sidebar section unavailable");
        Vec::new()
    })
}
