//! DashboardHandler - Query handler for the admin dashboard counters.

use std::sync::Arc;

use serde::Serialize;

use crate::domain::foundation::DomainError;
use crate::ports::{
    CommentRepository, PostRepository, SubscriberRepository, TagRepository, UserRepository,
};

/// Row counts shown on the admin dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub posts: u64,
    pub tags: u64,
    pub users: u64,
    pub comments: u64,
    pub active_subscribers: u64,
}

/// Handler for dashboard counters.
pub struct DashboardHandler {
    posts: Arc<dyn PostRepository>,
    tags: Arc<dyn TagRepository>,
    users: Arc<dyn UserRepository>,
    comments: Arc<dyn CommentRepository>,
    subscribers: Arc<dyn SubscriberRepository>,
}

impl DashboardHandler {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        tags: Arc<dyn TagRepository>,
        users: Arc<dyn UserRepository>,
        comments: Arc<dyn CommentRepository>,
        subscribers: Arc<dyn SubscriberRepository>,
    ) -> Self {
        Self {
            posts,
            tags,
            users,
            comments,
            subscribers,
        }
    }

    pub async fn handle(&self) -> Result<DashboardStats, DomainError> {
        let (posts, tags, users, comments, active_subscribers) = tokio::try_join!(
            self.posts.count(),
            self.tags.count(),
            self.users.count(),
            self.comments.count(),
            self.subscribers.count_active(),
        )?;

        Ok(DashboardStats {
            posts,
            tags,
            users,
            comments,
            active_subscribers,
        })
    }
}
