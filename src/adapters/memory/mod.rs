//! In-Memory Blog Store
//!
//! One shared store implementing every repository and reader port, so that
//! cross-entity queries (tag filters, comment rankings, author joins) behave
//! like the PostgreSQL adapters. Useful for testing and development.
//!
//! ## Usage
//!
//! ```ignore
//! let store = InMemoryBlogStore::new();
//! let posts: Arc<dyn PostRepository> = Arc::new(store.clone());
//! let reader: Arc<dyn PostReader> = Arc::new(store.clone());
//! ```

mod comments;
mod links;
mod posts;
mod subscribers;
mod tags;
mod users;

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::app_data::AppData;
use crate::domain::comment::Comment;
use crate::domain::foundation::{
    CommentId, DomainError, ErrorCode, LinkId, PostId, SubscriberId, TagId, Timestamp, UserId,
};
use crate::domain::link::Link;
use crate::domain::post::{NewPost, Post};
use crate::domain::subscriber::Subscriber;
use crate::domain::tag::Tag;
use crate::domain::user::User;

#[derive(Debug, Default)]
struct State {
    next_id: i64,
    posts: BTreeMap<PostId, Post>,
    tags: BTreeMap<TagId, Tag>,
    post_tags: BTreeSet<(PostId, TagId)>,
    users: BTreeMap<UserId, User>,
    comments: BTreeMap<CommentId, Comment>,
    subscribers: BTreeMap<SubscriberId, Subscriber>,
    links: BTreeMap<LinkId, Link>,
    app_data: BTreeMap<String, AppData>,
}

impl State {
    /// Sequence shared by all tables; ids only need to be unique per table.
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn post_has_tag(&self, post_id: PostId, tag_id: TagId) -> bool {
        self.post_tags.contains(&(post_id, tag_id))
    }
}

/// In-memory storage for every blog entity.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBlogStore {
    state: Arc<RwLock<State>>,
}

impl InMemoryBlogStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a post with an explicit creation time (seeding archives in tests).
    pub async fn insert_post_at(&self, draft: NewPost, created_at: Timestamp) -> Post {
        let mut state = self.state.write().await;
        let id = PostId::from_db(state.next_id());
        let post = Post::from_new(id, draft, created_at);
        state.posts.insert(id, post.clone());
        post
    }

    /// Clear all stored data
    pub async fn clear(&self) {
        *self.state.write().await = State::default();
    }
}

fn not_found(code: ErrorCode, what: &str, id: impl std::fmt::Display) -> DomainError {
    DomainError::new(code, format!("{} not found: {}", what, id))
}

fn conflict(message: impl Into<String>) -> DomainError {
    DomainError::new(ErrorCode::Conflict, message)
}

/// Newest first, id breaking ties like the SQL `ORDER BY created_at DESC, id DESC`.
fn newest_first(a: &Post, b: &Post) -> std::cmp::Ordering {
    b.created_at()
        .cmp(a.created_at())
        .then_with(|| b.id().cmp(&a.id()))
}
