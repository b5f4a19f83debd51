//! SavePostHandler - Command handler for creating and editing posts.

use std::sync::Arc;

use tracing::debug;

use crate::domain::foundation::{DomainError, ErrorCode, PostId};
use crate::domain::post::{NewPost, Post};
use crate::domain::tag::{PostTag, Tag};
use crate::ports::{PostRepository, TagRepository};

/// Command to create (`id: None`) or edit a post and set its tags.
#[derive(Debug, Clone)]
pub struct SavePostCommand {
    pub id: Option<PostId>,
    pub title: String,
    pub body: String,
    pub is_published: bool,
    /// Tag names; blank entries are ignored and unknown names are created.
    pub tags: Vec<String>,
}

/// Result of a successful save.
#[derive(Debug, Clone)]
pub struct SavePostResult {
    pub post: Post,
    pub tags: Vec<Tag>,
}

/// Handler for saving posts.
pub struct SavePostHandler {
    posts: Arc<dyn PostRepository>,
    tags: Arc<dyn TagRepository>,
}

impl SavePostHandler {
    pub fn new(posts: Arc<dyn PostRepository>, tags: Arc<dyn TagRepository>) -> Self {
        Self { posts, tags }
    }

    pub async fn handle(&self, cmd: SavePostCommand) -> Result<SavePostResult, DomainError> {
        // 1. Create or edit the post
        let post = match cmd.id {
            Some(id) => {
                let mut post = self.posts.find_by_id(id).await?.ok_or_else(|| {
                    DomainError::new(ErrorCode::PostNotFound, format!("Post not found: {}", id))
                })?;
                post.edit(cmd.title, cmd.body, cmd.is_published)?;
                self.posts.update(&post).await?;
                post
            }
            None => {
                let draft = NewPost::new(cmd.title, cmd.body, cmd.is_published)?;
                self.posts.insert(&draft).await?
            }
        };

        // 2. Resolve tag names, creating missing ones
        let mut tags: Vec<Tag> = Vec::new();
        for name in cmd.tags.iter().filter(|n| !n.trim().is_empty()) {
            let tag = self.tags.insert_or_get(name).await?;
            if !tags.iter().any(|t| t.id() == tag.id()) {
                tags.push(tag);
            }
        }

        // 3. Replace the post's tag set
        self.tags.detach_all(post.id()).await?;
        for tag in &tags {
            self.tags.attach(PostTag::new(post.id(), tag.id())).await?;
        }

        debug!(post_id = %post.id(), tags = tags.len(), "Saved post");
        Ok(SavePostResult { post, tags })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryBlogStore;

    fn handler(store: &InMemoryBlogStore) -> SavePostHandler {
        SavePostHandler::new(Arc::new(store.clone()), Arc::new(store.clone()))
    }

    fn command(id: Option<PostId>, tags: &[&str]) -> SavePostCommand {
        SavePostCommand {
            id,
            title: "Hello".to_string(),
            body: "# Hello\n\nworld".to_string(),
            is_published: true,
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn creates_post_with_tags() {
        let store = InMemoryBlogStore::new();
        let result = handler(&store)
            .handle(command(None, &["rust", " ", "web", "rust"]))
            .await
            .unwrap();

        assert_eq!(result.post.title(), "Hello");
        let names: Vec<_> = result.tags.iter().map(|t| t.name().to_string()).collect();
        assert_eq!(names, vec!["rust", "web"]);
        let stored = TagRepository::list_by_post(&store, result.post.id())
            .await
            .unwrap();
        assert_eq!(stored.len(), 2);
    }

    #[tokio::test]
    async fn editing_replaces_tag_set() {
        let store = InMemoryBlogStore::new();
        let handler = handler(&store);
        let created = handler.handle(command(None, &["rust", "web"])).await.unwrap();

        let mut edit = command(Some(created.post.id()), &["go"]);
        edit.title = "Renamed".to_string();
        let edited = handler.handle(edit).await.unwrap();

        assert_eq!(edited.post.id(), created.post.id());
        assert_eq!(edited.post.title(), "Renamed");
        let stored = TagRepository::list_by_post(&store, created.post.id())
            .await
            .unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].name(), "go");
    }

    #[tokio::test]
    async fn editing_missing_post_fails() {
        let store = InMemoryBlogStore::new();
        let err = handler(&store)
            .handle(command(Some(PostId::from_db(404)), &[]))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::PostNotFound);
    }

    #[tokio::test]
    async fn blank_title_is_rejected() {
        let store = InMemoryBlogStore::new();
        let mut cmd = command(None, &[]);
        cmd.title = "   ".to_string();
        let err = handler(&store).handle(cmd).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::EmptyField);
    }
}
