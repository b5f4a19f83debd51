//! GetPostHandler - Query handler for a single post page.

use std::sync::Arc;

use serde::Serialize;

use crate::domain::comment::CommentView;
use crate::domain::foundation::{DomainError, ErrorCode, PostId};
use crate::domain::post::Post;
use crate::domain::tag::Tag;
use crate::ports::{CommentRepository, PostRepository, TagRepository};

/// Query for one post.
#[derive(Debug, Clone)]
pub struct GetPostQuery {
    /// Raw id as received from the request.
    pub id: String,
    /// Record a read before returning.
    pub count_view: bool,
    /// Return unpublished posts too (admin preview).
    pub include_drafts: bool,
}

impl GetPostQuery {
    /// Reader-facing lookup: counts the view and hides drafts.
    pub fn reader(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            count_view: true,
            include_drafts: false,
        }
    }

    /// Admin lookup: no view counting, drafts visible.
    pub fn admin(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            count_view: false,
            include_drafts: true,
        }
    }
}

/// A post with its tags and comments.
#[derive(Debug, Clone, Serialize)]
pub struct PostDetail {
    pub post: Post,
    pub tags: Vec<Tag>,
    pub comments: Vec<CommentView>,
}

/// Handler for loading a post page.
pub struct GetPostHandler {
    posts: Arc<dyn PostRepository>,
    tags: Arc<dyn TagRepository>,
    comments: Arc<dyn CommentRepository>,
}

impl GetPostHandler {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        tags: Arc<dyn TagRepository>,
        comments: Arc<dyn CommentRepository>,
    ) -> Self {
        Self {
            posts,
            tags,
            comments,
        }
    }

    pub async fn handle(&self, query: GetPostQuery) -> Result<PostDetail, DomainError> {
        let id: PostId = query.id.parse()?;
        let not_found =
            || DomainError::new(ErrorCode::PostNotFound, format!("Post not found: {}", id));

        let mut post = self.posts.find_by_id(id).await?.ok_or_else(not_found)?;
        if !post.is_published() && !query.include_drafts {
            return Err(not_found());
        }

        if query.count_view {
            post.record_view();
            self.posts.update_view(&post).await?;
        }

        let tags = self.tags.list_by_post(id).await?;
        let comments = self.comments.list_by_post(id).await?;

        Ok(PostDetail {
            post,
            tags,
            comments,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryBlogStore;
    use crate::domain::comment::NewComment;
    use crate::domain::post::NewPost;
    use crate::domain::tag::PostTag;
    use crate::domain::user::NewUser;
    use crate::ports::UserRepository;

    fn handler(store: &InMemoryBlogStore) -> GetPostHandler {
        GetPostHandler::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(store.clone()),
        )
    }

    async fn seed_post(store: &InMemoryBlogStore, published: bool) -> Post {
        PostRepository::insert(store, &NewPost::new("Title", "body", published).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn reader_view_increments_counter() {
        let store = InMemoryBlogStore::new();
        let post = seed_post(&store, true).await;
        let handler = handler(&store);

        handler
            .handle(GetPostQuery::reader(post.id().to_string()))
            .await
            .unwrap();
        let detail = handler
            .handle(GetPostQuery::reader(post.id().to_string()))
            .await
            .unwrap();

        assert_eq!(detail.post.view(), 2);
        let stored = PostRepository::find_by_id(&store, post.id())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.view(), 2);
    }

    #[tokio::test]
    async fn admin_view_does_not_count() {
        let store = InMemoryBlogStore::new();
        let post = seed_post(&store, true).await;
        let detail = handler(&store)
            .handle(GetPostQuery::admin(post.id().to_string()))
            .await
            .unwrap();
        assert_eq!(detail.post.view(), 0);
    }

    #[tokio::test]
    async fn drafts_are_hidden_from_readers() {
        let store = InMemoryBlogStore::new();
        let draft = seed_post(&store, false).await;
        let handler = handler(&store);

        let err = handler
            .handle(GetPostQuery::reader(draft.id().to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::PostNotFound);
        assert!(handler
            .handle(GetPostQuery::admin(draft.id().to_string()))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn malformed_id_is_invalid_format() {
        let store = InMemoryBlogStore::new();
        let err = handler(&store)
            .handle(GetPostQuery::reader("abc"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidFormat);
    }

    #[tokio::test]
    async fn detail_includes_tags_and_comments() {
        let store = InMemoryBlogStore::new();
        let post = seed_post(&store, true).await;
        let tag = store.insert_or_get("rust").await.unwrap();
        store.attach(PostTag::new(post.id(), tag.id())).await.unwrap();
        let user = store
            .first_or_create_by_github(&NewUser::from_github("octocat", "av", "gh").unwrap())
            .await
            .unwrap();
        CommentRepository::insert(&store, &NewComment::new(user.id, post.id(), "nice").unwrap())
            .await
            .unwrap();

        let detail = handler(&store)
            .handle(GetPostQuery::reader(post.id().to_string()))
            .await
            .unwrap();
        assert_eq!(detail.tags.len(), 1);
        assert_eq!(detail.comments.len(), 1);
        assert_eq!(detail.comments[0].nick_name, "octocat");
    }
}
