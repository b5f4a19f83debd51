//! AddCommentHandler - Command handler for reader comments.

use std::sync::Arc;

use tracing::debug;

use crate::domain::comment::{Comment, NewComment};
use crate::domain::foundation::{DomainError, ErrorCode, PostId, UserId};
use crate::ports::{CommentRepository, PostRepository, UserRepository};

/// Command to comment on a post.
#[derive(Debug, Clone)]
pub struct AddCommentCommand {
    pub user_id: UserId,
    pub post_id: PostId,
    pub content: String,
}

/// Handler for adding comments.
pub struct AddCommentHandler {
    posts: Arc<dyn PostRepository>,
    users: Arc<dyn UserRepository>,
    comments: Arc<dyn CommentRepository>,
}

impl AddCommentHandler {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        users: Arc<dyn UserRepository>,
        comments: Arc<dyn CommentRepository>,
    ) -> Self {
        Self {
            posts,
            users,
            comments,
        }
    }

    pub async fn handle(&self, cmd: AddCommentCommand) -> Result<Comment, DomainError> {
        let comment = NewComment::new(cmd.user_id, cmd.post_id, cmd.content)?;

        // 1. The post must exist and be visible
        let post = self.posts.find_by_id(cmd.post_id).await?;
        if !post.is_some_and(|p| p.is_published()) {
            return Err(DomainError::new(
                ErrorCode::PostNotFound,
                format!("Post not found: {}", cmd.post_id),
            ));
        }

        // 2. The author must exist and not be locked
        let user = self.users.find_by_id(cmd.user_id).await?.ok_or_else(|| {
            DomainError::new(
                ErrorCode::UserNotFound,
                format!("User not found: {}", cmd.user_id),
            )
        })?;
        user.ensure_active()?;

        // 3. Persist
        let stored = self.comments.insert(&comment).await?;
        debug!(comment_id = %stored.id, post_id = %stored.post_id, "Comment added");
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryBlogStore;
    use crate::domain::post::NewPost;
    use crate::domain::user::NewUser;

    fn handler(store: &InMemoryBlogStore) -> AddCommentHandler {
        let shared = Arc::new(store.clone());
        AddCommentHandler::new(shared.clone(), shared.clone(), shared)
    }

    async fn seed(store: &InMemoryBlogStore, published: bool) -> (PostId, UserId) {
        let post = PostRepository::insert(store, &NewPost::new("p", "b", published).unwrap())
            .await
            .unwrap();
        let user = store
            .first_or_create_by_github(&NewUser::from_github("octocat", "", "").unwrap())
            .await
            .unwrap();
        (post.id(), user.id)
    }

    fn command(post_id: PostId, user_id: UserId, content: &str) -> AddCommentCommand {
        AddCommentCommand {
            user_id,
            post_id,
            content: content.to_string(),
        }
    }

    #[tokio::test]
    async fn adds_comment_as_unread() {
        let store = InMemoryBlogStore::new();
        let (post, user) = seed(&store, true).await;
        let comment = handler(&store)
            .handle(command(post, user, "  great post  "))
            .await
            .unwrap();
        assert_eq!(comment.content, "great post");
        assert!(!comment.read_state);
    }

    #[tokio::test]
    async fn locked_user_is_forbidden() {
        let store = InMemoryBlogStore::new();
        let (post, user) = seed(&store, true).await;
        store.set_lock_state(user, true).await.unwrap();

        let err = handler(&store)
            .handle(command(post, user, "hi"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn unknown_user_is_rejected() {
        let store = InMemoryBlogStore::new();
        let (post, _) = seed(&store, true).await;
        let err = handler(&store)
            .handle(command(post, UserId::from_db(999), "hi"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::UserNotFound);
    }

    #[tokio::test]
    async fn draft_posts_cannot_be_commented() {
        let store = InMemoryBlogStore::new();
        let (post, user) = seed(&store, false).await;
        let err = handler(&store)
            .handle(command(post, user, "hi"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::PostNotFound);
    }

    #[tokio::test]
    async fn empty_content_is_rejected() {
        let store = InMemoryBlogStore::new();
        let (post, user) = seed(&store, true).await;
        let err = handler(&store)
            .handle(command(post, user, "   "))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::EmptyField);
    }
}
