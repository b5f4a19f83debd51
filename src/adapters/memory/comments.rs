use async_trait::async_trait;

use super::{not_found, InMemoryBlogStore};
use crate::domain::comment::{Comment, CommentView, NewComment};
use crate::domain::foundation::{CommentId, DomainError, ErrorCode, PostId, Timestamp, UserId};
use crate::ports::CommentRepository;

fn newest_first(a: &Comment, b: &Comment) -> std::cmp::Ordering {
    b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id))
}

#[async_trait]
impl CommentRepository for InMemoryBlogStore {
    async fn insert(&self, comment: &NewComment) -> Result<Comment, DomainError> {
        let mut state = self.state.write().await;
        if !state.posts.contains_key(&comment.post_id) {
            return Err(not_found(ErrorCode::PostNotFound, "Post", comment.post_id));
        }
        if !state.users.contains_key(&comment.user_id) {
            return Err(not_found(ErrorCode::UserNotFound, "User", comment.user_id));
        }
        let id = CommentId::from_db(state.next_id());
        let stored = Comment::from_new(id, comment.clone(), Timestamp::now());
        state.comments.insert(id, stored.clone());
        Ok(stored)
    }

    async fn mark_read(&self, id: CommentId) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        let comment = state
            .comments
            .get_mut(&id)
            .ok_or_else(|| not_found(ErrorCode::CommentNotFound, "Comment", id))?;
        comment.read_state = true;
        Ok(())
    }

    async fn mark_all_read(&self) -> Result<u64, DomainError> {
        let mut state = self.state.write().await;
        let mut changed = 0;
        for comment in state.comments.values_mut().filter(|c| !c.read_state) {
            comment.read_state = true;
            changed += 1;
        }
        Ok(changed)
    }

    async fn list_unread(&self) -> Result<Vec<Comment>, DomainError> {
        let state = self.state.read().await;
        let mut unread: Vec<Comment> = state
            .comments
            .values()
            .filter(|c| !c.read_state)
            .cloned()
            .collect();
        unread.sort_by(newest_first);
        Ok(unread)
    }

    async fn delete(&self, id: CommentId, owner: UserId) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        let owned = state.comments.get(&id).is_some_and(|c| c.user_id == owner);
        if !owned {
            return Err(not_found(ErrorCode::CommentNotFound, "Comment", id));
        }
        state.comments.remove(&id);
        Ok(())
    }

    async fn list_by_post(&self, post_id: PostId) -> Result<Vec<CommentView>, DomainError> {
        let state = self.state.read().await;
        let mut comments: Vec<Comment> = state
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        comments.sort_by(newest_first);
        Ok(comments
            .into_iter()
            .filter_map(|comment| {
                let author = state.users.get(&comment.user_id)?;
                Some(CommentView {
                    nick_name: author.github_login_id.clone().unwrap_or_default(),
                    avatar_url: author.avatar_url.clone(),
                    github_url: author.github_url.clone(),
                    comment,
                })
            })
            .collect())
    }

    async fn count(&self) -> Result<u64, DomainError> {
        Ok(self.state.read().await.comments.len() as u64)
    }
}
