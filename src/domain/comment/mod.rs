//! Comment module - reader comments on posts.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{CommentId, PostId, Timestamp, UserId, ValidationError};

/// Maximum length for a comment, in characters.
pub const MAX_COMMENT_LENGTH: usize = 5000;

/// A comment that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub user_id: UserId,
    pub post_id: PostId,
    pub content: String,
}

impl NewComment {
    pub fn new(
        user_id: UserId,
        post_id: PostId,
        content: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let content = content.into();
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::empty_field("content"));
        }
        let len = trimmed.chars().count();
        if len > MAX_COMMENT_LENGTH {
            return Err(ValidationError::out_of_range(
                "content",
                1,
                MAX_COMMENT_LENGTH as i64,
                len as i64,
            ));
        }
        Ok(Self {
            user_id,
            post_id,
            content: trimmed.to_string(),
        })
    }
}

/// A stored comment. `read_state` tracks whether the blog owner has seen it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub user_id: UserId,
    pub post_id: PostId,
    pub content: String,
    pub read_state: bool,
    pub created_at: Timestamp,
}

impl Comment {
    pub fn from_new(id: CommentId, new: NewComment, created_at: Timestamp) -> Self {
        Self {
            id,
            user_id: new.user_id,
            post_id: new.post_id,
            content: new.content,
            read_state: false,
            created_at,
        }
    }
}

/// A comment with the author details shown next to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentView {
    pub comment: Comment,
    /// The author's GitHub login, or empty when the author has none.
    pub nick_name: String,
    pub avatar_url: String,
    pub github_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_is_trimmed() {
        let c = NewComment::new(UserId::from_db(1), PostId::from_db(2), "  nice post \n").unwrap();
        assert_eq!(c.content, "nice post");
    }

    #[test]
    fn blank_content_is_rejected() {
        assert!(NewComment::new(UserId::from_db(1), PostId::from_db(2), " ").is_err());
    }

    #[test]
    fn new_comment_is_unread() {
        let new = NewComment::new(UserId::from_db(1), PostId::from_db(2), "hi").unwrap();
        let comment = Comment::from_new(CommentId::from_db(9), new, Timestamp::now());
        assert!(!comment.read_state);
    }
}
