//! PostgreSQL implementation of CommentRepository.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::PgPool;

use super::{column, count_column, db_error, timestamp_column};
use crate::domain::comment::{Comment, CommentView, NewComment};
use crate::domain::foundation::{CommentId, DomainError, ErrorCode, PostId, UserId};
use crate::ports::CommentRepository;

const COMMENT_COLUMNS: &str = "c.id, c.user_id, c.post_id, c.content, c.read_state, c.created_at";

/// Foreign key on `comments.user_id`, as named by PostgreSQL.
const USER_FOREIGN_KEY: &str = "comments_user_id_fkey";

fn insert_sql() -> String {
    format!(
        r#"
        INSERT INTO comments AS c (user_id, post_id, content)
        VALUES ($1, $2, $3)
        RETURNING {}
        "#,
        COMMENT_COLUMNS
    )
}

fn list_unread_sql() -> String {
    format!(
        "SELECT {} FROM comments c WHERE NOT c.read_state ORDER BY c.created_at DESC, c.id DESC",
        COMMENT_COLUMNS
    )
}

/// Comments of one post with the author joined in. A missing GitHub login
/// reads as an empty nick name.
fn list_by_post_sql() -> String {
    format!(
        r#"
        SELECT {},
               COALESCE(u.github_login_id, '') AS nick_name,
               u.avatar_url,
               u.github_url
        FROM comments c
        JOIN users u ON u.id = c.user_id
        WHERE c.post_id = $1
        ORDER BY c.created_at DESC, c.id DESC
        "#,
        COMMENT_COLUMNS
    )
}

/// Name the parent row a rejected insert pointed at.
fn missing_parent(constraint: Option<&str>, comment: &NewComment) -> DomainError {
    match constraint {
        Some(USER_FOREIGN_KEY) => DomainError::new(
            ErrorCode::UserNotFound,
            format!("User not found: {}", comment.user_id),
        ),
        _ => DomainError::new(
            ErrorCode::PostNotFound,
            format!("Post not found: {}", comment.post_id),
        ),
    }
}

/// PostgreSQL implementation of CommentRepository.
#[derive(Clone)]
pub struct PostgresCommentRepository {
    pool: PgPool,
}

impl PostgresCommentRepository {
    /// Creates a new PostgresCommentRepository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn insert(&self, comment: &NewComment) -> Result<Comment, DomainError> {
        let result = sqlx::query(&insert_sql())
            .bind(comment.user_id.as_i64())
            .bind(comment.post_id.as_i64())
            .bind(&comment.content)
            .fetch_one(&self.pool)
            .await;

        match result {
            Ok(row) => row_to_comment(&row),
            Err(sqlx::Error::Database(db_err)) if db_err.is_foreign_key_violation() => {
                Err(missing_parent(db_err.constraint(), comment))
            }
            Err(e) => Err(db_error("Failed to insert comment", e)),
        }
    }

    async fn mark_read(&self, id: CommentId) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE comments SET read_state = TRUE WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to mark comment read", e))?;

        if result.rows_affected() == 0 {
            return Err(comment_not_found(id));
        }

        Ok(())
    }

    async fn mark_all_read(&self) -> Result<u64, DomainError> {
        let result = sqlx::query("UPDATE comments SET read_state = TRUE WHERE NOT read_state")
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to mark comments read", e))?;

        Ok(result.rows_affected())
    }

    async fn list_unread(&self) -> Result<Vec<Comment>, DomainError> {
        let rows = sqlx::query(&list_unread_sql())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to list unread comments", e))?;

        rows.iter().map(row_to_comment).collect()
    }

    async fn delete(&self, id: CommentId, owner: UserId) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1 AND user_id = $2")
            .bind(id.as_i64())
            .bind(owner.as_i64())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to delete comment", e))?;

        if result.rows_affected() == 0 {
            return Err(comment_not_found(id));
        }

        Ok(())
    }

    async fn list_by_post(&self, post_id: PostId) -> Result<Vec<CommentView>, DomainError> {
        let rows = sqlx::query(&list_by_post_sql())
            .bind(post_id.as_i64())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to list post comments", e))?;

        rows.iter()
            .map(|row| {
                Ok(CommentView {
                    comment: row_to_comment(row)?,
                    nick_name: column(row, "nick_name")?,
                    avatar_url: column(row, "avatar_url")?,
                    github_url: column(row, "github_url")?,
                })
            })
            .collect()
    }

    async fn count(&self) -> Result<u64, DomainError> {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM comments")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("Failed to count comments", e))?;

        count_column(&row, "total")
    }
}

fn comment_not_found(id: CommentId) -> DomainError {
    DomainError::new(
        ErrorCode::CommentNotFound,
        format!("Comment not found: {}", id),
    )
}

fn row_to_comment(row: &PgRow) -> Result<Comment, DomainError> {
    let id: i64 = column(row, "id")?;
    let user_id: i64 = column(row, "user_id")?;
    let post_id: i64 = column(row, "post_id")?;
    Ok(Comment {
        id: CommentId::from_db(id),
        user_id: UserId::from_db(user_id),
        post_id: PostId::from_db(post_id),
        content: column(row, "content")?,
        read_state: column(row, "read_state")?,
        created_at: timestamp_column(row, "created_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment() -> NewComment {
        NewComment::new(UserId::from_db(7), PostId::from_db(9), "hi").unwrap()
    }

    #[test]
    fn user_foreign_key_is_user_not_found() {
        let err = missing_parent(Some("comments_user_id_fkey"), &comment());
        assert_eq!(err.code, ErrorCode::UserNotFound);
        assert!(err.message.contains('7'));
    }

    #[test]
    fn post_foreign_key_is_post_not_found() {
        let err = missing_parent(Some("comments_post_id_fkey"), &comment());
        assert_eq!(err.code, ErrorCode::PostNotFound);
        assert!(err.message.contains('9'));
    }

    #[test]
    fn unnamed_constraint_defaults_to_post() {
        assert_eq!(missing_parent(None, &comment()).code, ErrorCode::PostNotFound);
    }

    #[test]
    fn author_join_maps_missing_login_to_empty_nick_name() {
        let sql = list_by_post_sql();
        assert!(sql.contains("COALESCE(u.github_login_id, '') AS nick_name"));
        assert!(sql.contains("JOIN users u ON u.id = c.user_id"));
        assert!(sql.contains("ORDER BY c.created_at DESC, c.id DESC"));
    }

    #[test]
    fn unread_list_is_newest_first() {
        let sql = list_unread_sql();
        assert!(sql.contains("WHERE NOT c.read_state"));
        assert!(sql.ends_with("ORDER BY c.created_at DESC, c.id DESC"));
    }

    #[test]
    fn insert_returns_every_column() {
        assert!(insert_sql().contains(&format!("RETURNING {}", COMMENT_COLUMNS)));
    }
}
