//! PostgreSQL implementation of PostRepository.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::PgPool;

use super::{column, count_column, db_error, timestamp_column};
use crate::domain::foundation::{DomainError, ErrorCode, PostId};
use crate::domain::post::{NewPost, Post};
use crate::ports::PostRepository;

/// Column list shared by every query that materialises a [`Post`].
pub(super) const POST_COLUMNS: &str =
    "p.id, p.title, p.body, p.view, p.is_published, p.created_at, p.updated_at";

/// PostgreSQL implementation of PostRepository.
#[derive(Clone)]
pub struct PostgresPostRepository {
    pool: PgPool,
}

impl PostgresPostRepository {
    /// Creates a new PostgresPostRepository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn insert(&self, post: &NewPost) -> Result<Post, DomainError> {
        let row = sqlx::query(
            r#"
            INSERT INTO posts AS p (title, body, is_published)
            VALUES ($1, $2, $3)
            RETURNING p.id, p.title, p.body, p.view, p.is_published, p.created_at, p.updated_at
            "#,
        )
        .bind(post.title())
        .bind(post.body())
        .bind(post.is_published())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Failed to insert post", e))?;

        row_to_post(&row)
    }

    async fn update(&self, post: &Post) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE posts SET
                title = $2,
                body = $3,
                is_published = $4,
                updated_at = $5
            WHERE id = $1
            "#,
        )
        .bind(post.id().as_i64())
        .bind(post.title())
        .bind(post.body())
        .bind(post.is_published())
        .bind(post.updated_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to update post", e))?;

        if result.rows_affected() == 0 {
            return Err(post_not_found(post.id()));
        }

        Ok(())
    }

    async fn update_view(&self, post: &Post) -> Result<(), DomainError> {
        // Only the counter; updated_at tracks edits, not reads.
        let result = sqlx::query("UPDATE posts SET view = $2 WHERE id = $1")
            .bind(post.id().as_i64())
            .bind(post.view())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to update post view", e))?;

        if result.rows_affected() == 0 {
            return Err(post_not_found(post.id()));
        }

        Ok(())
    }

    async fn delete(&self, id: PostId) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to delete post", e))?;

        if result.rows_affected() == 0 {
            return Err(post_not_found(id));
        }

        Ok(())
    }

    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, DomainError> {
        let row = sqlx::query(&format!("SELECT {} FROM posts p WHERE p.id = $1", POST_COLUMNS))
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to fetch post", e))?;

        row.as_ref().map(row_to_post).transpose()
    }

    async fn count(&self) -> Result<u64, DomainError> {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM posts")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("Failed to count posts", e))?;

        count_column(&row, "total")
    }
}

fn post_not_found(id: PostId) -> DomainError {
    DomainError::new(ErrorCode::PostNotFound, format!("Post not found: {}", id))
}

pub(super) fn row_to_post(row: &PgRow) -> Result<Post, DomainError> {
    let id: i64 = column(row, "id")?;
    Ok(Post::reconstitute(
        PostId::from_db(id),
        column(row, "title")?,
        column(row, "body")?,
        column(row, "view")?,
        column(row, "is_published")?,
        timestamp_column(row, "created_at")?,
        timestamp_column(row, "updated_at")?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_columns_are_qualified() {
        assert!(POST_COLUMNS.split(", ").all(|c| c.starts_with("p.")));
    }

    #[test]
    fn not_found_uses_post_code() {
        let err = post_not_found(PostId::from_db(9));
        assert_eq!(err.code, ErrorCode::PostNotFound);
        assert!(err.message.contains('9'));
    }
}
