//! PostgreSQL implementation of PostReader.
//!
//! Listing, archive and ranking queries. Reader-facing queries only see
//! published posts.

use async_trait::async_trait;
use sqlx::PgPool;

use super::post_repository::{row_to_post, POST_COLUMNS};
use super::{column, count_column, db_error};
use crate::domain::foundation::{ArchiveMonth, DomainError, ErrorCode, Page, TagId};
use crate::domain::post::{Archive, CommentedPost, Post};
use crate::ports::PostReader;

/// Matches every post when `$1` is NULL, otherwise posts carrying tag `$1`.
const TAG_FILTER: &str = "($1::BIGINT IS NULL OR EXISTS (
        SELECT 1 FROM post_tags pt WHERE pt.post_id = p.id AND pt.tag_id = $1))";

const ARCHIVE_MONTH: &str = "to_char(p.created_at AT TIME ZONE 'UTC', 'YYYY-MM')";

/// PostgreSQL implementation of PostReader.
#[derive(Clone)]
pub struct PostgresPostReader {
    pool: PgPool,
}

impl PostgresPostReader {
    /// Creates a new PostgresPostReader.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Appends the newest-first ordering and, when paging, LIMIT/OFFSET.
fn newest_first_sql(mut sql: String, page: Option<Page>) -> String {
    sql.push_str(" ORDER BY p.created_at DESC, p.id DESC");
    if let Some(page) = page {
        sql.push_str(&format!(" LIMIT {} OFFSET {}", page.limit(), page.offset()));
    }
    sql
}

fn list_published_sql(page: Option<Page>) -> String {
    newest_first_sql(
        format!(
            "SELECT {} FROM posts p WHERE p.is_published AND {}",
            POST_COLUMNS, TAG_FILTER
        ),
        page,
    )
}

fn list_by_archive_sql(page: Option<Page>) -> String {
    newest_first_sql(
        format!(
            "SELECT {} FROM posts p WHERE p.is_published AND {} = $1",
            POST_COLUMNS, ARCHIVE_MONTH
        ),
        page,
    )
}

#[async_trait]
impl PostReader for PostgresPostReader {
    async fn list_published(
        &self,
        tag: Option<TagId>,
        page: Option<Page>,
    ) -> Result<Vec<Post>, DomainError> {
        let rows = sqlx::query(&list_published_sql(page))
            .bind(tag.map(|t| t.as_i64()))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to list published posts", e))?;

        rows.iter().map(row_to_post).collect()
    }

    async fn list_all(&self, tag: Option<TagId>) -> Result<Vec<Post>, DomainError> {
        let sql = newest_first_sql(
            format!("SELECT {} FROM posts p WHERE {}", POST_COLUMNS, TAG_FILTER),
            None,
        );
        let rows = sqlx::query(&sql)
            .bind(tag.map(|t| t.as_i64()))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to list posts", e))?;

        rows.iter().map(row_to_post).collect()
    }

    async fn count_published(&self, tag: Option<TagId>) -> Result<u64, DomainError> {
        let sql = format!(
            "SELECT COUNT(*) AS total FROM posts p WHERE p.is_published AND {}",
            TAG_FILTER
        );
        let row = sqlx::query(&sql)
            .bind(tag.map(|t| t.as_i64()))
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("Failed to count published posts", e))?;

        count_column(&row, "total")
    }

    async fn most_viewed(&self, limit: u32) -> Result<Vec<Post>, DomainError> {
        let sql = format!(
            "SELECT {} FROM posts p WHERE p.is_published ORDER BY p.view DESC, p.id DESC LIMIT $1",
            POST_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to fetch most viewed posts", e))?;

        rows.iter().map(row_to_post).collect()
    }

    async fn most_commented(&self, limit: u32) -> Result<Vec<CommentedPost>, DomainError> {
        let sql = format!(
            r#"
            SELECT {}, c.total
            FROM posts p
            JOIN (
                SELECT post_id, COUNT(*) AS total FROM comments GROUP BY post_id
            ) c ON c.post_id = p.id
            WHERE p.is_published
            ORDER BY c.total DESC, p.id DESC
            LIMIT $1
            "#,
            POST_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to fetch most commented posts", e))?;

        rows.iter()
            .map(|row| {
                Ok(CommentedPost {
                    post: row_to_post(row)?,
                    comment_total: count_column(row, "total")?,
                })
            })
            .collect()
    }

    async fn archives(&self) -> Result<Vec<Archive>, DomainError> {
        let sql = format!(
            r#"
            SELECT {month} AS month, COUNT(*) AS total
            FROM posts p
            WHERE p.is_published
            GROUP BY {month}
            ORDER BY month DESC
            "#,
            month = ARCHIVE_MONTH
        );
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to fetch archives", e))?;

        rows.iter()
            .map(|row| {
                let month: String = column(row, "month")?;
                let month: ArchiveMonth = month.parse().map_err(|e| {
                    DomainError::new(
                        ErrorCode::DatabaseError,
                        format!("Invalid archive month '{}': {}", month, e),
                    )
                })?;
                Ok(Archive {
                    month,
                    total: count_column(row, "total")?,
                })
            })
            .collect()
    }

    async fn list_by_archive(
        &self,
        month: ArchiveMonth,
        page: Option<Page>,
    ) -> Result<Vec<Post>, DomainError> {
        let rows = sqlx::query(&list_by_archive_sql(page))
            .bind(month.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to list archive posts", e))?;

        rows.iter().map(row_to_post).collect()
    }

    async fn count_by_archive(&self, month: ArchiveMonth) -> Result<u64, DomainError> {
        let sql = format!(
            "SELECT COUNT(*) AS total FROM posts p WHERE p.is_published AND {} = $1",
            ARCHIVE_MONTH
        );
        let row = sqlx::query(&sql)
            .bind(month.to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("Failed to count archive posts", e))?;

        count_column(&row, "total")
    }
}
