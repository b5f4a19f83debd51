//! PostgreSQL implementation of TagRepository.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::PgPool;

use super::{column, count_column, db_error, timestamp_column};
use crate::domain::foundation::{DomainError, ErrorCode, PostId, TagId};
use crate::domain::tag::{normalize_tag_name, PostTag, Tag, TagUsage};
use crate::ports::TagRepository;

const TAG_COLUMNS: &str = "t.id, t.name, t.created_at, t.updated_at";

/// Foreign key on `post_tags.tag_id`, as named by PostgreSQL.
const TAG_FOREIGN_KEY: &str = "post_tags_tag_id_fkey";

// The no-op update makes RETURNING yield the existing row on conflict.
fn insert_or_get_sql() -> String {
    format!(
        r#"
        INSERT INTO tags AS t (name) VALUES ($1)
        ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
        RETURNING {}
        "#,
        TAG_COLUMNS
    )
}

/// Tags used by at least one published post, with their post counts.
fn published_usage_sql() -> String {
    format!(
        r#"
        SELECT {cols}, COUNT(*) AS total
        FROM tags t
        JOIN post_tags pt ON pt.tag_id = t.id
        JOIN posts p ON p.id = pt.post_id
        WHERE p.is_published
        GROUP BY {cols}
        ORDER BY t.name
        "#,
        cols = TAG_COLUMNS
    )
}

fn list_by_post_sql() -> String {
    format!(
        r#"
        SELECT {}
        FROM tags t
        JOIN post_tags pt ON pt.tag_id = t.id
        WHERE pt.post_id = $1
        ORDER BY t.name
        "#,
        TAG_COLUMNS
    )
}

const ATTACH_SQL: &str = r#"
    INSERT INTO post_tags (post_id, tag_id) VALUES ($1, $2)
    ON CONFLICT (post_id, tag_id) DO NOTHING
"#;

fn missing_link_target(constraint: Option<&str>, link: &PostTag) -> DomainError {
    match constraint {
        Some(TAG_FOREIGN_KEY) => tag_not_found(link.tag_id),
        _ => DomainError::new(
            ErrorCode::PostNotFound,
            format!("Cannot tag post {}: post not found", link.post_id),
        ),
    }
}

/// PostgreSQL implementation of TagRepository.
#[derive(Clone)]
pub struct PostgresTagRepository {
    pool: PgPool,
}

impl PostgresTagRepository {
    /// Creates a new PostgresTagRepository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TagRepository for PostgresTagRepository {
    async fn insert_or_get(&self, name: &str) -> Result<Tag, DomainError> {
        let name = normalize_tag_name(name)?;
        let row = sqlx::query(&insert_or_get_sql())
            .bind(&name)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("Failed to insert tag", e))?;

        row_to_tag(&row)
    }

    async fn update(&self, tag: &Tag) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE tags SET name = $2, updated_at = $3 WHERE id = $1")
            .bind(tag.id().as_i64())
            .bind(tag.name())
            .bind(tag.updated_at().as_datetime())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to update tag", e))?;

        if result.rows_affected() == 0 {
            return Err(tag_not_found(tag.id()));
        }

        Ok(())
    }

    async fn delete(&self, id: TagId) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM tags WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to delete tag", e))?;

        if result.rows_affected() == 0 {
            return Err(tag_not_found(id));
        }

        Ok(())
    }

    async fn find_by_id(&self, id: TagId) -> Result<Option<Tag>, DomainError> {
        let sql = format!("SELECT {} FROM tags t WHERE t.id = $1", TAG_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to fetch tag", e))?;

        row.as_ref().map(row_to_tag).transpose()
    }

    async fn list_all(&self) -> Result<Vec<Tag>, DomainError> {
        let sql = format!("SELECT {} FROM tags t ORDER BY t.name", TAG_COLUMNS);
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to list tags", e))?;

        rows.iter().map(row_to_tag).collect()
    }

    async fn list_published_usage(&self) -> Result<Vec<TagUsage>, DomainError> {
        let rows = sqlx::query(&published_usage_sql())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to fetch tag usage", e))?;

        rows.iter()
            .map(|row| {
                Ok(TagUsage {
                    tag: row_to_tag(row)?,
                    total: count_column(row, "total")?,
                })
            })
            .collect()
    }

    async fn list_by_post(&self, post_id: PostId) -> Result<Vec<Tag>, DomainError> {
        let rows = sqlx::query(&list_by_post_sql())
            .bind(post_id.as_i64())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to fetch post tags", e))?;

        rows.iter().map(row_to_tag).collect()
    }

    async fn count(&self) -> Result<u64, DomainError> {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM tags")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("Failed to count tags", e))?;

        count_column(&row, "total")
    }

    async fn attach(&self, link: PostTag) -> Result<(), DomainError> {
        let result = sqlx::query(ATTACH_SQL)
            .bind(link.post_id.as_i64())
            .bind(link.tag_id.as_i64())
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db_err)) if db_err.is_foreign_key_violation() => {
                Err(missing_link_target(db_err.constraint(), &link))
            }
            Err(e) => Err(db_error("Failed to attach tag", e)),
        }
    }

    async fn detach_all(&self, post_id: PostId) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM post_tags WHERE post_id = $1")
            .bind(post_id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to detach tags", e))?;

        Ok(())
    }
}

fn tag_not_found(id: TagId) -> DomainError {
    DomainError::new(ErrorCode::TagNotFound, format!("Tag not found: {}", id))
}

fn row_to_tag(row: &PgRow) -> Result<Tag, DomainError> {
    let id: i64 = column(row, "id")?;
    Ok(Tag::reconstitute(
        TagId::from_db(id),
        column(row, "name")?,
        timestamp_column(row, "created_at")?,
        timestamp_column(row, "updated_at")?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_or_get_returns_existing_row_on_conflict() {
        let sql = insert_or_get_sql();
        assert!(sql.contains("ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name"));
        assert!(sql.contains(&format!("RETURNING {}", TAG_COLUMNS)));
    }

    #[test]
    fn usage_counts_only_published_posts() {
        let sql = published_usage_sql();
        assert!(sql.contains("WHERE p.is_published"));
        assert!(sql.contains(&format!("GROUP BY {}", TAG_COLUMNS)));
    }

    #[test]
    fn post_tags_are_sorted_by_name() {
        let sql = list_by_post_sql();
        assert!(sql.contains("WHERE pt.post_id = $1"));
        assert!(sql.contains("ORDER BY t.name"));
    }

    #[test]
    fn attaching_twice_is_a_no_op() {
        assert!(ATTACH_SQL.contains("ON CONFLICT (post_id, tag_id) DO NOTHING"));
    }

    #[test]
    fn missing_tag_is_tag_not_found() {
        let link = PostTag::new(PostId::from_db(1), TagId::from_db(2));
        assert_eq!(
            missing_link_target(Some("post_tags_tag_id_fkey"), &link).code,
            ErrorCode::TagNotFound
        );
        assert_eq!(
            missing_link_target(Some("post_tags_post_id_fkey"), &link).code,
            ErrorCode::PostNotFound
        );
    }
}
