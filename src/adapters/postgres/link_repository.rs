//! PostgreSQL implementation of LinkRepository.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::PgPool;

use super::{column, db_error, timestamp_column};
use crate::domain::foundation::{DomainError, ErrorCode, LinkId};
use crate::domain::link::{validate_url, Link, NewLink};
use crate::ports::LinkRepository;

const LINK_COLUMNS: &str = "id, name, url, sort, created_at, updated_at";

/// A url that is already in the blogroll returns its existing row.
fn insert_or_get_sql() -> String {
    format!(
        r#"
        INSERT INTO links (name, url, sort) VALUES ($1, $2, $3)
        ON CONFLICT (url) DO UPDATE SET url = EXCLUDED.url
        RETURNING {}
        "#,
        LINK_COLUMNS
    )
}

const UPDATE_SQL: &str = r#"
    UPDATE links SET name = $2, url = $3, sort = $4, updated_at = NOW()
    WHERE id = $1
"#;

fn list_sql() -> String {
    format!("SELECT {} FROM links ORDER BY sort, id", LINK_COLUMNS)
}

/// PostgreSQL implementation of LinkRepository.
#[derive(Clone)]
pub struct PostgresLinkRepository {
    pool: PgPool,
}

impl PostgresLinkRepository {
    /// Creates a new PostgresLinkRepository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkRepository for PostgresLinkRepository {
    async fn insert_or_get(&self, link: &NewLink) -> Result<Link, DomainError> {
        let row = sqlx::query(&insert_or_get_sql())
            .bind(&link.name)
            .bind(&link.url)
            .bind(link.sort)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("Failed to insert link", e))?;

        row_to_link(&row)
    }

    async fn save(&self, link: &Link) -> Result<(), DomainError> {
        let url = validate_url(&link.url)?;
        let result = sqlx::query(UPDATE_SQL)
            .bind(link.id.as_i64())
            .bind(&link.name)
            .bind(&url)
            .bind(link.sort)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to update link", e))?;

        if result.rows_affected() == 0 {
            return Err(link_not_found(link.id));
        }

        Ok(())
    }

    async fn delete(&self, id: LinkId) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM links WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to delete link", e))?;

        if result.rows_affected() == 0 {
            return Err(link_not_found(id));
        }

        Ok(())
    }

    async fn list(&self) -> Result<Vec<Link>, DomainError> {
        let rows = sqlx::query(&list_sql())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to list links", e))?;

        rows.iter().map(row_to_link).collect()
    }

    async fn find_by_id(&self, id: LinkId) -> Result<Option<Link>, DomainError> {
        let sql = format!("SELECT {} FROM links WHERE id = $1", LINK_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to fetch link", e))?;

        row.as_ref().map(row_to_link).transpose()
    }
}

fn link_not_found(id: LinkId) -> DomainError {
    DomainError::new(ErrorCode::LinkNotFound, format!("Link not found: {}", id))
}

fn row_to_link(row: &PgRow) -> Result<Link, DomainError> {
    let id: i64 = column(row, "id")?;
    Ok(Link {
        id: LinkId::from_db(id),
        name: column(row, "name")?,
        url: column(row, "url")?,
        sort: column(row, "sort")?,
        created_at: timestamp_column(row, "created_at")?,
        updated_at: timestamp_column(row, "updated_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_url_returns_existing_link() {
        let sql = insert_or_get_sql();
        assert!(sql.contains("ON CONFLICT (url) DO UPDATE SET url = EXCLUDED.url"));
        assert!(sql.contains(&format!("RETURNING {}", LINK_COLUMNS)));
    }

    #[test]
    fn blogroll_is_ordered_by_sort_then_id() {
        assert!(list_sql().ends_with("ORDER BY sort, id"));
    }

    #[test]
    fn update_touches_timestamp() {
        assert!(UPDATE_SQL.contains("updated_at = NOW()"));
        assert!(UPDATE_SQL.contains("WHERE id = $1"));
    }

    #[test]
    fn not_found_uses_link_code() {
        let err = link_not_found(LinkId::from_db(4));
        assert_eq!(err.code, ErrorCode::LinkNotFound);
        assert_eq!(err.message, "Link not found: 4");
    }
}
