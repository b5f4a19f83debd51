//! PostgreSQL implementation of AppDataRepository.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::PgPool;

use super::{column, db_error, timestamp_column};
use crate::domain::app_data::{validate_app_data_name, AppData};
use crate::domain::foundation::DomainError;
use crate::ports::AppDataRepository;

// Saving under an existing name replaces the blob.
const UPSERT_SQL: &str = r#"
    INSERT INTO app_data (name, data) VALUES ($1, $2)
    ON CONFLICT (name) DO UPDATE SET data = EXCLUDED.data, updated_at = NOW()
    RETURNING name, data, updated_at
"#;

const FIND_BY_NAME_SQL: &str = "SELECT name, data, updated_at FROM app_data WHERE name = $1";

/// PostgreSQL implementation of AppDataRepository.
#[derive(Clone)]
pub struct PostgresAppDataRepository {
    pool: PgPool,
}

impl PostgresAppDataRepository {
    /// Creates a new PostgresAppDataRepository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AppDataRepository for PostgresAppDataRepository {
    async fn upsert(&self, name: &str, data: &str) -> Result<AppData, DomainError> {
        let name = validate_app_data_name(name)?;
        let row = sqlx::query(UPSERT_SQL)
            .bind(&name)
            .bind(data)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("Failed to save app data", e))?;

        row_to_app_data(&row)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<AppData>, DomainError> {
        let row = sqlx::query(FIND_BY_NAME_SQL)
            .bind(name.trim())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to fetch app data", e))?;

        row.as_ref().map(row_to_app_data).transpose()
    }
}

fn row_to_app_data(row: &PgRow) -> Result<AppData, DomainError> {
    Ok(AppData {
        name: column(row, "name")?,
        data: column(row, "data")?,
        updated_at: timestamp_column(row, "updated_at")?,
    })
}
