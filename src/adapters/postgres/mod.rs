//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! This module provides adapters for PostgreSQL-backed persistence:
//! - `PostgresPostRepository` / `PostgresPostReader` - Posts, archives and rankings
//! - `PostgresTagRepository` - Tags and the post/tag join table
//! - `PostgresUserRepository` - Accounts and GitHub bindings
//! - `PostgresCommentRepository` - Comments joined with their authors
//! - `PostgresSubscriberRepository` - Newsletter subscribers
//! - `PostgresLinkRepository` / `PostgresAppDataRepository` - Blogroll and app blobs
//!
//! Schema changes live in `migrations/` and are applied through [`MIGRATOR`].

mod app_data_repository;
mod comment_repository;
mod link_repository;
mod post_reader;
mod post_repository;
mod subscriber_repository;
mod tag_repository;
mod user_repository;

pub use app_data_repository::PostgresAppDataRepository;
pub use comment_repository::PostgresCommentRepository;
pub use link_repository::PostgresLinkRepository;
pub use post_reader::PostgresPostReader;
pub use post_repository::PostgresPostRepository;
pub use subscriber_repository::PostgresSubscriberRepository;
pub use tag_repository::PostgresTagRepository;
pub use user_repository::PostgresUserRepository;

use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, Row};

use crate::domain::foundation::{DomainError, ErrorCode, Timestamp};

/// Embedded schema migrations.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Apply pending migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), DomainError> {
    MIGRATOR
        .run(pool)
        .await
        .map_err(|e| DomainError::database("Failed to run migrations", e))
}

/// Map a driver error, turning unique-key violations into `Conflict`.
fn db_error(context: &str, err: sqlx::Error) -> DomainError {
    match err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => DomainError::new(
            ErrorCode::Conflict,
            format!("{}: {}", context, db_err.message()),
        ),
        other => DomainError::database(context, other),
    }
}

fn column<'r, T>(row: &'r PgRow, name: &str) -> Result<T, DomainError>
where
    T: sqlx::Decode<'r, Postgres> + sqlx::Type<Postgres>,
{
    row.try_get(name)
        .map_err(|e| DomainError::database(&format!("Failed to get {}", name), e))
}

fn timestamp_column(row: &PgRow, name: &str) -> Result<Timestamp, DomainError> {
    let value: chrono::DateTime<chrono::Utc> = column(row, name)?;
    Ok(Timestamp::from_datetime(value))
}

fn count_column(row: &PgRow, name: &str) -> Result<u64, DomainError> {
    let value: i64 = column(row, name)?;
    Ok(value.max(0) as u64)
}
