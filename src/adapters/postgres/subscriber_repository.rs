//! PostgreSQL implementation of SubscriberRepository.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::PgPool;

use super::{column, count_column, db_error, timestamp_column};
use crate::domain::foundation::{DomainError, ErrorCode, SubscriberId, Timestamp};
use crate::domain::subscriber::Subscriber;
use crate::domain::user::validate_email;
use crate::ports::SubscriberRepository;

const SUBSCRIBER_COLUMNS: &str = "id, email, verify_state, subscribe_state, out_time, \
     signature, secret_key, created_at, updated_at";

/// Confirmed and not unsubscribed.
const ACTIVE_FILTER: &str = "verify_state AND subscribe_state";

// Re-subscribing returns the existing row so the caller can re-issue its token.
fn upsert_sql() -> String {
    format!(
        r#"
        INSERT INTO subscribers (email) VALUES ($1)
        ON CONFLICT (email) DO UPDATE SET email = EXCLUDED.email
        RETURNING {}
        "#,
        SUBSCRIBER_COLUMNS
    )
}

fn list_sql(active_only: bool) -> String {
    let mut sql = format!("SELECT {} FROM subscribers", SUBSCRIBER_COLUMNS);
    if active_only {
        sql.push_str(" WHERE ");
        sql.push_str(ACTIVE_FILTER);
    }
    sql.push_str(" ORDER BY id");
    sql
}

fn count_active_sql() -> String {
    format!("SELECT COUNT(*) AS total FROM subscribers WHERE {}", ACTIVE_FILTER)
}

fn find_by_sql(key: &str) -> String {
    format!("SELECT {} FROM subscribers WHERE {} = $1", SUBSCRIBER_COLUMNS, key)
}

/// PostgreSQL implementation of SubscriberRepository.
#[derive(Clone)]
pub struct PostgresSubscriberRepository {
    pool: PgPool,
}

impl PostgresSubscriberRepository {
    /// Creates a new PostgresSubscriberRepository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubscriberRepository for PostgresSubscriberRepository {
    async fn upsert_by_email(&self, email: &str) -> Result<Subscriber, DomainError> {
        let email = validate_email(email)?;
        let row = sqlx::query(&upsert_sql())
            .bind(&email)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("Failed to upsert subscriber", e))?;

        row_to_subscriber(&row)
    }

    async fn update(&self, subscriber: &Subscriber) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE subscribers SET
                verify_state = $2,
                subscribe_state = $3,
                out_time = $4,
                signature = $5,
                secret_key = $6,
                updated_at = $7
            WHERE id = $1
            "#,
        )
        .bind(subscriber.id.as_i64())
        .bind(subscriber.verify_state)
        .bind(subscriber.subscribe_state)
        .bind(subscriber.out_time.as_ref().map(|t| *t.as_datetime()))
        .bind(subscriber.signature.as_deref())
        .bind(subscriber.secret_key.as_deref())
        .bind(subscriber.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to update subscriber", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::SubscriberNotFound,
                format!("Subscriber not found: {}", subscriber.id),
            ));
        }

        Ok(())
    }

    async fn list(&self, active_only: bool) -> Result<Vec<Subscriber>, DomainError> {
        let rows = sqlx::query(&list_sql(active_only))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to list subscribers", e))?;

        rows.iter().map(row_to_subscriber).collect()
    }

    async fn count_active(&self) -> Result<u64, DomainError> {
        let row = sqlx::query(&count_active_sql())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("Failed to count subscribers", e))?;

        count_column(&row, "total")
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Subscriber>, DomainError> {
        let row = sqlx::query(&find_by_sql("email"))
            .bind(email.trim())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to fetch subscriber by email", e))?;

        row.as_ref().map(row_to_subscriber).transpose()
    }

    async fn find_by_signature(&self, signature: &str) -> Result<Option<Subscriber>, DomainError> {
        let row = sqlx::query(&find_by_sql("signature"))
            .bind(signature)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to fetch subscriber by signature", e))?;

        row.as_ref().map(row_to_subscriber).transpose()
    }

    async fn find_by_id(&self, id: SubscriberId) -> Result<Option<Subscriber>, DomainError> {
        let row = sqlx::query(&find_by_sql("id"))
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to fetch subscriber", e))?;

        row.as_ref().map(row_to_subscriber).transpose()
    }
}

fn row_to_subscriber(row: &PgRow) -> Result<Subscriber, DomainError> {
    let id: i64 = column(row, "id")?;
    let out_time: Option<chrono::DateTime<chrono::Utc>> = column(row, "out_time")?;
    Ok(Subscriber {
        id: SubscriberId::from_db(id),
        email: column(row, "email")?,
        verify_state: column(row, "verify_state")?,
        subscribe_state: column(row, "subscribe_state")?,
        out_time: out_time.map(Timestamp::from_datetime),
        signature: column(row, "signature")?,
        secret_key: column(row, "secret_key")?,
        created_at: timestamp_column(row, "created_at")?,
        updated_at: timestamp_column(row, "updated_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_list_has_no_filter() {
        let sql = list_sql(false);
        assert!(!sql.contains("WHERE"));
        assert!(sql.ends_with("FROM subscribers ORDER BY id"));
    }

    #[test]
    fn active_list_requires_confirmed_and_subscribed() {
        let sql = list_sql(true);
        assert!(sql.ends_with("WHERE verify_state AND subscribe_state ORDER BY id"));
    }

    #[test]
    fn active_count_matches_active_list() {
        assert!(count_active_sql().ends_with(ACTIVE_FILTER));
    }

    #[test]
    fn upsert_keeps_existing_row() {
        let sql = upsert_sql();
        assert!(sql.contains("ON CONFLICT (email) DO UPDATE"));
        assert!(sql.contains("RETURNING id, email"));
    }

    #[test]
    fn lookups_bind_a_single_key() {
        assert!(find_by_sql("signature").ends_with("WHERE signature = $1"));
        assert!(find_by_sql("email").contains(SUBSCRIBER_COLUMNS));
    }
}
