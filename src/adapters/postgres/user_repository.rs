//! PostgreSQL implementation of UserRepository.
//!
//! `email` and `github_login_id` are nullable unique columns; blank values are
//! written as NULL so that many accounts may leave them unset.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::PgPool;

use super::{column, count_column, db_error, timestamp_column};
use crate::domain::foundation::{DomainError, ErrorCode, UserId, ValidationError};
use crate::domain::user::{non_blank, NewUser, User};
use crate::ports::UserRepository;

const USER_COLUMNS: &str = "id, email, password_hash, is_admin, nick_name, avatar_url, \
     github_url, github_login_id, lock_state, created_at, updated_at";

/// PostgreSQL implementation of UserRepository.
#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a new PostgresUserRepository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_one_by(
        &self,
        filter: &str,
        value: &str,
        context: &str,
    ) -> Result<Option<User>, DomainError> {
        let sql = format!("SELECT {} FROM users WHERE {} = $1", USER_COLUMNS, filter);
        let row = sqlx::query(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error(context, e))?;

        row.as_ref().map(row_to_user).transpose()
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn insert(&self, user: &NewUser) -> Result<User, DomainError> {
        let sql = format!(
            r#"
            INSERT INTO users (
                email, password_hash, is_admin, nick_name, avatar_url, github_url, github_login_id
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            USER_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(non_blank(user.email.as_deref()))
            .bind(user.password_hash.as_deref())
            .bind(user.is_admin)
            .bind(&user.nick_name)
            .bind(&user.avatar_url)
            .bind(&user.github_url)
            .bind(non_blank(user.github_login_id.as_deref()))
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("Failed to insert user", e))?;

        row_to_user(&row)
    }

    async fn save(&self, user: &User) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE users SET
                email = $2,
                password_hash = $3,
                is_admin = $4,
                nick_name = $5,
                avatar_url = $6,
                github_url = $7,
                github_login_id = $8,
                lock_state = $9,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(user.id.as_i64())
        .bind(non_blank(user.email.as_deref()))
        .bind(user.password_hash.as_deref())
        .bind(user.is_admin)
        .bind(&user.nick_name)
        .bind(&user.avatar_url)
        .bind(&user.github_url)
        .bind(non_blank(user.github_login_id.as_deref()))
        .bind(user.lock_state)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to update user", e))?;

        ensure_updated(result.rows_affected(), user.id)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, DomainError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to fetch user", e))?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        self.fetch_one_by("email", email.trim(), "Failed to fetch user by email")
            .await
    }

    async fn first_or_create_by_github(&self, user: &NewUser) -> Result<User, DomainError> {
        let login = non_blank(user.github_login_id.as_deref())
            .ok_or_else(|| DomainError::from(ValidationError::empty_field("github_login_id")))?;
        // The no-op update makes RETURNING yield the existing row on conflict.
        let sql = format!(
            r#"
            INSERT INTO users (
                email, is_admin, nick_name, avatar_url, github_url, github_login_id
            ) VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (github_login_id) DO UPDATE SET github_login_id = EXCLUDED.github_login_id
            RETURNING {}
            "#,
            USER_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(non_blank(user.email.as_deref()))
            .bind(user.is_admin)
            .bind(&user.nick_name)
            .bind(&user.avatar_url)
            .bind(&user.github_url)
            .bind(&login)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("Failed to create GitHub user", e))?;

        row_to_user(&row)
    }

    async fn find_github_conflict(
        &self,
        github_login_id: &str,
        excluding: UserId,
    ) -> Result<Option<User>, DomainError> {
        let sql = format!(
            "SELECT {} FROM users WHERE github_login_id = $1 AND id <> $2",
            USER_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(github_login_id)
            .bind(excluding.as_i64())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to check GitHub binding", e))?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn update_profile(
        &self,
        id: UserId,
        avatar_url: &str,
        nick_name: &str,
    ) -> Result<(), DomainError> {
        let result = sqlx::query(
            "UPDATE users SET avatar_url = $2, nick_name = $3, updated_at = NOW() WHERE id = $1",
        )
        .bind(id.as_i64())
        .bind(avatar_url)
        .bind(nick_name)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to update profile", e))?;

        ensure_updated(result.rows_affected(), id)
    }

    async fn update_email(&self, id: UserId, email: Option<&str>) -> Result<(), DomainError> {
        let result =
            sqlx::query("UPDATE users SET email = $2, updated_at = NOW() WHERE id = $1")
                .bind(id.as_i64())
                .bind(non_blank(email))
                .execute(&self.pool)
                .await
                .map_err(|e| db_error("Failed to update email", e))?;

        ensure_updated(result.rows_affected(), id)
    }

    async fn update_github_info(
        &self,
        id: UserId,
        github_login_id: Option<&str>,
        avatar_url: &str,
        github_url: &str,
    ) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE users SET
                github_login_id = $2,
                avatar_url = $3,
                github_url = $4,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id.as_i64())
        .bind(non_blank(github_login_id))
        .bind(avatar_url)
        .bind(github_url)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to update GitHub info", e))?;

        ensure_updated(result.rows_affected(), id)
    }

    async fn set_lock_state(&self, id: UserId, locked: bool) -> Result<(), DomainError> {
        let result =
            sqlx::query("UPDATE users SET lock_state = $2, updated_at = NOW() WHERE id = $1")
                .bind(id.as_i64())
                .bind(locked)
                .execute(&self.pool)
                .await
                .map_err(|e| db_error("Failed to update lock state", e))?;

        ensure_updated(result.rows_affected(), id)
    }

    async fn list_non_admin(&self) -> Result<Vec<User>, DomainError> {
        let sql = format!(
            "SELECT {} FROM users WHERE NOT is_admin ORDER BY id",
            USER_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to list users", e))?;

        rows.iter().map(row_to_user).collect()
    }

    async fn count(&self) -> Result<u64, DomainError> {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("Failed to count users", e))?;

        count_column(&row, "total")
    }
}

fn ensure_updated(rows_affected: u64, id: UserId) -> Result<(), DomainError> {
    if rows_affected == 0 {
        return Err(DomainError::new(
            ErrorCode::UserNotFound,
            format!("User not found: {}", id),
        ));
    }
    Ok(())
}

fn row_to_user(row: &PgRow) -> Result<User, DomainError> {
    let id: i64 = column(row, "id")?;
    Ok(User {
        id: UserId::from_db(id),
        email: column(row, "email")?,
        password_hash: column(row, "password_hash")?,
        is_admin: column(row, "is_admin")?,
        nick_name: column(row, "nick_name")?,
        avatar_url: column(row, "avatar_url")?,
        github_url: column(row, "github_url")?,
        github_login_id: column(row, "github_login_id")?,
        lock_state: column(row, "lock_state")?,
        created_at: timestamp_column(row, "created_at")?,
        updated_at: timestamp_column(row, "updated_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_rows_is_user_not_found() {
        let err = ensure_updated(0, UserId::from_db(4)).unwrap_err();
        assert_eq!(err.code, ErrorCode::UserNotFound);
        assert!(ensure_updated(1, UserId::from_db(4)).is_ok());
    }
}
