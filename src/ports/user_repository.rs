//! User repository port.
//!
//! `email` and `github_login_id` are nullable unique columns. Blank values are
//! stored as NULL so that many users can lack them.

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::user::{NewUser, User};
use async_trait::async_trait;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Store a new user.
    ///
    /// # Errors
    ///
    /// - `Conflict` if the e-mail or GitHub login is taken
    async fn insert(&self, user: &NewUser) -> Result<User, DomainError>;

    /// Persist every column of an existing user.
    ///
    /// # Errors
    ///
    /// - `UserNotFound` if the user doesn't exist
    async fn save(&self, user: &User) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, DomainError>;

    /// Sign-in lookup for e-mail/password accounts.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Return the user bound to `user.github_login_id`, creating it if needed.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if the new user has no GitHub login
    async fn first_or_create_by_github(&self, user: &NewUser) -> Result<User, DomainError>;

    /// Another user (not `excluding`) already bound to `github_login_id`.
    async fn find_github_conflict(
        &self,
        github_login_id: &str,
        excluding: UserId,
    ) -> Result<Option<User>, DomainError>;

    async fn update_profile(
        &self,
        id: UserId,
        avatar_url: &str,
        nick_name: &str,
    ) -> Result<(), DomainError>;

    /// Set or clear (`None` / blank) the e-mail address.
    async fn update_email(&self, id: UserId, email: Option<&str>) -> Result<(), DomainError>;

    /// Set or clear (blank login) the GitHub binding and refresh its profile fields.
    async fn update_github_info(
        &self,
        id: UserId,
        github_login_id: Option<&str>,
        avatar_url: &str,
        github_url: &str,
    ) -> Result<(), DomainError>;

    async fn set_lock_state(&self, id: UserId, locked: bool) -> Result<(), DomainError>;

    /// Readers only, ordered by id.
    async fn list_non_admin(&self) -> Result<Vec<User>, DomainError>;

    async fn count(&self) -> Result<u64, DomainError>;
}
