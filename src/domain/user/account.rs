//! User accounts.
//!
//! A user is either the blog's administrator (signs in with e-mail and
//! password) or a reader who signed in through GitHub in order to comment.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, ErrorCode, Timestamp, UserId, ValidationError};

/// A user that has not been stored yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewUser {
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub is_admin: bool,
    pub nick_name: String,
    pub avatar_url: String,
    pub github_url: String,
    pub github_login_id: Option<String>,
}

impl NewUser {
    /// An account that signs in with e-mail and password.
    pub fn with_email(
        email: &str,
        password_hash: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            email: Some(validate_email(email)?),
            password_hash: Some(password_hash.into()),
            ..Self::default()
        })
    }

    /// An account created on first GitHub sign-in.
    pub fn from_github(
        login_id: &str,
        avatar_url: impl Into<String>,
        github_url: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let login_id = non_blank(Some(login_id))
            .ok_or_else(|| ValidationError::empty_field("github_login_id"))?;
        Ok(Self {
            nick_name: login_id.clone(),
            github_login_id: Some(login_id),
            avatar_url: avatar_url.into(),
            github_url: github_url.into(),
            ..Self::default()
        })
    }

    /// Mark the account as administrator.
    pub fn admin(mut self) -> Self {
        self.is_admin = true;
        self
    }
}

/// A stored user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub is_admin: bool,
    pub nick_name: String,
    pub avatar_url: String,
    pub github_url: String,
    pub github_login_id: Option<String>,
    pub lock_state: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// Materialise a freshly inserted account.
    pub fn from_new(id: UserId, new: NewUser, created_at: Timestamp) -> Self {
        Self {
            id,
            email: new.email,
            password_hash: new.password_hash,
            is_admin: new.is_admin,
            nick_name: new.nick_name,
            avatar_url: new.avatar_url,
            github_url: new.github_url,
            github_login_id: new.github_login_id,
            lock_state: false,
            created_at,
            updated_at: created_at,
        }
    }

    pub fn is_locked(&self) -> bool {
        self.lock_state
    }

    /// Locked users may not comment or sign in.
    ///
    /// # Errors
    ///
    /// - `Forbidden` if the account is locked
    pub fn ensure_active(&self) -> Result<(), DomainError> {
        if self.lock_state {
            return Err(DomainError::new(
                ErrorCode::Forbidden,
                format!("User {} is locked", self.id),
            ));
        }
        Ok(())
    }
}

/// Check an e-mail address and return it trimmed.
pub fn validate_email(email: &str) -> Result<String, ValidationError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ValidationError::empty_field("email"));
    }
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => {
            Ok(email.to_string())
        }
        _ => Err(ValidationError::invalid_format(
            "email",
            format!("'{}' is not an e-mail address", email),
        )),
    }
}

/// `None` for missing or blank strings, the trimmed value otherwise.
///
/// Nullable unique columns (e-mail, GitHub login) store NULL rather than `""`.
pub fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
