//! GithubSignInHandler - Command handler for GitHub OAuth sign-in.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::foundation::{DomainError, ErrorCode, Timestamp, UserId, ValidationError};
use crate::domain::user::{non_blank, NewUser, User};
use crate::ports::UserRepository;

/// Profile data returned by GitHub after a successful OAuth exchange.
#[derive(Debug, Clone)]
pub struct GithubProfile {
    pub login: String,
    pub avatar_url: String,
    pub html_url: String,
}

/// Handler signing readers in with GitHub, creating accounts on first visit.
pub struct GithubSignInHandler {
    users: Arc<dyn UserRepository>,
}

impl GithubSignInHandler {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn handle(&self, profile: GithubProfile) -> Result<User, DomainError> {
        // 1. Find or create the account
        let new_user = NewUser::from_github(&profile.login, &profile.avatar_url, &profile.html_url)?;
        let mut user = self.users.first_or_create_by_github(&new_user).await?;

        // 2. Refresh what GitHub may have changed since last time
        self.users
            .update_github_info(
                user.id,
                user.github_login_id.as_deref(),
                &profile.avatar_url,
                &profile.html_url,
            )
            .await?;
        user.avatar_url = profile.avatar_url;
        user.github_url = profile.html_url;
        user.updated_at = Timestamp::now();

        // 3. Locked accounts may not sign in
        if let Err(err) = user.ensure_active() {
            warn!(user_id = %user.id, "Rejected sign-in for locked user");
            return Err(err);
        }

        info!(user_id = %user.id, "GitHub sign-in");
        Ok(user)
    }
}

/// Command binding a GitHub identity to an existing account.
#[derive(Debug, Clone)]
pub struct BindGithubCommand {
    pub user_id: UserId,
    pub profile: GithubProfile,
}

/// Handler for linking GitHub to an e-mail account.
pub struct BindGithubHandler {
    users: Arc<dyn UserRepository>,
}

impl BindGithubHandler {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn handle(&self, cmd: BindGithubCommand) -> Result<User, DomainError> {
        let login = non_blank(Some(&cmd.profile.login))
            .ok_or_else(|| ValidationError::empty_field("github_login_id"))?;

        let mut user = self.users.find_by_id(cmd.user_id).await?.ok_or_else(|| {
            DomainError::new(
                ErrorCode::UserNotFound,
                format!("User not found: {}", cmd.user_id),
            )
        })?;

        if let Some(holder) = self
            .users
            .find_github_conflict(&login, cmd.user_id)
            .await?
        {
            return Err(DomainError::new(
                ErrorCode::Conflict,
                format!("GitHub account {} is bound to another user", login),
            )
            .with_detail("holder", holder.id.to_string()));
        }

        self.users
            .update_github_info(
                user.id,
                Some(&login),
                &cmd.profile.avatar_url,
                &cmd.profile.html_url,
            )
            .await?;
        user.github_login_id = Some(login);
        user.avatar_url = cmd.profile.avatar_url;
        user.github_url = cmd.profile.html_url;
        user.updated_at = Timestamp::now();

        info!(user_id = %user.id, "Bound GitHub account");
        Ok(user)
    }
}
