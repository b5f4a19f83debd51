use async_trait::async_trait;

use super::{conflict, not_found, InMemoryBlogStore, State};
use crate::domain::foundation::{DomainError, ErrorCode, Timestamp, UserId, ValidationError};
use crate::domain::user::{non_blank, NewUser, User};
use crate::ports::UserRepository;

fn check_unique(
    state: &State,
    id: Option<UserId>,
    email: Option<&str>,
    github_login_id: Option<&str>,
) -> Result<(), DomainError> {
    for other in state.users.values().filter(|u| Some(u.id) != id) {
        if email.is_some() && other.email.as_deref() == email {
            return Err(conflict("E-mail already registered"));
        }
        if github_login_id.is_some() && other.github_login_id.as_deref() == github_login_id {
            return Err(conflict("GitHub account already bound"));
        }
    }
    Ok(())
}

fn user_mut(state: &mut State, id: UserId) -> Result<&mut User, DomainError> {
    state
        .users
        .get_mut(&id)
        .ok_or_else(|| not_found(ErrorCode::UserNotFound, "User", id))
}

fn insert_locked(state: &mut State, new: &NewUser) -> Result<User, DomainError> {
    let mut new = new.clone();
    new.email = non_blank(new.email.as_deref());
    new.github_login_id = non_blank(new.github_login_id.as_deref());
    check_unique(state, None, new.email.as_deref(), new.github_login_id.as_deref())?;

    let id = UserId::from_db(state.next_id());
    let user = User::from_new(id, new, Timestamp::now());
    state.users.insert(id, user.clone());
    Ok(user)
}

#[async_trait]
impl UserRepository for InMemoryBlogStore {
    async fn insert(&self, user: &NewUser) -> Result<User, DomainError> {
        let mut state = self.state.write().await;
        insert_locked(&mut state, user)
    }

    async fn save(&self, user: &User) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        let email = non_blank(user.email.as_deref());
        let github = non_blank(user.github_login_id.as_deref());
        check_unique(&state, Some(user.id), email.as_deref(), github.as_deref())?;
        let stored = user_mut(&mut state, user.id)?;
        *stored = User {
            email,
            github_login_id: github,
            updated_at: Timestamp::now(),
            ..user.clone()
        };
        Ok(())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, DomainError> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .users
            .values()
            .find(|u| u.email.as_deref() == Some(email))
            .cloned())
    }

    async fn first_or_create_by_github(&self, user: &NewUser) -> Result<User, DomainError> {
        let login = non_blank(user.github_login_id.as_deref())
            .ok_or_else(|| DomainError::from(ValidationError::empty_field("github_login_id")))?;
        let mut state = self.state.write().await;
        if let Some(existing) = state
            .users
            .values()
            .find(|u| u.github_login_id.as_deref() == Some(login.as_str()))
        {
            return Ok(existing.clone());
        }
        insert_locked(&mut state, user)
    }

    async fn find_github_conflict(
        &self,
        github_login_id: &str,
        excluding: UserId,
    ) -> Result<Option<User>, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .users
            .values()
            .find(|u| u.id != excluding && u.github_login_id.as_deref() == Some(github_login_id))
            .cloned())
    }

    async fn update_profile(
        &self,
        id: UserId,
        avatar_url: &str,
        nick_name: &str,
    ) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        let user = user_mut(&mut state, id)?;
        user.avatar_url = avatar_url.to_string();
        user.nick_name = nick_name.to_string();
        user.updated_at = Timestamp::now();
        Ok(())
    }

    async fn update_email(&self, id: UserId, email: Option<&str>) -> Result<(), DomainError> {
        let email = non_blank(email);
        let mut state = self.state.write().await;
        check_unique(&state, Some(id), email.as_deref(), None)?;
        let user = user_mut(&mut state, id)?;
        user.email = email;
        user.updated_at = Timestamp::now();
        Ok(())
    }

    async fn update_github_info(
        &self,
        id: UserId,
        github_login_id: Option<&str>,
        avatar_url: &str,
        github_url: &str,
    ) -> Result<(), DomainError> {
        let login = non_blank(github_login_id);
        let mut state = self.state.write().await;
        check_unique(&state, Some(id), None, login.as_deref())?;
        let user = user_mut(&mut state, id)?;
        user.github_login_id = login;
        user.avatar_url = avatar_url.to_string();
        user.github_url = github_url.to_string();
        user.updated_at = Timestamp::now();
        Ok(())
    }

    async fn set_lock_state(&self, id: UserId, locked: bool) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        let user = user_mut(&mut state, id)?;
        user.lock_state = locked;
        user.updated_at = Timestamp::now();
        Ok(())
    }

    async fn list_non_admin(&self) -> Result<Vec<User>, DomainError> {
        let state = self.state.read().await;
        Ok(state.users.values().filter(|u| !u.is_admin).cloned().collect())
    }

    async fn count(&self) -> Result<u64, DomainError> {
        Ok(self.state.read().await.users.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reader(login: &str) -> NewUser {
        NewUser::from_github(login, "https://avatars/x.png", "https://github.com/x").unwrap()
    }

    #[tokio::test]
    async fn first_or_create_by_github_is_stable() {
        let store = InMemoryBlogStore::new();
        let a = store.first_or_create_by_github(&reader("octocat")).await.unwrap();
        let b = store.first_or_create_by_github(&reader("octocat")).await.unwrap();
        assert_eq!(a.id, b.id);
        assert_eq!(UserRepository::count(&store).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let store = InMemoryBlogStore::new();
        let admin = NewUser::with_email("me@blog.io", "h").unwrap().admin();
        UserRepository::insert(&store, &admin).await.unwrap();
        let err = UserRepository::insert(&store, &admin).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn blank_email_is_stored_as_none() {
        let store = InMemoryBlogStore::new();
        let user = store.first_or_create_by_github(&reader("octocat")).await.unwrap();
        store.update_email(user.id, Some("a@b.io")).await.unwrap();
        store.update_email(user.id, Some("")).await.unwrap();
        let stored = UserRepository::find_by_id(&store, user.id).await.unwrap().unwrap();
        assert!(stored.email.is_none());
    }

    #[tokio::test]
    async fn github_conflict_excludes_self() {
        let store = InMemoryBlogStore::new();
        let a = store.first_or_create_by_github(&reader("octocat")).await.unwrap();
        let b = store.first_or_create_by_github(&reader("hubot")).await.unwrap();

        assert!(store.find_github_conflict("octocat", a.id).await.unwrap().is_none());
        let clash = store.find_github_conflict("octocat", b.id).await.unwrap();
        assert_eq!(clash.map(|u| u.id), Some(a.id));
    }

    #[tokio::test]
    async fn clearing_github_login_stores_none() {
        let store = InMemoryBlogStore::new();
        let user = store.first_or_create_by_github(&reader("octocat")).await.unwrap();
        store.update_github_info(user.id, Some(""), "", "").await.unwrap();
        let stored = UserRepository::find_by_id(&store, user.id).await.unwrap().unwrap();
        assert!(stored.github_login_id.is_none());
    }

    #[tokio::test]
    async fn list_non_admin_skips_admins() {
        let store = InMemoryBlogStore::new();
        UserRepository::insert(&store, &NewUser::with_email("me@blog.io", "h").unwrap().admin())
            .await
            .unwrap();
        store.first_or_create_by_github(&reader("octocat")).await.unwrap();
        let readers = store.list_non_admin().await.unwrap();
        assert_eq!(readers.len(), 1);
        assert_eq!(readers[0].nick_name, "octocat");
    }

    #[tokio::test]
    async fn lock_state_round_trips() {
        let store = InMemoryBlogStore::new();
        let user = store.first_or_create_by_github(&reader("octocat")).await.unwrap();
        store.set_lock_state(user.id, true).await.unwrap();
        let stored = UserRepository::find_by_id(&store, user.id).await.unwrap().unwrap();
        assert!(stored.is_locked());
    }
}
