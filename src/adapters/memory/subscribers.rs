use async_trait::async_trait;

use super::{not_found, InMemoryBlogStore};
use crate::domain::foundation::{DomainError, ErrorCode, SubscriberId, Timestamp};
use crate::domain::subscriber::Subscriber;
use crate::domain::user::validate_email;
use crate::ports::SubscriberRepository;

#[async_trait]
impl SubscriberRepository for InMemoryBlogStore {
    async fn upsert_by_email(&self, email: &str) -> Result<Subscriber, DomainError> {
        let email = validate_email(email)?;
        let mut state = self.state.write().await;
        if let Some(existing) = state.subscribers.values().find(|s| s.email == email) {
            return Ok(existing.clone());
        }
        let id = SubscriberId::from_db(state.next_id());
        let subscriber = Subscriber::new(id, email, Timestamp::now());
        state.subscribers.insert(id, subscriber.clone());
        Ok(subscriber)
    }

    async fn update(&self, subscriber: &Subscriber) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        let stored = state
            .subscribers
            .get_mut(&subscriber.id)
            .ok_or_else(|| not_found(ErrorCode::SubscriberNotFound, "Subscriber", subscriber.id))?;
        stored.verify_state = subscriber.verify_state;
        stored.subscribe_state = subscriber.subscribe_state;
        stored.out_time = subscriber.out_time;
        stored.signature = subscriber.signature.clone();
        stored.secret_key = subscriber.secret_key.clone();
        stored.updated_at = subscriber.updated_at;
        Ok(())
    }

    async fn list(&self, active_only: bool) -> Result<Vec<Subscriber>, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .subscribers
            .values()
            .filter(|s| !active_only || s.is_active())
            .cloned()
            .collect())
    }

    async fn count_active(&self) -> Result<u64, DomainError> {
        let state = self.state.read().await;
        Ok(state.subscribers.values().filter(|s| s.is_active()).count() as u64)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Subscriber>, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .subscribers
            .values()
            .find(|s| s.email == email.trim())
            .cloned())
    }

    async fn find_by_signature(&self, signature: &str) -> Result<Option<Subscriber>, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .subscribers
            .values()
            .find(|s| s.signature.as_deref() == Some(signature))
            .cloned())
    }

    async fn find_by_id(&self, id: SubscriberId) -> Result<Option<Subscriber>, DomainError> {
        Ok(self.state.read().await.subscribers.get(&id).cloned())
    }
}
