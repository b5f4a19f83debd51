//! Subscriber repository port.

use crate::domain::foundation::{DomainError, SubscriberId};
use crate::domain::subscriber::Subscriber;
use async_trait::async_trait;

#[async_trait]
pub trait SubscriberRepository: Send + Sync {
    /// Return the subscriber for `email`, creating an unverified one if needed.
    async fn upsert_by_email(&self, email: &str) -> Result<Subscriber, DomainError>;

    /// Persist verify/subscribe state, token expiry, signature and secret key.
    ///
    /// # Errors
    ///
    /// - `SubscriberNotFound` if the subscriber doesn't exist
    async fn update(&self, subscriber: &Subscriber) -> Result<(), DomainError>;

    /// All subscribers, or only verified and still-subscribed ones.
    async fn list(&self, active_only: bool) -> Result<Vec<Subscriber>, DomainError>;

    /// Verified and still-subscribed count.
    async fn count_active(&self) -> Result<u64, DomainError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Subscriber>, DomainError>;

    async fn find_by_signature(&self, signature: &str) -> Result<Option<Subscriber>, DomainError>;

    async fn find_by_id(&self, id: SubscriberId) -> Result<Option<Subscriber>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscriber_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn SubscriberRepository) {}
    }
}
