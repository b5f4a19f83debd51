//! ConfirmSubscriptionHandler and UnsubscribeHandler - token-authenticated
//! subscriber state changes.

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::{DomainError, ErrorCode, Timestamp};
use crate::domain::subscriber::Subscriber;
use crate::ports::SubscriberRepository;

/// Command carrying the token from a confirmation or opt-out link.
#[derive(Debug, Clone)]
pub struct SubscriptionTokenCommand {
    pub signature: String,
}

async fn verified_subscriber(
    subscribers: &dyn SubscriberRepository,
    signature: &str,
) -> Result<Subscriber, DomainError> {
    let subscriber = subscribers
        .find_by_signature(signature)
        .await?
        .ok_or_else(|| {
            DomainError::new(
                ErrorCode::SubscriberNotFound,
                "No subscriber holds this token",
            )
        })?;
    subscriber.verify_token(signature, Timestamp::now())?;
    Ok(subscriber)
}

/// Handler confirming an address.
pub struct ConfirmSubscriptionHandler {
    subscribers: Arc<dyn SubscriberRepository>,
}

impl ConfirmSubscriptionHandler {
    pub fn new(subscribers: Arc<dyn SubscriberRepository>) -> Self {
        Self { subscribers }
    }

    pub async fn handle(&self, cmd: SubscriptionTokenCommand) -> Result<Subscriber, DomainError> {
        let mut subscriber = verified_subscriber(self.subscribers.as_ref(), &cmd.signature).await?;
        subscriber.confirm();
        self.subscribers.update(&subscriber).await?;
        info!(subscriber_id = %subscriber.id, "Subscription confirmed");
        Ok(subscriber)
    }
}

/// Handler opting an address out.
pub struct UnsubscribeHandler {
    subscribers: Arc<dyn SubscriberRepository>,
}

impl UnsubscribeHandler {
    pub fn new(subscribers: Arc<dyn SubscriberRepository>) -> Self {
        Self { subscribers }
    }

    pub async fn handle(&self, cmd: SubscriptionTokenCommand) -> Result<Subscriber, DomainError> {
        let mut subscriber = verified_subscriber(self.subscribers.as_ref(), &cmd.signature).await?;
        subscriber.unsubscribe();
        self.subscribers.update(&subscriber).await?;
        info!(subscriber_id = %subscriber.id, "Unsubscribed");
        Ok(subscriber)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryBlogStore;
    use chrono::Duration;

    async fn issue(store: &InMemoryBlogStore, ttl: Duration) -> String {
        let mut sub = store.upsert_by_email("reader@blog.io").await.unwrap();
        let sig = sub.issue_token(ttl, Timestamp::now()).unwrap();
        store.update(&sub).await.unwrap();
        sig
    }

    fn token(signature: &str) -> SubscriptionTokenCommand {
        SubscriptionTokenCommand {
            signature: signature.to_string(),
        }
    }

    #[tokio::test]
    async fn confirm_then_unsubscribe() {
        let store = InMemoryBlogStore::new();
        let sig = issue(&store, Duration::hours(1)).await;

        let confirmed = ConfirmSubscriptionHandler::new(Arc::new(store.clone()))
            .handle(token(&sig))
            .await
            .unwrap();
        assert!(confirmed.is_active());
        assert_eq!(store.count_active().await.unwrap(), 1);

        let left = UnsubscribeHandler::new(Arc::new(store.clone()))
            .handle(token(&sig))
            .await
            .unwrap();
        assert!(!left.is_active());
        assert!(left.verify_state);
        assert_eq!(store.count_active().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn unknown_token_is_not_found() {
        let store = InMemoryBlogStore::new();
        let err = ConfirmSubscriptionHandler::new(Arc::new(store))
            .handle(token("deadbeef"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::SubscriberNotFound);
    }

    #[tokio::test]
    async fn expired_token_is_rejected() {
        let store = InMemoryBlogStore::new();
        let sig = issue(&store, Duration::seconds(-10)).await;
        let err = ConfirmSubscriptionHandler::new(Arc::new(store.clone()))
            .handle(token(&sig))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::SignatureExpired);
        assert_eq!(store.count_active().await.unwrap(), 0);
    }
}
