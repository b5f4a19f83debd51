//! SubscribeHandler - Command handler for newsletter sign-ups.

use std::sync::Arc;

use chrono::Duration;
use tracing::info;

use crate::domain::foundation::{DomainError, Timestamp};
use crate::domain::subscriber::Subscriber;
use crate::ports::SubscriberRepository;

/// Command to sign an address up.
#[derive(Debug, Clone)]
pub struct SubscribeCommand {
    pub email: String,
}

/// The stored subscriber and the token to mail out for confirmation.
#[derive(Debug, Clone)]
pub struct SubscribeResult {
    pub subscriber: Subscriber,
    pub signature: String,
}

/// Handler for newsletter sign-ups.
///
/// Signing up again re-issues the token, replacing the previous one.
pub struct SubscribeHandler {
    subscribers: Arc<dyn SubscriberRepository>,
    token_ttl: Duration,
}

impl SubscribeHandler {
    pub fn new(subscribers: Arc<dyn SubscriberRepository>, token_ttl: Duration) -> Self {
        Self {
            subscribers,
            token_ttl,
        }
    }

    pub async fn handle(&self, cmd: SubscribeCommand) -> Result<SubscribeResult, DomainError> {
        let mut subscriber = self.subscribers.upsert_by_email(&cmd.email).await?;
        let signature = subscriber.issue_token(self.token_ttl, Timestamp::now())?;
        self.subscribers.update(&subscriber).await?;

        info!(subscriber_id = %subscriber.id, "Issued subscription token");
        Ok(SubscribeResult {
            subscriber,
            signature,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryBlogStore;
    use crate::domain::foundation::ErrorCode;

    #[tokio::test]
    async fn issues_token_and_stores_it() {
        let store = InMemoryBlogStore::new();
        let handler = SubscribeHandler::new(Arc::new(store.clone()), Duration::hours(1));

        let result = handler
            .handle(SubscribeCommand {
                email: "reader@blog.io".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(result.signature.len(), 64);
        assert!(!result.subscriber.is_active());
        let stored = store
            .find_by_signature(&result.signature)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.id, result.subscriber.id);
    }

    #[tokio::test]
    async fn resubscribing_rotates_token() {
        let store = InMemoryBlogStore::new();
        let handler = SubscribeHandler::new(Arc::new(store.clone()), Duration::hours(1));
        let cmd = SubscribeCommand {
            email: "reader@blog.io".to_string(),
        };

        let first = handler.handle(cmd.clone()).await.unwrap();
        let second = handler.handle(cmd).await.unwrap();

        assert_eq!(first.subscriber.id, second.subscriber.id);
        assert_ne!(first.signature, second.signature);
        assert!(store.find_by_signature(&first.signature).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn invalid_email_is_rejected() {
        let store = InMemoryBlogStore::new();
        let handler = SubscribeHandler::new(Arc::new(store), Duration::hours(1));
        let err = handler
            .handle(SubscribeCommand {
                email: "not-an-address".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidFormat);
    }
}
