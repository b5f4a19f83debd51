//! Subscriber module - newsletter sign-ups with e-mail verification.

mod token;

pub use token::{compute_signature, generate_secret_key};

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, ErrorCode, SubscriberId, Timestamp};

/// A newsletter subscriber.
///
/// "Active" subscribers have confirmed their address (`verify_state`) and not
/// opted out since (`subscribe_state`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscriber {
    pub id: SubscriberId,
    pub email: String,
    pub verify_state: bool,
    pub subscribe_state: bool,
    /// Expiry of the current token.
    pub out_time: Option<Timestamp>,
    pub signature: Option<String>,
    #[serde(skip_serializing)]
    pub secret_key: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Subscriber {
    /// A freshly inserted, unverified subscriber.
    pub fn new(id: SubscriberId, email: String, created_at: Timestamp) -> Self {
        Self {
            id,
            email,
            verify_state: false,
            subscribe_state: false,
            out_time: None,
            signature: None,
            secret_key: None,
            created_at,
            updated_at: created_at,
        }
    }

    pub fn is_active(&self) -> bool {
        self.verify_state && self.subscribe_state
    }

    /// Rotate the secret key and sign a token valid for `ttl` from `now`.
    ///
    /// Returns the new signature, which is also stored on the subscriber.
    pub fn issue_token(&mut self, ttl: Duration, now: Timestamp) -> Result<String, DomainError> {
        let secret_key = generate_secret_key();
        let out_time = now.checked_plus(ttl).ok_or_else(|| {
            DomainError::new(
                ErrorCode::OutOfRange,
                format!("Token lifetime of {}s is out of range", ttl.num_seconds()),
            )
        })?;
        let signature = compute_signature(&secret_key, &self.email, out_time.as_unix_secs())?;

        self.secret_key = Some(secret_key);
        self.out_time = Some(out_time);
        self.signature = Some(signature.clone());
        self.updated_at = now;
        Ok(signature)
    }

    /// Check a token presented by the subscriber.
    ///
    /// # Errors
    ///
    /// - `SignatureInvalid` if no token was issued or the signature differs
    /// - `SignatureExpired` if `now` is past `out_time`
    pub fn verify_token(&self, signature: &str, now: Timestamp) -> Result<(), DomainError> {
        let (secret_key, out_time) = match (&self.secret_key, &self.out_time) {
            (Some(key), Some(out_time)) => (key, out_time),
            _ => {
                return Err(DomainError::new(
                    ErrorCode::SignatureInvalid,
                    "No token issued for subscriber",
                ))
            }
        };

        let expected = compute_signature(secret_key, &self.email, out_time.as_unix_secs())?;
        if !token::constant_time_eq(&expected, signature) {
            return Err(DomainError::new(
                ErrorCode::SignatureInvalid,
                "Subscriber signature mismatch",
            ));
        }
        if now.is_after(out_time) {
            return Err(DomainError::new(
                ErrorCode::SignatureExpired,
                format!("Subscriber token expired at {}", out_time.as_datetime()),
            ));
        }
        Ok(())
    }

    /// Mark the address as confirmed and subscribed.
    pub fn confirm(&mut self) {
        self.verify_state = true;
        self.subscribe_state = true;
        self.updated_at = Timestamp::now();
    }

    /// Opt out. The address stays verified.
    pub fn unsubscribe(&mut self) {
        self.subscribe_state = false;
        self.updated_at = Timestamp::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subscriber() -> Subscriber {
        Subscriber::new(SubscriberId::from_db(1), "reader@example.com".into(), Timestamp::now())
    }

    #[test]
    fn fresh_subscriber_is_inactive() {
        assert!(!subscriber().is_active());
    }

    #[test]
    fn issued_token_verifies() {
        let mut sub = subscriber();
        let now = Timestamp::now();
        let sig = sub.issue_token(Duration::hours(1), now).unwrap();
        assert_eq!(sub.signature.as_deref(), Some(sig.as_str()));
        assert!(sub.verify_token(&sig, now).is_ok());
    }

    #[test]
    fn tampered_token_is_rejected() {
        let mut sub = subscriber();
        let now = Timestamp::now();
        sub.issue_token(Duration::hours(1), now).unwrap();
        let err = sub.verify_token("deadbeef", now).unwrap_err();
        assert_eq!(err.code, ErrorCode::SignatureInvalid);
    }

    #[test]
    fn expired_token_is_rejected() {
        let mut sub = subscriber();
        let now = Timestamp::now();
        let sig = sub.issue_token(Duration::seconds(10), now).unwrap();
        let err = sub.verify_token(&sig, now.checked_plus_secs(11).unwrap()).unwrap_err();
        assert_eq!(err.code, ErrorCode::SignatureExpired);
    }

    #[test]
    fn unrepresentable_expiry_is_rejected() {
        let mut sub = subscriber();
        let err = sub.issue_token(Duration::MAX, Timestamp::now()).unwrap_err();
        assert_eq!(err.code, ErrorCode::OutOfRange);
        assert!(sub.signature.is_none());
    }

    #[test]
    fn reissuing_invalidates_previous_token() {
        let mut sub = subscriber();
        let now = Timestamp::now();
        let first = sub.issue_token(Duration::hours(1), now).unwrap();
        let second = sub.issue_token(Duration::hours(1), now).unwrap();
        assert!(sub.verify_token(&first, now).is_err());
        assert!(sub.verify_token(&second, now).is_ok());
    }

    #[test]
    fn verify_without_token_fails() {
        let err = subscriber().verify_token("x", Timestamp::now()).unwrap_err();
        assert_eq!(err.code, ErrorCode::SignatureInvalid);
    }

    #[test]
    fn confirm_then_unsubscribe() {
        let mut sub = subscriber();
        sub.confirm();
        assert!(sub.is_active());
        sub.unsubscribe();
        assert!(!sub.is_active());
        assert!(sub.verify_state);
    }
}
