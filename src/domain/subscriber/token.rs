//! Signed confirmation / unsubscribe tokens.
//!
//! Each subscriber gets a random secret key. The token handed out in e-mail
//! links is `hex(HMAC-SHA256(secret_key, "<email>:<expiry unix secs>"))`.
//! Comparison is constant-time.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use uuid::Uuid;

use crate::domain::foundation::{DomainError, ErrorCode};

type HmacSha256 = Hmac<Sha256>;

/// Fresh random secret for a subscriber.
pub fn generate_secret_key() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Sign `email` with `secret_key` for a token expiring at `expires_at_unix`.
pub fn compute_signature(
    secret_key: &str,
    email: &str,
    expires_at_unix: i64,
) -> Result<String, DomainError> {
    let mut mac = HmacSha256::new_from_slice(secret_key.as_bytes()).map_err(|e| {
        DomainError::new(ErrorCode::InternalError, format!("Invalid HMAC key: {}", e))
    })?;
    mac.update(email.as_bytes());
    mac.update(b":");
    mac.update(expires_at_unix.to_string().as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Constant-time string comparison.
pub(crate) fn constant_time_eq(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}
