//! Soft access gate for the site shell.
//!
//! This is a convenience lock, not an access-control boundary: it keeps
//! the page from casual drive-by visitors and nothing more. The passphrase
//! is verified server-side and exchanged for a stateless session token the
//! caller stores; token validity is purely time-based, with the expiry
//! window supplied by the caller.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};

/// Holder of the configured passphrase.
#[derive(Debug, Clone)]
pub struct AccessGate {
    passphrase: String,
}

impl AccessGate {
    pub fn new(passphrase: impl Into<String>) -> Self {
        Self {
            passphrase: passphrase.into(),
        }
    }

    /// Fixed-scan comparison: every byte position is visited regardless of
    /// where the first mismatch sits.
    pub fn verify(&self, input: &str) -> bool {
        let expected = self.passphrase.as_bytes();
        let given = input.as_bytes();

        let mut matches = expected.len() == given.len();
        for i in 0..expected.len().max(given.len()) {
            let a = expected.get(i).copied().unwrap_or(0);
            let b = given.get(i).copied().unwrap_or(0);
            if a != b {
                matches = false;
            }
        }
        matches
    }
}

/// Session token: base64 of the issue timestamp in milliseconds. Opaque to
/// the caller but trivially forgeable by anyone who reads this code; that
/// is the documented deal for a soft gate.
pub fn issue_token(now: DateTime<Utc>) -> String {
    BASE64.encode(now.timestamp_millis().to_string())
}

/// Stateless validity check: the token decodes to a timestamp less than
/// `ttl` in the past.
pub fn validate_token(token: &str, now: DateTime<Utc>, ttl: Duration) -> bool {
    let Ok(decoded) = BASE64.decode(token) else {
        return false;
    };
    let Ok(text) = String::from_utf8(decoded) else {
        return false;
    };
    let Ok(issued_ms) = text.trim().parse::<i64>() else {
        return false;
    };
    let Some(issued) = DateTime::from_timestamp_millis(issued_ms) else {
        return false;
    };
    now.signed_duration_since(issued) < ttl
}
