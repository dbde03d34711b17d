//! One-time password records
//!
//! A record binds a 6-digit code to an email address for a short window. Only the
//! most recent record per email is checkable; issuing a new code supersedes the
//! old one at the store. Verification is replay-protected: a consumed record can
//! never pass again.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::OtpError;

/// Default code lifetime in minutes.
pub const DEFAULT_TTL_MINUTES: i64 = 5;

/// A one-time code bound to an email address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpRecord {
    pub email: String,
    pub code: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub verified: bool,
}

impl OtpRecord {
    /// Issue a fresh record for `email` with a random 6-digit code.
    /// The email is normalized to lowercase so later lookups are case-insensitive.
    pub fn issue(email: &str, ttl: Duration, now: DateTime<Utc>) -> Self {
        Self {
            email: email.to_lowercase(),
            code: generate_code(),
            created_at: now,
            expires_at: now + ttl,
            verified: false,
        }
    }

    /// Check a supplied code against this record. `NotFound` is the caller's
    /// concern (no record at all); the remaining failures are ordered:
    /// already-consumed, then expired, then mismatch.
    pub fn check(&self, code: &str, now: DateTime<Utc>) -> Result<(), OtpError> {
        if self.verified {
            return Err(OtpError::AlreadyConsumed);
        }
        if now > self.expires_at {
            return Err(OtpError::Expired);
        }
        if code != self.code {
            return Err(OtpError::Mismatch);
        }
        Ok(())
    }
}

/// Generate a uniformly random 6-digit code (100000..=999999).
pub fn generate_code() -> String {
    let code: u32 = rand::thread_rng().gen_range(100_000..=999_999);
    code.to_string()
}
