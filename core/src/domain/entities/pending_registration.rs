//! Registration awaiting email confirmation.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sign-up data held until the registration code is confirmed
///
/// Addressed by an explicit token handed to the client, never by a
/// server-side session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingRegistration {
    pub token: Uuid,
    pub email: String,
    pub username: String,
    pub age: Option<u32>,
    /// Hashed before it is stored; the plaintext never leaves the request
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl PendingRegistration {
    pub fn new(
        email: String,
        username: String,
        age: Option<u32>,
        password_hash: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            token: Uuid::new_v4(),
            email,
            username,
            age,
            password_hash,
            created_at,
        }
    }

    /// Whether the record outlived its TTL at `now`
    pub fn is_stale(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now >= self.created_at + ttl
    }
}
