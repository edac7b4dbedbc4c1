//! Storage interface for verification challenges.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::{ChallengeKey, ChallengeRecord};
use crate::errors::DomainError;

/// Persistence of challenge slots, one per `(principal, purpose)`
///
/// Implementations must make [`ChallengeStore::consume`] atomic: two
/// concurrent calls with the same code may not both observe success.
#[async_trait]
pub trait ChallengeStore: Send + Sync {
    /// Load the current state of a slot
    async fn load(&self, key: &ChallengeKey) -> Result<Option<ChallengeRecord>, DomainError>;

    /// Store a freshly issued code, replacing any previous one
    ///
    /// Sets `issued_at` and `last_issued_at` to `issued_at` and resets the
    /// failure counter.
    async fn store_issued(
        &self,
        key: &ChallengeKey,
        code: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<(), DomainError>;

    /// Clear the code only if it still equals `expected`
    ///
    /// Returns `false` when another caller consumed or replaced it first.
    async fn consume(&self, key: &ChallengeKey, expected: &str) -> Result<bool, DomainError>;

    /// Count a mismatch, returning the new total
    async fn record_failure(&self, key: &ChallengeKey) -> Result<u32, DomainError>;

    /// Drop the active code but keep the issue timestamps
    async fn invalidate(&self, key: &ChallengeKey) -> Result<(), DomainError>;

    /// Forget the slot entirely
    async fn remove(&self, key: &ChallengeKey) -> Result<(), DomainError>;
}
