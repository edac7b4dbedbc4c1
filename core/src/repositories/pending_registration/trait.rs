//! Holder for registrations awaiting email confirmation.

use async_trait::async_trait;
use chrono::Duration;
use uuid::Uuid;

use crate::domain::entities::PendingRegistration;
use crate::errors::DomainError;

/// Short-lived storage for pending registrations, addressed by token
///
/// Records disappear on their own once `ttl` elapses, independently of
/// the verification code's window.
#[async_trait]
pub trait PendingRegistrationStore: Send + Sync {
    /// Store or replace a record for `ttl`
    async fn put(&self, record: &PendingRegistration, ttl: Duration) -> Result<(), DomainError>;

    /// Fetch a live record
    async fn get(&self, token: Uuid) -> Result<Option<PendingRegistration>, DomainError>;

    /// Delete a record; missing records are not an error
    async fn remove(&self, token: Uuid) -> Result<(), DomainError>;
}
