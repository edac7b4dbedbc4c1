//! Account repository trait defining the interface for account persistence.
//!
//! Email and username lookups are case-insensitive; implementations enforce
//! uniqueness of both on `create` and `update`.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::{Account, AccountUpdate};
use crate::errors::DomainError;

/// Repository trait for Account persistence operations
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Find an account by its identifier
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, DomainError>;

    /// Find an account by email address
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, DomainError>;

    /// Find an account by username
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, DomainError>;

    /// Persist a new account
    ///
    /// # Returns
    /// * `Err(DomainError::Account(AccountError::EmailTaken))` - email in use
    /// * `Err(DomainError::Account(AccountError::UsernameTaken))` - username in use
    async fn create(&self, account: Account) -> Result<Account, DomainError>;

    /// Replace a stored account
    ///
    /// Fails with `AccountNotFound` for unknown ids and `EmailTaken` when the
    /// new email belongs to another account.
    async fn update(&self, account: Account) -> Result<Account, DomainError>;

    /// Apply a field-level change to the current stored record atomically
    ///
    /// Returns the account as stored after the change. Besides the
    /// `update` errors, conditional changes fail with the error from
    /// [`Account::apply`] when the stored record no longer matches.
    async fn apply(&self, id: Uuid, update: AccountUpdate) -> Result<Account, DomainError>;
}
