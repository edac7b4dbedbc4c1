//! Account entity representing a verified PIMXCHAT user.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::pending_registration::PendingRegistration;
use crate::errors::AccountError;

/// Grant handed out after a password-reset code validates
///
/// Authorizes exactly one password change while it is fresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetGrant {
    pub token: Uuid,
    pub issued_at: DateTime<Utc>,
}

impl ResetGrant {
    pub fn new(issued_at: DateTime<Utc>) -> Self {
        Self {
            token: Uuid::new_v4(),
            issued_at,
        }
    }

    /// Fresh while `now < issued_at + window`
    pub fn is_valid_at(&self, now: DateTime<Utc>, window: Duration) -> bool {
        now < self.issued_at + window
    }
}

/// Account entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier for the account
    pub id: Uuid,

    /// Normalized email address, unique across accounts
    pub email: String,

    /// Display name, unique across accounts
    pub username: String,

    pub age: Option<u32>,

    /// bcrypt hash of the password
    pub password_hash: String,

    pub is_active: bool,

    /// Set once the registration email code was confirmed
    pub is_verified: bool,

    /// Ask for an emailed code on login
    pub two_factor_enabled: bool,

    /// Send notices for new logins, password resets and email changes
    pub login_notifications_enabled: bool,

    pub date_joined: DateTime<Utc>,

    pub last_login_at: Option<DateTime<Utc>>,

    /// Last successful login code verification
    pub last_two_factor_at: Option<DateTime<Utc>>,

    pub login_count: u64,

    /// Address awaiting confirmation through an email-change code
    pub pending_email: Option<String>,

    #[serde(default)]
    pub reset_grant: Option<ResetGrant>,
}

impl Account {
    /// Create an active, verified account from a confirmed registration
    pub fn from_registration(pending: &PendingRegistration, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: pending.email.clone(),
            username: pending.username.clone(),
            age: pending.age,
            password_hash: pending.password_hash.clone(),
            is_active: true,
            is_verified: true,
            two_factor_enabled: false,
            login_notifications_enabled: true,
            date_joined: now,
            last_login_at: None,
            last_two_factor_at: None,
            login_count: 0,
            pending_email: None,
            reset_grant: None,
        }
    }

    /// Whether a login at `now` needs a second factor
    ///
    /// Required when 2FA is enabled and no login code was verified within
    /// the interval.
    pub fn requires_login_code(&self, now: DateTime<Utc>, interval: Duration) -> bool {
        if !self.two_factor_enabled {
            return false;
        }
        match self.last_two_factor_at {
            None => true,
            Some(last) => now - last > interval,
        }
    }

    /// Record a completed login
    pub fn record_login(&mut self, now: DateTime<Utc>) {
        self.last_login_at = Some(now);
        self.login_count += 1;
    }

    /// Record a verified login code and complete the login
    pub fn record_two_factor(&mut self, now: DateTime<Utc>) {
        self.last_two_factor_at = Some(now);
        self.record_login(now);
    }

    /// Check a plaintext password against the stored hash
    pub fn verify_password(&self, password: &str) -> bool {
        bcrypt::verify(password, &self.password_hash).unwrap_or(false)
    }

    /// Replace the password hash and drop any outstanding reset grant
    pub fn set_password_hash(&mut self, password_hash: String) {
        self.password_hash = password_hash;
        self.reset_grant = None;
    }

    /// Apply the pending email, returning the address it replaced
    pub fn apply_pending_email(&mut self) -> Option<String> {
        let new_email = self.pending_email.take()?;
        Some(std::mem::replace(&mut self.email, new_email))
    }

    /// Apply a field-level change in place
    ///
    /// Conditional changes check the stored state they depend on and fail
    /// without touching the account when it has moved on.
    pub fn apply(&mut self, update: &AccountUpdate) -> Result<(), AccountError> {
        match update {
            AccountUpdate::RecordLogin { at, two_factor } => {
                if *two_factor {
                    self.record_two_factor(*at);
                } else {
                    self.record_login(*at);
                }
            }
            AccountUpdate::SetResetGrant(grant) => self.reset_grant = grant.clone(),
            AccountUpdate::ResetPassword {
                password_hash,
                grant,
            } => {
                if self.reset_grant.as_ref().map(|g| g.token) != Some(*grant) {
                    return Err(AccountError::InvalidResetGrant);
                }
                self.set_password_hash(password_hash.clone());
            }
            AccountUpdate::SetPendingEmail(email) => self.pending_email = email.clone(),
            AccountUpdate::ApplyPendingEmail { expected } => {
                if self.pending_email.as_deref() != Some(expected.as_str()) {
                    return Err(AccountError::NoPendingEmailChange);
                }
                self.apply_pending_email();
            }
            AccountUpdate::SetTwoFactor(enabled) => self.two_factor_enabled = *enabled,
            AccountUpdate::SetLoginNotifications(enabled) => {
                self.login_notifications_enabled = *enabled
            }
        }
        Ok(())
    }
}

/// A change to some fields of a stored account
///
/// Repositories apply these atomically against the current record, so flows
/// that finish at the same time never write back stale copies of each
/// other's fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountUpdate {
    /// A completed login; `two_factor` also stamps the verified login code
    RecordLogin { at: DateTime<Utc>, two_factor: bool },
    SetResetGrant(Option<ResetGrant>),
    /// New password hash, accepted only while `grant` is the stored reset
    /// grant; the grant is used up
    ResetPassword { password_hash: String, grant: Uuid },
    SetPendingEmail(Option<String>),
    /// Promote the pending address to the account email, provided it is
    /// still `expected`
    ApplyPendingEmail { expected: String },
    SetTwoFactor(bool),
    SetLoginNotifications(bool),
}
