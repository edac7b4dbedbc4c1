//! Request and result types for the account flows

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::Account;
use crate::domain::value_objects::ChallengeStatus;

/// Sign-up form
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub age: Option<u32>,
    pub password: String,
    pub password_confirmation: String,
}

/// A registration waiting for its email code
#[derive(Debug, Clone, Serialize)]
pub struct RegistrationStarted {
    /// Handle the client presents on every later registration call
    pub token: Uuid,
    pub status: ChallengeStatus,
}

/// Result of a password check
#[derive(Debug, Clone)]
pub enum LoginOutcome {
    /// Login completed
    Authenticated(Account),
    /// A login code was sent; finish with `verify_login_code`
    CodeRequired {
        account_id: Uuid,
        status: ChallengeStatus,
    },
}

/// A password reset waiting for its email code
#[derive(Debug, Clone, Serialize)]
pub struct PasswordResetStarted {
    pub account_id: Uuid,
    pub status: ChallengeStatus,
}
