use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use pimx_core::domain::entities::{Account, Purpose, ResetGrant};
use pimx_core::domain::value_objects::ChallengeStatus;
use pimx_shared::Language;

use crate::i18n::Message;

/// Countdown shown on a verification screen
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChallengeStatusResponse {
    pub purpose: Purpose,
    pub remaining_seconds: i64,
    /// Localized countdown, e.g. "1 دقیقه و 15 ثانیه"
    pub remaining_label: String,
    pub resend_allowed: bool,
    pub resend_after_seconds: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivered: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ChallengeStatusResponse {
    pub fn new(status: ChallengeStatus, language: Language) -> Self {
        let message = status.delivered.map(|delivered| {
            let message = if delivered {
                Message::CodeSent
            } else {
                Message::CodeNotDelivered
            };
            message.text(language).to_string()
        });

        Self {
            purpose: status.purpose,
            remaining_seconds: status.remaining_seconds,
            remaining_label: status.remaining_label(language),
            resend_allowed: status.resend_allowed,
            resend_after_seconds: status.resend_after_seconds,
            delivered: status.delivered,
            message,
        }
    }
}

/// Public view of an account; the password hash never leaves the server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountResponse {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub age: Option<u32>,
    pub is_verified: bool,
    pub two_factor_enabled: bool,
    pub login_notifications_enabled: bool,
    pub date_joined: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_email: Option<String>,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            email: account.email,
            username: account.username,
            age: account.age,
            is_verified: account.is_verified,
            two_factor_enabled: account.two_factor_enabled,
            login_notifications_enabled: account.login_notifications_enabled,
            date_joined: account.date_joined,
            last_login_at: account.last_login_at,
            pending_email: account.pending_email,
        }
    }
}

/// Account plus a localized confirmation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountMessageResponse {
    pub message: String,
    pub account: AccountResponse,
}

impl AccountMessageResponse {
    pub fn new(account: Account, message: Message, language: Language) -> Self {
        Self {
            message: message.text(language).to_string(),
            account: account.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationStartedResponse {
    /// Handle for the later registration calls
    pub token: Uuid,
    pub verification: ChallengeStatusResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum LoginResponse {
    Authenticated {
        message: String,
        account: AccountResponse,
    },
    CodeRequired {
        message: String,
        account_id: Uuid,
        verification: ChallengeStatusResponse,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordResetStartedResponse {
    pub account_id: Uuid,
    pub verification: ChallengeStatusResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetGrantResponse {
    pub message: String,
    /// Present it to the complete step
    pub grant_token: Uuid,
    pub issued_at: DateTime<Utc>,
}

impl ResetGrantResponse {
    pub fn new(grant: ResetGrant, language: Language) -> Self {
        Self {
            message: Message::ResetCodeVerified.text(language).to_string(),
            grant_token: grant.token,
            issued_at: grant.issued_at,
        }
    }
}
