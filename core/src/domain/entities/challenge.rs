//! Verification challenge entity: one active one-time code per principal and purpose.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use pimx_shared::utils::validation::CODE_LENGTH;

/// Upper bound (exclusive) of the numeric code space
pub const CODE_SPACE: u32 = 1_000_000;

/// Format a number from the code space as a zero-padded six-digit code
pub fn format_code(value: u32) -> String {
    format!("{:0width$}", value % CODE_SPACE, width = CODE_LENGTH)
}

/// What a successful code match unlocks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Purpose {
    /// Activate a pending registration
    Registration,
    /// Complete a login that requires a second factor
    LoginTwoFactor,
    /// Allow a new password to be set
    PasswordReset,
    /// Apply a pending email address change
    EmailChange,
}

impl Purpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            Purpose::Registration => "registration",
            Purpose::LoginTwoFactor => "login_two_factor",
            Purpose::PasswordReset => "password_reset",
            Purpose::EmailChange => "email_change",
        }
    }
}

impl std::fmt::Display for Purpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Purpose {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "registration" => Ok(Purpose::Registration),
            "login_two_factor" => Ok(Purpose::LoginTwoFactor),
            "password_reset" => Ok(Purpose::PasswordReset),
            "email_change" => Ok(Purpose::EmailChange),
            _ => Err(format!("Unknown verification purpose: {}", s)),
        }
    }
}

/// The entity a code is issued for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum PrincipalRef {
    /// A durable account
    Account(Uuid),
    /// A registration that has not been verified yet, addressed by its token
    PendingRegistration(Uuid),
}

impl std::fmt::Display for PrincipalRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrincipalRef::Account(id) => write!(f, "account:{}", id),
            PrincipalRef::PendingRegistration(token) => write!(f, "pending:{}", token),
        }
    }
}

/// Identifies the single challenge slot for a principal and purpose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChallengeKey {
    pub principal: PrincipalRef,
    pub purpose: Purpose,
}

impl ChallengeKey {
    pub fn new(principal: PrincipalRef, purpose: Purpose) -> Self {
        Self { principal, purpose }
    }

    pub fn account(id: Uuid, purpose: Purpose) -> Self {
        Self::new(PrincipalRef::Account(id), purpose)
    }

    pub fn registration(token: Uuid) -> Self {
        Self::new(PrincipalRef::PendingRegistration(token), Purpose::Registration)
    }
}

impl std::fmt::Display for ChallengeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.principal, self.purpose)
    }
}

/// A freshly issued code, returned to the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationChallenge {
    pub key: ChallengeKey,
    /// Six ASCII digits, zero-padded
    pub code: String,
    pub issued_at: DateTime<Utc>,
}

/// Stored state of a challenge slot
///
/// `last_issued_at` outlives consumption so the resend cooldown still
/// applies after a code has been used.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeRecord {
    pub code: Option<String>,
    pub issued_at: Option<DateTime<Utc>>,
    pub last_issued_at: Option<DateTime<Utc>>,
    pub failed_attempts: u32,
}

impl ChallengeRecord {
    /// Record state right after issuance; replaces whatever was there
    pub fn issued(code: impl Into<String>, issued_at: DateTime<Utc>) -> Self {
        Self {
            code: Some(code.into()),
            issued_at: Some(issued_at),
            last_issued_at: Some(issued_at),
            failed_attempts: 0,
        }
    }

    /// Whether a code is stored (expiry is decided by the caller's clock)
    pub fn has_code(&self) -> bool {
        self.code.as_deref().map_or(false, |c| !c.is_empty())
    }

    /// Clear the code after a successful match; timestamps are kept
    pub fn consume(&mut self) {
        self.code = None;
        self.failed_attempts = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_code_zero_pads() {
        assert_eq!(format_code(0), "000000");
        assert_eq!(format_code(42), "000042");
        assert_eq!(format_code(999_999), "999999");
    }

    #[test]
    fn test_key_display_is_stable() {
        let id = Uuid::nil();
        let key = ChallengeKey::account(id, Purpose::PasswordReset);
        assert_eq!(
            key.to_string(),
            "account:00000000-0000-0000-0000-000000000000:password_reset"
        );
        let key = ChallengeKey::registration(id);
        assert!(key.to_string().starts_with("pending:"));
        assert_eq!(key.purpose, Purpose::Registration);
    }

    #[test]
    fn test_purpose_round_trips_through_str() {
        for purpose in [
            Purpose::Registration,
            Purpose::LoginTwoFactor,
            Purpose::PasswordReset,
            Purpose::EmailChange,
        ] {
            assert_eq!(purpose.as_str().parse::<Purpose>().unwrap(), purpose);
        }
        assert!("chat".parse::<Purpose>().is_err());
    }

    #[test]
    fn test_purpose_serializes_like_as_str() {
        let json = serde_json::to_string(&Purpose::LoginTwoFactor).unwrap();
        assert_eq!(json, "\"login_two_factor\"");
    }

    #[test]
    fn test_consume_keeps_issue_timestamps() {
        let now = Utc::now();
        let mut record = ChallengeRecord::issued("123456", now);
        record.failed_attempts = 2;
        assert!(record.has_code());

        record.consume();
        assert!(!record.has_code());
        assert_eq!(record.issued_at, Some(now));
        assert_eq!(record.last_issued_at, Some(now));
        assert_eq!(record.failed_attempts, 0);
    }
}
