//! Types for verification manager results

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::VerificationChallenge;

/// Outcome of handing a code to the notifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DeliveryStatus {
    /// Accepted by the notifier with this message id
    Sent { message_id: String },
    /// Notifier failed or timed out; the stored code is still valid
    Failed { reason: String },
}

impl DeliveryStatus {
    pub fn is_sent(&self) -> bool {
        matches!(self, DeliveryStatus::Sent { .. })
    }
}

/// Result of issuing a code
#[derive(Debug, Clone)]
pub struct IssuedCode {
    /// The challenge that was stored
    pub challenge: VerificationChallenge,
    pub delivery: DeliveryStatus,
}

/// Non-code messages sent to account holders
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AccountNotice {
    /// The password was replaced through a reset
    PasswordChanged { username: String },
    /// The account email moved to `new_email`; sent to the old address
    EmailChanged { username: String, new_email: String },
    /// A login completed; `login_count` includes this one
    NewLogin {
        username: String,
        login_count: u64,
        at: DateTime<Utc>,
    },
}
