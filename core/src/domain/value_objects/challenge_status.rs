//! Snapshot of a challenge slot for display.

use pimx_shared::Language;
use serde::{Deserialize, Serialize};

use crate::domain::entities::Purpose;
use crate::services::verification::format_remaining;

/// Countdown and resend state of one challenge, as shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeStatus {
    pub purpose: Purpose,

    /// Whole seconds until the current code expires (0 when expired or absent)
    pub remaining_seconds: i64,

    /// Whether a new code may be requested now
    pub resend_allowed: bool,

    /// Seconds until a resend is allowed (0 when allowed)
    pub resend_after_seconds: i64,

    /// Delivery outcome of the issuance that produced this status, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivered: Option<bool>,
}

impl ChallengeStatus {
    /// Localized countdown text
    pub fn remaining_label(&self, language: Language) -> String {
        format_remaining(self.remaining_seconds, language)
    }

    pub fn is_expired(&self) -> bool {
        self.remaining_seconds <= 0
    }

    pub fn with_delivery(mut self, delivered: bool) -> Self {
        self.delivered = Some(delivered);
        self
    }
}
