//! One-time code verification configuration

use serde::{Deserialize, Serialize};

/// Knobs for the verification code lifecycle
///
/// The validity window and the resend cooldown share the same default
/// length but are independent settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct VerificationConfig {
    /// How long after issuance a code is accepted, in minutes
    #[serde(default = "default_window_minutes")]
    pub window_minutes: i64,

    /// Minimum spacing between successive issuances for one principal, in minutes
    #[serde(default = "default_cooldown_minutes")]
    pub cooldown_minutes: i64,

    /// Mismatches tolerated before a challenge is invalidated (`None` = unlimited)
    #[serde(default)]
    pub max_failed_attempts: Option<u32>,

    /// A successful login code keeps 2FA satisfied for this many hours
    #[serde(default = "default_two_factor_interval_hours")]
    pub two_factor_interval_hours: i64,

    /// Lifetime of a pending (not yet verified) registration, in minutes
    #[serde(default = "default_pending_registration_ttl_minutes")]
    pub pending_registration_ttl_minutes: i64,

    /// Lifetime of the grant handed out after a password-reset code validates
    #[serde(default = "default_reset_grant_minutes")]
    pub reset_grant_minutes: i64,

    /// Upper bound on a single delivery call, in seconds
    #[serde(default = "default_delivery_timeout_seconds")]
    pub delivery_timeout_seconds: u64,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            window_minutes: default_window_minutes(),
            cooldown_minutes: default_cooldown_minutes(),
            max_failed_attempts: None,
            two_factor_interval_hours: default_two_factor_interval_hours(),
            pending_registration_ttl_minutes: default_pending_registration_ttl_minutes(),
            reset_grant_minutes: default_reset_grant_minutes(),
            delivery_timeout_seconds: default_delivery_timeout_seconds(),
        }
    }
}

impl VerificationConfig {
    /// Create from environment variables, falling back to defaults per field
    pub fn from_env() -> Self {
        fn var<T: std::str::FromStr>(name: &str) -> Option<T> {
            std::env::var(name).ok().and_then(|v| v.parse().ok())
        }

        let defaults = Self::default();
        Self {
            window_minutes: var("VERIFICATION_WINDOW_MINUTES").unwrap_or(defaults.window_minutes),
            cooldown_minutes: var("VERIFICATION_COOLDOWN_MINUTES")
                .unwrap_or(defaults.cooldown_minutes),
            max_failed_attempts: var("VERIFICATION_MAX_FAILED_ATTEMPTS"),
            two_factor_interval_hours: var("TWO_FACTOR_INTERVAL_HOURS")
                .unwrap_or(defaults.two_factor_interval_hours),
            pending_registration_ttl_minutes: var("PENDING_REGISTRATION_TTL_MINUTES")
                .unwrap_or(defaults.pending_registration_ttl_minutes),
            reset_grant_minutes: var("RESET_GRANT_MINUTES").unwrap_or(defaults.reset_grant_minutes),
            delivery_timeout_seconds: var("DELIVERY_TIMEOUT_SECONDS")
                .unwrap_or(defaults.delivery_timeout_seconds),
        }
    }

    /// Enable attempt limiting
    pub fn with_max_failed_attempts(mut self, attempts: u32) -> Self {
        self.max_failed_attempts = Some(attempts);
        self
    }
}

fn default_window_minutes() -> i64 {
    2
}

fn default_cooldown_minutes() -> i64 {
    2
}

fn default_two_factor_interval_hours() -> i64 {
    24
}

fn default_pending_registration_ttl_minutes() -> i64 {
    30
}

fn default_reset_grant_minutes() -> i64 {
    10
}

fn default_delivery_timeout_seconds() -> u64 {
    10
}
