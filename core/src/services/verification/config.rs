//! Configuration for the verification code manager

use chrono::Duration;
use pimx_shared::VerificationConfig;

/// Configuration for the verification code manager
#[derive(Debug, Clone)]
pub struct VerificationServiceConfig {
    /// Minutes a code stays valid after issuance
    pub window_minutes: i64,
    /// Minimum minutes between issuances for the same challenge slot
    pub cooldown_minutes: i64,
    /// Mismatches tolerated before the code is invalidated (`None` = unlimited)
    pub max_failed_attempts: Option<u32>,
    /// Upper bound on one notifier call
    pub delivery_timeout_seconds: u64,
}

impl Default for VerificationServiceConfig {
    fn default() -> Self {
        Self::from(&VerificationConfig::default())
    }
}

impl From<&VerificationConfig> for VerificationServiceConfig {
    fn from(config: &VerificationConfig) -> Self {
        Self {
            window_minutes: config.window_minutes,
            cooldown_minutes: config.cooldown_minutes,
            max_failed_attempts: config.max_failed_attempts,
            delivery_timeout_seconds: config.delivery_timeout_seconds,
        }
    }
}

impl VerificationServiceConfig {
    pub fn window(&self) -> Duration {
        Duration::minutes(self.window_minutes)
    }

    pub fn cooldown(&self) -> Duration {
        Duration::minutes(self.cooldown_minutes)
    }

    pub fn delivery_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.delivery_timeout_seconds)
    }
}
