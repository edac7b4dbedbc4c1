//! Configuration for the account flows

use chrono::Duration;
use pimx_shared::VerificationConfig;

/// Configuration for the account service
#[derive(Debug, Clone)]
pub struct AccountServiceConfig {
    /// A verified login code keeps 2FA satisfied for this long
    pub two_factor_interval_hours: i64,
    /// Lifetime of a pending registration
    pub pending_registration_ttl_minutes: i64,
    /// Lifetime of a password reset grant
    pub reset_grant_minutes: i64,
    /// bcrypt work factor
    pub password_hash_cost: u32,
}

impl Default for AccountServiceConfig {
    fn default() -> Self {
        Self::from(&VerificationConfig::default())
    }
}

impl From<&VerificationConfig> for AccountServiceConfig {
    fn from(config: &VerificationConfig) -> Self {
        Self {
            two_factor_interval_hours: config.two_factor_interval_hours,
            pending_registration_ttl_minutes: config.pending_registration_ttl_minutes,
            reset_grant_minutes: config.reset_grant_minutes,
            password_hash_cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl AccountServiceConfig {
    pub fn two_factor_interval(&self) -> Duration {
        Duration::hours(self.two_factor_interval_hours)
    }

    pub fn pending_registration_ttl(&self) -> Duration {
        Duration::minutes(self.pending_registration_ttl_minutes)
    }

    pub fn reset_grant_window(&self) -> Duration {
        Duration::minutes(self.reset_grant_minutes)
    }
}
