//! Notifier (code delivery) configuration

use serde::{Deserialize, Serialize};

/// Delivery channel configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NotifierConfig {
    /// Delivery provider ("mock" logs messages instead of sending them)
    pub provider: String,

    /// Sender address shown to recipients
    pub from_address: String,

    /// Product name used in message subjects
    #[serde(default = "default_product_name")]
    pub product_name: String,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            provider: String::from("mock"),
            from_address: String::from("no-reply@pimxchat.local"),
            product_name: default_product_name(),
        }
    }
}

impl NotifierConfig {
    /// Create from `NOTIFIER_PROVIDER` / `NOTIFIER_FROM_ADDRESS`
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            provider: std::env::var("NOTIFIER_PROVIDER").unwrap_or(defaults.provider),
            from_address: std::env::var("NOTIFIER_FROM_ADDRESS").unwrap_or(defaults.from_address),
            product_name: defaults.product_name,
        }
    }
}

fn default_product_name() -> String {
    String::from("PIMXCHAT")
}
