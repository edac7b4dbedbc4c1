//! Notification Module
//!
//! Delivery of one-time codes and account notices by email. Messages are
//! composed here; providers only transport them.
//!
//! ## Providers
//!
//! - **mock**: logs messages instead of sending them, for development and
//!   tests

use std::sync::Arc;

use tracing::warn;

use pimx_core::services::Notifier;
use pimx_shared::config::NotifierConfig;

pub mod message;
pub mod mock_notifier;

pub use message::{compose_code_message, compose_notice_message, EmailMessage};
pub use mock_notifier::MockNotifier;

#[cfg(test)]
mod tests;

/// Create a notifier based on configuration
///
/// Unknown providers fall back to the mock notifier.
pub fn create_notifier(config: &NotifierConfig) -> Arc<dyn Notifier> {
    if config.provider != "mock" {
        warn!(
            provider = %config.provider,
            "Unknown notifier provider, using mock notifier"
        );
    }
    Arc::new(MockNotifier::new(config.clone()))
}
