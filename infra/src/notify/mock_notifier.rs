//! Mock Notifier Implementation
//!
//! Logs messages instead of sending them. With console output enabled the
//! full message, code included, is printed for local development.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use pimx_core::domain::entities::Purpose;
use pimx_core::services::{AccountNotice, Notifier};
use pimx_shared::config::NotifierConfig;
use pimx_shared::utils::email::{is_valid_email, mask_email};

use super::message::{compose_code_message, compose_notice_message, EmailMessage};

/// Mock notifier for development and testing
#[derive(Clone)]
pub struct MockNotifier {
    config: NotifierConfig,
    /// Number of messages accepted so far
    message_count: Arc<AtomicU64>,
    /// Whether to simulate failures (for testing)
    simulate_failure: Arc<AtomicBool>,
    /// Whether to print messages to console
    console_output: bool,
}

impl MockNotifier {
    pub fn new(config: NotifierConfig) -> Self {
        Self::with_options(config, true, false)
    }

    pub fn with_options(config: NotifierConfig, console_output: bool, simulate_failure: bool) -> Self {
        Self {
            config,
            message_count: Arc::new(AtomicU64::new(0)),
            simulate_failure: Arc::new(AtomicBool::new(simulate_failure)),
            console_output,
        }
    }

    /// Total number of messages accepted
    pub fn message_count(&self) -> u64 {
        self.message_count.load(Ordering::SeqCst)
    }

    pub fn set_simulate_failure(&self, simulate: bool) {
        self.simulate_failure.store(simulate, Ordering::SeqCst);
    }

    fn deliver(&self, message: EmailMessage, kind: &str) -> Result<String, String> {
        let masked = mask_email(&message.to);

        if !is_valid_email(&message.to) {
            return Err(format!("Invalid destination address: {}", masked));
        }

        if self.simulate_failure.load(Ordering::SeqCst) {
            warn!(
                target: "notifier",
                provider = "mock",
                to = %masked,
                "Mock notifier simulating failure"
            );
            return Err("Simulated delivery failure".to_string());
        }

        let message_id = format!("mock_{}", Uuid::new_v4());
        let count = self.message_count.fetch_add(1, Ordering::SeqCst) + 1;

        if self.console_output {
            println!("\n{}", "=".repeat(60));
            println!("MOCK NOTIFIER - MESSAGE #{}", count);
            println!("{}", "=".repeat(60));
            println!("From: {}", message.from);
            println!("To: {}", message.to);
            println!("Subject: {}", message.subject);
            println!("{}", message.body);
            println!("{}\n", "=".repeat(60));
        }

        info!(
            target: "notifier",
            provider = "mock",
            kind,
            to = %masked,
            message_id = %message_id,
            "Message sent (mock)"
        );

        Ok(message_id)
    }
}

impl Default for MockNotifier {
    fn default() -> Self {
        Self::new(NotifierConfig::default())
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn send_code(
        &self,
        destination: &str,
        code: &str,
        purpose: Purpose,
    ) -> Result<String, String> {
        let message = compose_code_message(&self.config, destination, code, purpose);
        self.deliver(message, purpose.as_str())
    }

    async fn send_notice(
        &self,
        destination: &str,
        notice: &AccountNotice,
    ) -> Result<String, String> {
        let message = compose_notice_message(&self.config, destination, notice);
        self.deliver(message, "notice")
    }
}
