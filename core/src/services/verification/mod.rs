//! Verification code module
//!
//! This module provides the one-time code lifecycle shared by every flow:
//! - Code generation from an injected random source
//! - Expiry and countdown arithmetic against an injected clock
//! - Validation with compare-and-clear consumption
//! - Resend cooldown and optional attempt limiting

mod config;
mod expiry;
mod generator;
mod service;
mod traits;
mod types;

#[cfg(test)]
pub(crate) mod tests;

pub use config::VerificationServiceConfig;
pub use expiry::{can_resend, format_remaining, is_expired, remaining_seconds, validate};
pub use generator::OsRngCodeGenerator;
pub use service::VerificationCodeManager;
pub use traits::{CodeGenerator, Notifier};
pub use types::{AccountNotice, DeliveryStatus, IssuedCode};
