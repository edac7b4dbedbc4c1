//! Account service module
//!
//! The four flows that gate an account change on an emailed code:
//! registration, login two-factor, password reset and email change,
//! plus the settings that steer them.

mod config;
mod service;
mod types;

#[cfg(test)]
mod tests;

pub use config::AccountServiceConfig;
pub use service::AccountService;
pub use types::{LoginOutcome, PasswordResetStarted, RegisterRequest, RegistrationStarted};
