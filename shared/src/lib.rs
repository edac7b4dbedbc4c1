//! Shared utilities and common types for the PIMXCHAT server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types
//! - Language selection for user-facing messages
//! - API response wrappers
//! - Validation helpers (email, one-time code format)

pub mod config;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, CacheConfig, Environment, LoggingConfig, NotifierConfig, ServerConfig,
    VerificationConfig,
};
pub use types::{ApiResponse, Language};
pub use utils::validation;
