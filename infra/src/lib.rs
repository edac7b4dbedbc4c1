//! # Infrastructure Layer
//!
//! Concrete implementations of the storage and delivery traits defined in
//! `pimx_core`.
//!
//! ## Architecture
//!
//! The infrastructure layer contains:
//! - **Cache**: Redis client plus Redis-backed challenge, pending
//!   registration and account stores
//! - **Notify**: code and notice delivery; the mock notifier logs messages
//!   instead of sending them
//!
//! ## Features
//!
//! - `redis-cache`: Enable Redis support (default)

use pimx_core::errors::DomainError;

/// Cache module - Redis client and Redis-backed stores
pub mod cache;

/// Notification module - code and notice delivery
pub mod notify;

/// Configuration module for infrastructure services
pub mod config {
    //! Configuration management for infrastructure services

    use serde::{Deserialize, Serialize};

    pub use pimx_shared::config::{CacheConfig, NotifierConfig};

    /// Infrastructure configuration settings
    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    pub struct InfrastructureConfig {
        /// Redis cache configuration
        pub cache: CacheConfig,
        /// Delivery configuration
        pub notifier: NotifierConfig,
    }

    impl InfrastructureConfig {
        /// Load from environment, reading `.env` first if present
        pub fn from_env() -> Self {
            dotenvy::dotenv().ok();
            Self {
                cache: CacheConfig::from_env(),
                notifier: NotifierConfig::from_env(),
            }
        }
    }
}

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Redis cache error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// Stored payload could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Stored data does not have the expected shape
    #[error("Corrupt record at {key}: {reason}")]
    CorruptRecord { key: String, reason: String },
}

impl From<InfrastructureError> for DomainError {
    fn from(err: InfrastructureError) -> Self {
        DomainError::Internal {
            message: err.to_string(),
        }
    }
}
