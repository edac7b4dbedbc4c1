//! Configuration module with business-specific sub-modules
//!
//! - `cache` - Redis connection and key layout
//! - `environment` - Environment detection and logging configuration
//! - `notifier` - Code delivery channel
//! - `server` - HTTP server settings
//! - `verification` - One-time code windows, cooldowns and limits

pub mod cache;
pub mod environment;
pub mod notifier;
pub mod server;
pub mod verification;

use serde::{Deserialize, Serialize};

pub use cache::CacheConfig;
pub use environment::{Environment, LoggingConfig};
pub use notifier::NotifierConfig;
pub use server::ServerConfig;
pub use verification::VerificationConfig;

/// Where durable and ephemeral records live
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process-local maps; state is lost on restart
    Memory,
    /// Redis
    Redis,
}

impl std::str::FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" | "in-memory" => Ok(StorageBackend::Memory),
            "redis" => Ok(StorageBackend::Redis),
            _ => Err(format!("Invalid storage backend: {}", s)),
        }
    }
}

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Server configuration
    pub server: ServerConfig,

    /// Storage backend selection
    pub storage: StorageBackend,

    /// Redis configuration (used when `storage` is `redis`)
    pub cache: CacheConfig,

    /// Verification code configuration
    #[serde(default)]
    pub verification: VerificationConfig,

    /// Delivery configuration
    #[serde(default)]
    pub notifier: NotifierConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            server: ServerConfig::default(),
            storage: StorageBackend::Memory,
            cache: CacheConfig::default(),
            verification: VerificationConfig::default(),
            notifier: NotifierConfig::default(),
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment
    ///
    /// Production defaults to Redis storage; other environments default to
    /// in-memory storage unless `STORAGE_BACKEND` says otherwise.
    pub fn from_env() -> Self {
        let environment = Environment::from_env();
        let storage = std::env::var("STORAGE_BACKEND")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(if environment.is_production() {
                StorageBackend::Redis
            } else {
                StorageBackend::Memory
            });

        Self {
            environment,
            server: ServerConfig::from_env(),
            storage,
            cache: CacheConfig::from_env(),
            verification: VerificationConfig::from_env(),
            notifier: NotifierConfig::from_env(),
            logging: LoggingConfig::from_env(environment),
        }
    }
}
