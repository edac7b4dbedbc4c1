//! Cache module for Redis-backed storage
//!
//! Provides the Redis client (multiplexed connection with retry logic) and
//! Redis implementations of the challenge, pending registration and
//! account stores.

pub mod account_store;
pub mod challenge_store;
pub mod pending_registration_store;
pub mod redis_client;

#[cfg(test)]
mod tests;

pub use account_store::RedisAccountRepository;
pub use challenge_store::RedisChallengeStore;
pub use pending_registration_store::RedisPendingRegistrationStore;
pub use redis_client::RedisClient;

// Re-export commonly used types
pub use pimx_shared::config::CacheConfig;
