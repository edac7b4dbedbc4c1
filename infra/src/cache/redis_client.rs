//! Redis cache client implementation
//!
//! A multiplexed async connection with retry and exponential backoff,
//! exposing the handful of commands the Redis-backed stores need: plain
//! string values with expiry, hashes, atomic pipelines and Lua scripts.

use redis::{
    aio::MultiplexedConnection, AsyncCommands, Client, FromRedisValue, Pipeline, RedisError,
    RedisResult, Script,
};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::config::CacheConfig;
use crate::InfrastructureError;

type RedisFuture<T> = Pin<Box<dyn Future<Output = RedisResult<T>> + Send>>;

/// Redis cache client with retry logic
///
/// Cloning is cheap; clones share the underlying multiplexed connection.
#[derive(Clone)]
pub struct RedisClient {
    /// Redis multiplexed connection for async operations
    connection: MultiplexedConnection,
    /// Configuration used to create this client
    config: CacheConfig,
}

impl RedisClient {
    /// Connect using the retry settings from `config`
    ///
    /// # Example
    /// ```no_run
    /// use pimx_infra::cache::RedisClient;
    /// use pimx_infra::config::CacheConfig;
    ///
    /// async fn connect() -> Result<RedisClient, Box<dyn std::error::Error>> {
    ///     let client = RedisClient::new(CacheConfig::new("redis://localhost:6379")).await?;
    ///     Ok(client)
    /// }
    /// ```
    pub async fn new(config: CacheConfig) -> Result<Self, InfrastructureError> {
        info!("Creating Redis client with URL: {}", mask_url(&config.url));

        let client = Client::open(config.url.as_str()).map_err(|e| {
            error!("Failed to parse Redis URL: {}", e);
            InfrastructureError::Config(format!("Invalid Redis URL: {}", e))
        })?;

        let connection =
            Self::create_connection_with_retry(client, config.max_retries, config.retry_delay_ms)
                .await?;

        info!("Redis client created successfully");
        Ok(Self { connection, config })
    }

    /// Create multiplexed connection with retry logic
    async fn create_connection_with_retry(
        client: Client,
        max_retries: u32,
        retry_delay_ms: u64,
    ) -> Result<MultiplexedConnection, InfrastructureError> {
        let mut attempts = 0;
        let mut delay = retry_delay_ms;

        loop {
            attempts += 1;
            debug!("Attempting to connect to Redis (attempt {})", attempts);

            match client.get_multiplexed_async_connection().await {
                Ok(connection) => {
                    info!("Successfully connected to Redis");
                    return Ok(connection);
                }
                Err(e) if attempts < max_retries => {
                    warn!(
                        "Failed to connect to Redis (attempt {}/{}): {}. Retrying in {}ms...",
                        attempts, max_retries, e, delay
                    );
                    sleep(Duration::from_millis(delay)).await;
                    // Exponential backoff with cap at 5 seconds
                    delay = (delay * 2).min(5000);
                }
                Err(e) => {
                    error!("Failed to connect to Redis after {} attempts: {}", attempts, e);
                    return Err(InfrastructureError::Cache(e));
                }
            }
        }
    }

    /// Apply the configured prefix to a key
    pub fn key(&self, key: &str) -> String {
        self.config.make_key(key)
    }

    /// Set a string value with expiration time
    pub async fn set_with_expiry(
        &self,
        key: &str,
        value: &str,
        expiry_seconds: u64,
    ) -> Result<(), InfrastructureError> {
        debug!("Setting key '{}' with expiry {}s", key, expiry_seconds);

        self.execute_with_retry(|mut conn| {
            let key = key.to_string();
            let value = value.to_string();
            Box::pin(async move { conn.set_ex::<_, _, ()>(key, value, expiry_seconds).await })
        })
        .await
        .map_err(|e| {
            error!("Failed to set key '{}': {}", key, e);
            InfrastructureError::Cache(e)
        })
    }

    /// Get a string value
    pub async fn get(&self, key: &str) -> Result<Option<String>, InfrastructureError> {
        debug!("Getting key '{}'", key);

        self.execute_with_retry(|mut conn| {
            let key = key.to_string();
            Box::pin(async move { conn.get::<_, Option<String>>(key).await })
        })
        .await
        .map_err(|e| {
            error!("Failed to get key '{}': {}", key, e);
            InfrastructureError::Cache(e)
        })
    }

    /// Delete a key, returning whether it existed
    pub async fn delete(&self, key: &str) -> Result<bool, InfrastructureError> {
        debug!("Deleting key '{}'", key);

        self.execute_with_retry(|mut conn| {
            let key = key.to_string();
            Box::pin(async move { conn.del::<_, u32>(key).await })
        })
        .await
        .map(|deleted| deleted > 0)
        .map_err(|e| {
            error!("Failed to delete key '{}': {}", key, e);
            InfrastructureError::Cache(e)
        })
    }

    /// Read every field of a hash; empty when the key is missing
    pub async fn hash_get_all(
        &self,
        key: &str,
    ) -> Result<HashMap<String, String>, InfrastructureError> {
        self.execute_with_retry(|mut conn| {
            let key = key.to_string();
            Box::pin(async move { conn.hgetall::<_, HashMap<String, String>>(key).await })
        })
        .await
        .map_err(|e| {
            error!("Failed to read hash '{}': {}", key, e);
            InfrastructureError::Cache(e)
        })
    }

    /// Remove one field of a hash
    pub async fn hash_delete_field(&self, key: &str, field: &str) -> Result<(), InfrastructureError> {
        self.execute_with_retry(|mut conn| {
            let key = key.to_string();
            let field = field.to_string();
            Box::pin(async move { conn.hdel::<_, _, ()>(key, field).await })
        })
        .await
        .map_err(|e| {
            error!("Failed to delete field '{}' of '{}': {}", field, key, e);
            InfrastructureError::Cache(e)
        })
    }

    /// Increment an integer hash field, returning the new value
    pub async fn hash_increment(
        &self,
        key: &str,
        field: &str,
        delta: i64,
    ) -> Result<i64, InfrastructureError> {
        self.execute_with_retry(|mut conn| {
            let key = key.to_string();
            let field = field.to_string();
            Box::pin(async move { conn.hincr::<_, _, _, i64>(key, field, delta).await })
        })
        .await
        .map_err(|e| {
            error!("Failed to increment field '{}' of '{}': {}", field, key, e);
            InfrastructureError::Cache(e)
        })
    }

    /// Run a prepared pipeline (typically `atomic()`)
    pub async fn run_pipeline(&self, pipeline: &Pipeline) -> Result<(), InfrastructureError> {
        self.execute_with_retry(|mut conn| {
            let pipeline = pipeline.clone();
            Box::pin(async move { pipeline.query_async::<_, ()>(&mut conn).await })
        })
        .await
        .map_err(|e| {
            error!("Redis pipeline failed: {}", e);
            InfrastructureError::Cache(e)
        })
    }

    /// Evaluate a Lua script atomically
    pub async fn eval_script<T>(
        &self,
        script: &Script,
        keys: &[String],
        args: &[String],
    ) -> Result<T, InfrastructureError>
    where
        T: FromRedisValue + Send + 'static,
    {
        self.execute_with_retry(|mut conn| {
            let script = script.clone();
            let keys = keys.to_vec();
            let args = args.to_vec();
            Box::pin(async move {
                let mut invocation = script.prepare_invoke();
                for key in &keys {
                    invocation.key(key);
                }
                for arg in &args {
                    invocation.arg(arg);
                }
                invocation.invoke_async::<_, T>(&mut conn).await
            })
        })
        .await
        .map_err(|e| {
            error!("Redis script failed on {:?}: {}", keys, e);
            InfrastructureError::Cache(e)
        })
    }

    /// Execute a Redis operation with automatic retry logic
    async fn execute_with_retry<F, T>(&self, operation: F) -> RedisResult<T>
    where
        F: Fn(MultiplexedConnection) -> RedisFuture<T>,
    {
        let mut attempts = 0;
        let mut delay = self.config.retry_delay_ms;

        loop {
            attempts += 1;
            let conn = self.connection.clone();

            match operation(conn).await {
                Ok(result) => return Ok(result),
                Err(e) if attempts < self.config.max_retries && is_retriable_error(&e) => {
                    warn!(
                        "Redis operation failed (attempt {}/{}): {}. Retrying in {}ms...",
                        attempts, self.config.max_retries, e, delay
                    );
                    sleep(Duration::from_millis(delay)).await;
                    delay = (delay * 2).min(5000);
                }
                Err(e) => {
                    error!("Redis operation failed after {} attempts: {}", attempts, e);
                    return Err(e);
                }
            }
        }
    }

    /// Check if the Redis connection is healthy
    pub async fn health_check(&self) -> Result<bool, InfrastructureError> {
        let result = self
            .execute_with_retry(|mut conn| {
                Box::pin(async move { redis::cmd("PING").query_async::<_, String>(&mut conn).await })
            })
            .await;

        match result {
            Ok(response) if response == "PONG" => Ok(true),
            Ok(response) => {
                warn!("Redis health check returned unexpected response: {}", response);
                Ok(false)
            }
            Err(e) => {
                error!("Redis health check failed: {}", e);
                Err(InfrastructureError::Cache(e))
            }
        }
    }
}

/// Check if a Redis error is transient and worth retrying
pub(crate) fn is_retriable_error(error: &RedisError) -> bool {
    matches!(
        error.kind(),
        redis::ErrorKind::IoError
            | redis::ErrorKind::ClientError
            | redis::ErrorKind::BusyLoadingError
            | redis::ErrorKind::TryAgain
    )
}

/// Mask credentials in a Redis URL for logging
pub(crate) fn mask_url(url: &str) -> String {
    if let Some(at_pos) = url.find('@') {
        if let Some(proto_end) = url.find("://") {
            let proto = &url[..proto_end + 3];
            let host_part = &url[at_pos..];
            return format!("{}****{}", proto, host_part);
        }
    }
    url.to_string()
}
