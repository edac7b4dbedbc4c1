//! Redis-backed pending registration store
//!
//! Records are JSON strings at `registration:{token}` and expire through
//! the key TTL.

use async_trait::async_trait;
use chrono::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

use pimx_core::domain::entities::PendingRegistration;
use pimx_core::errors::DomainError;
use pimx_core::repositories::PendingRegistrationStore;

use crate::cache::RedisClient;
use crate::InfrastructureError;

/// Pending registrations as expiring JSON values
#[derive(Clone)]
pub struct RedisPendingRegistrationStore {
    client: RedisClient,
}

impl RedisPendingRegistrationStore {
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }

    fn redis_key(&self, token: Uuid) -> String {
        self.client.key(&registration_key(token))
    }
}

pub(crate) fn registration_key(token: Uuid) -> String {
    format!("registration:{}", token)
}

/// Key TTL in whole seconds, at least one
pub(crate) fn ttl_seconds(ttl: Duration) -> u64 {
    u64::try_from(ttl.num_seconds()).unwrap_or(0).max(1)
}

#[async_trait]
impl PendingRegistrationStore for RedisPendingRegistrationStore {
    async fn put(&self, record: &PendingRegistration, ttl: Duration) -> Result<(), DomainError> {
        let payload = serde_json::to_string(record).map_err(InfrastructureError::from)?;
        self.client
            .set_with_expiry(&self.redis_key(record.token), &payload, ttl_seconds(ttl))
            .await?;
        debug!(event = "registration_stored", token = %record.token, "Pending registration stored");
        Ok(())
    }

    async fn get(&self, token: Uuid) -> Result<Option<PendingRegistration>, DomainError> {
        let key = self.redis_key(token);
        let Some(payload) = self.client.get(&key).await? else {
            return Ok(None);
        };

        match serde_json::from_str(&payload) {
            Ok(record) => Ok(Some(record)),
            Err(e) => {
                warn!(event = "registration_corrupt", token = %token, error = %e, "Dropping unreadable pending registration");
                self.client.delete(&key).await?;
                Ok(None)
            }
        }
    }

    async fn remove(&self, token: Uuid) -> Result<(), DomainError> {
        self.client.delete(&self.redis_key(token)).await?;
        Ok(())
    }
}
