//! Redis-backed challenge store
//!
//! Each slot is a hash at `challenge:{principal}:{purpose}` with the fields
//! `code`, `issued_at`, `last_issued_at` (unix milliseconds) and
//! `failed_attempts`. Consumption runs as a Lua script so that a code can
//! be taken by at most one caller.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use redis::Script;
use std::collections::HashMap;
use tracing::{debug, info};

use pimx_core::domain::entities::{ChallengeKey, ChallengeRecord};
use pimx_core::errors::DomainError;
use pimx_core::repositories::ChallengeStore;

use crate::cache::RedisClient;
use crate::InfrastructureError;

/// Slots outlive their code so the resend cooldown survives consumption
const DEFAULT_RETENTION_SECONDS: u64 = 24 * 60 * 60;

const FIELD_CODE: &str = "code";
const FIELD_ISSUED_AT: &str = "issued_at";
const FIELD_LAST_ISSUED_AT: &str = "last_issued_at";
const FIELD_FAILED_ATTEMPTS: &str = "failed_attempts";

static CONSUME_SCRIPT: Lazy<Script> = Lazy::new(|| {
    Script::new(
        r"
        local current = redis.call('HGET', KEYS[1], 'code')
        if current and current == ARGV[1] then
            redis.call('HDEL', KEYS[1], 'code')
            redis.call('HSET', KEYS[1], 'failed_attempts', 0)
            return 1
        end
        return 0
        ",
    )
});

/// Challenge slots stored as Redis hashes
#[derive(Clone)]
pub struct RedisChallengeStore {
    client: RedisClient,
    retention_seconds: u64,
}

impl RedisChallengeStore {
    pub fn new(client: RedisClient) -> Self {
        Self {
            client,
            retention_seconds: DEFAULT_RETENTION_SECONDS,
        }
    }

    /// Override how long an idle slot is kept
    pub fn with_retention(mut self, seconds: u64) -> Self {
        self.retention_seconds = seconds;
        self
    }

    fn redis_key(&self, key: &ChallengeKey) -> String {
        self.client.key(&challenge_key(key))
    }
}

/// Unprefixed key of a challenge slot
pub(crate) fn challenge_key(key: &ChallengeKey) -> String {
    format!("challenge:{}", key)
}

/// Decode a slot hash; an empty hash means the slot does not exist
pub(crate) fn decode_record(
    key: &str,
    fields: &HashMap<String, String>,
) -> Result<Option<ChallengeRecord>, InfrastructureError> {
    if fields.is_empty() {
        return Ok(None);
    }

    let failed_attempts = match fields.get(FIELD_FAILED_ATTEMPTS) {
        Some(raw) => raw.parse().map_err(|_| InfrastructureError::CorruptRecord {
            key: key.to_string(),
            reason: format!("failed_attempts is not a number: {}", raw),
        })?,
        None => 0,
    };

    Ok(Some(ChallengeRecord {
        code: fields.get(FIELD_CODE).filter(|c| !c.is_empty()).cloned(),
        issued_at: decode_timestamp(key, fields.get(FIELD_ISSUED_AT))?,
        last_issued_at: decode_timestamp(key, fields.get(FIELD_LAST_ISSUED_AT))?,
        failed_attempts,
    }))
}

fn decode_timestamp(
    key: &str,
    raw: Option<&String>,
) -> Result<Option<DateTime<Utc>>, InfrastructureError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let corrupt = || InfrastructureError::CorruptRecord {
        key: key.to_string(),
        reason: format!("invalid timestamp: {}", raw),
    };
    let millis: i64 = raw.parse().map_err(|_| corrupt())?;
    Utc.timestamp_millis_opt(millis).single().map(Some).ok_or_else(corrupt)
}

#[async_trait]
impl ChallengeStore for RedisChallengeStore {
    async fn load(&self, key: &ChallengeKey) -> Result<Option<ChallengeRecord>, DomainError> {
        let redis_key = self.redis_key(key);
        let fields = self.client.hash_get_all(&redis_key).await?;
        Ok(decode_record(&redis_key, &fields)?)
    }

    async fn store_issued(
        &self,
        key: &ChallengeKey,
        code: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        let redis_key = self.redis_key(key);
        let millis = issued_at.timestamp_millis();

        let mut pipeline = redis::pipe();
        pipeline
            .atomic()
            .del(&redis_key)
            .ignore()
            .hset_multiple(
                &redis_key,
                &[
                    (FIELD_CODE, code.to_string()),
                    (FIELD_ISSUED_AT, millis.to_string()),
                    (FIELD_LAST_ISSUED_AT, millis.to_string()),
                    (FIELD_FAILED_ATTEMPTS, "0".to_string()),
                ],
            )
            .ignore()
            .expire(&redis_key, self.retention_seconds as i64)
            .ignore();

        self.client.run_pipeline(&pipeline).await?;
        debug!(event = "challenge_stored", key = %key, "Stored verification code");
        Ok(())
    }

    async fn consume(&self, key: &ChallengeKey, expected: &str) -> Result<bool, DomainError> {
        let redis_key = self.redis_key(key);
        let taken: i64 = self
            .client
            .eval_script(&CONSUME_SCRIPT, &[redis_key], &[expected.to_string()])
            .await?;

        if taken == 1 {
            info!(event = "challenge_consumed", key = %key, "Verification code consumed");
        }
        Ok(taken == 1)
    }

    async fn record_failure(&self, key: &ChallengeKey) -> Result<u32, DomainError> {
        let redis_key = self.redis_key(key);
        let total = self
            .client
            .hash_increment(&redis_key, FIELD_FAILED_ATTEMPTS, 1)
            .await?;
        Ok(u32::try_from(total).unwrap_or(u32::MAX))
    }

    async fn invalidate(&self, key: &ChallengeKey) -> Result<(), DomainError> {
        let redis_key = self.redis_key(key);
        self.client.hash_delete_field(&redis_key, FIELD_CODE).await?;
        Ok(())
    }

    async fn remove(&self, key: &ChallengeKey) -> Result<(), DomainError> {
        let redis_key = self.redis_key(key);
        self.client.delete(&redis_key).await?;
        Ok(())
    }
}
