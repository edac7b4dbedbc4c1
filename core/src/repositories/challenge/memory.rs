//! In-memory challenge store

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::{ChallengeKey, ChallengeRecord};
use crate::errors::DomainError;

use super::trait_::ChallengeStore;

/// Challenge store backed by a map behind a lock
///
/// Suitable for development and tests; state is lost on restart.
#[derive(Clone, Default)]
pub struct InMemoryChallengeStore {
    records: Arc<RwLock<HashMap<ChallengeKey, ChallengeRecord>>>,
}

impl InMemoryChallengeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of slots currently tracked
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }
}

#[async_trait]
impl ChallengeStore for InMemoryChallengeStore {
    async fn load(&self, key: &ChallengeKey) -> Result<Option<ChallengeRecord>, DomainError> {
        Ok(self.records.read().await.get(key).cloned())
    }

    async fn store_issued(
        &self,
        key: &ChallengeKey,
        code: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        self.records
            .write()
            .await
            .insert(*key, ChallengeRecord::issued(code, issued_at));
        Ok(())
    }

    async fn consume(&self, key: &ChallengeKey, expected: &str) -> Result<bool, DomainError> {
        let mut records = self.records.write().await;
        match records.get_mut(key) {
            Some(record) if record.code.as_deref() == Some(expected) => {
                record.consume();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn record_failure(&self, key: &ChallengeKey) -> Result<u32, DomainError> {
        let mut records = self.records.write().await;
        let record = records.entry(*key).or_default();
        record.failed_attempts += 1;
        Ok(record.failed_attempts)
    }

    async fn invalidate(&self, key: &ChallengeKey) -> Result<(), DomainError> {
        if let Some(record) = self.records.write().await.get_mut(key) {
            record.code = None;
        }
        Ok(())
    }

    async fn remove(&self, key: &ChallengeKey) -> Result<(), DomainError> {
        self.records.write().await.remove(key);
        Ok(())
    }
}
