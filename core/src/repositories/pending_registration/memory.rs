//! In-memory pending registration store

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::PendingRegistration;
use crate::errors::DomainError;
use crate::services::clock::{Clock, SystemClock};

use super::trait_::PendingRegistrationStore;

/// Pending registrations kept in a map with lazy expiry
pub struct InMemoryPendingRegistrationStore {
    records: RwLock<HashMap<Uuid, (PendingRegistration, DateTime<Utc>)>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryPendingRegistrationStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            clock,
        }
    }
}

impl Default for InMemoryPendingRegistrationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PendingRegistrationStore for InMemoryPendingRegistrationStore {
    async fn put(&self, record: &PendingRegistration, ttl: Duration) -> Result<(), DomainError> {
        let now = self.clock.now();
        let mut records = self.records.write().await;
        records.retain(|_, (_, expiry)| *expiry > now);
        records.insert(record.token, (record.clone(), now + ttl));
        Ok(())
    }

    async fn get(&self, token: Uuid) -> Result<Option<PendingRegistration>, DomainError> {
        let now = self.clock.now();
        let records = self.records.read().await;
        Ok(records
            .get(&token)
            .filter(|(_, expiry)| *expiry > now)
            .map(|(record, _)| record.clone()))
    }

    async fn remove(&self, token: Uuid) -> Result<(), DomainError> {
        self.records.write().await.remove(&token);
        Ok(())
    }
}
