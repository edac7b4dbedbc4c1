//! Unit tests for the in-memory pending registration store

use chrono::{Duration, Utc};
use std::sync::Arc;

use crate::domain::entities::PendingRegistration;
use crate::repositories::pending_registration::{
    InMemoryPendingRegistrationStore, PendingRegistrationStore,
};
use crate::services::clock::ManualClock;

fn record() -> PendingRegistration {
    PendingRegistration::new(
        "leila@example.com".to_string(),
        "leila".to_string(),
        Some(31),
        "hash".to_string(),
        Utc::now(),
    )
}

#[tokio::test]
async fn test_put_get_remove() {
    let store = InMemoryPendingRegistrationStore::new();
    let record = record();

    store.put(&record, Duration::minutes(30)).await.unwrap();
    assert_eq!(store.get(record.token).await.unwrap(), Some(record.clone()));

    store.remove(record.token).await.unwrap();
    assert!(store.get(record.token).await.unwrap().is_none());
    store.remove(record.token).await.unwrap();
}

#[tokio::test]
async fn test_records_expire_after_ttl() {
    let clock = Arc::new(ManualClock::default());
    let store = InMemoryPendingRegistrationStore::with_clock(clock.clone());
    let record = record();

    store.put(&record, Duration::minutes(30)).await.unwrap();

    clock.advance(Duration::minutes(29));
    assert!(store.get(record.token).await.unwrap().is_some());

    clock.advance(Duration::minutes(1));
    assert!(store.get(record.token).await.unwrap().is_none());
}
