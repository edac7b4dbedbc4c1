//! Tests for the Redis-backed stores
//!
//! Encoding tests run everywhere; the `#[ignore]` tests need a Redis
//! server at `REDIS_URL`.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use uuid::Uuid;

use pimx_core::domain::entities::{
    Account, AccountUpdate, ChallengeKey, PendingRegistration, Purpose,
};
use pimx_core::errors::{AccountError, DomainError};
use pimx_core::repositories::{AccountRepository, ChallengeStore, PendingRegistrationStore};
use pimx_shared::config::CacheConfig;

use crate::cache::account_store::{account_key, email_index_key, username_index_key};
use crate::cache::challenge_store::{challenge_key, decode_record};
use crate::cache::pending_registration_store::{registration_key, ttl_seconds};
use crate::cache::{
    RedisAccountRepository, RedisChallengeStore, RedisClient, RedisPendingRegistrationStore,
};
use crate::InfrastructureError;

fn fields(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn pending(email: &str, username: &str) -> PendingRegistration {
    PendingRegistration::new(
        email.to_string(),
        username.to_string(),
        None,
        "$2b$04$hash".to_string(),
        Utc::now(),
    )
}

async fn live_client() -> RedisClient {
    let config = CacheConfig::new(
        std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string()),
    )
    .with_prefix(format!("pimx-test-{}", Uuid::new_v4()));
    RedisClient::new(config).await.unwrap()
}

#[test]
fn test_key_formats() {
    let id = Uuid::nil();
    assert_eq!(
        challenge_key(&ChallengeKey::account(id, Purpose::EmailChange)),
        "challenge:account:00000000-0000-0000-0000-000000000000:email_change"
    );
    assert_eq!(
        registration_key(id),
        "registration:00000000-0000-0000-0000-000000000000"
    );
    assert_eq!(account_key(id), "account:00000000-0000-0000-0000-000000000000");
    assert_eq!(email_index_key("Sara@Example.com"), "account:email:sara@example.com");
    assert_eq!(username_index_key("Sara"), "account:username:sara");
}

#[test]
fn test_decode_empty_hash_is_missing_slot() {
    let record = decode_record("k", &HashMap::new()).unwrap();
    assert!(record.is_none());
}

#[test]
fn test_decode_full_record() {
    let issued = Utc.with_ymd_and_hms(2026, 3, 20, 9, 30, 0).unwrap();
    let millis = issued.timestamp_millis().to_string();
    let record = decode_record(
        "k",
        &fields(&[
            ("code", "004213"),
            ("issued_at", &millis),
            ("last_issued_at", &millis),
            ("failed_attempts", "2"),
        ]),
    )
    .unwrap()
    .unwrap();

    assert_eq!(record.code.as_deref(), Some("004213"));
    assert_eq!(record.issued_at, Some(issued));
    assert_eq!(record.last_issued_at, Some(issued));
    assert_eq!(record.failed_attempts, 2);
}

#[test]
fn test_decode_consumed_record_keeps_timestamps() {
    let record = decode_record(
        "k",
        &fields(&[("last_issued_at", "1700000000000"), ("failed_attempts", "0")]),
    )
    .unwrap()
    .unwrap();

    assert!(!record.has_code());
    assert!(record.issued_at.is_none());
    assert!(record.last_issued_at.is_some());
}

#[test]
fn test_decode_rejects_garbage() {
    let result = decode_record("k", &fields(&[("issued_at", "yesterday")]));
    assert!(matches!(result, Err(InfrastructureError::CorruptRecord { .. })));

    let result = decode_record("k", &fields(&[("failed_attempts", "many")]));
    assert!(matches!(result, Err(InfrastructureError::CorruptRecord { .. })));
}

#[test]
fn test_ttl_seconds_floor() {
    assert_eq!(ttl_seconds(Duration::minutes(30)), 1800);
    assert_eq!(ttl_seconds(Duration::zero()), 1);
    assert_eq!(ttl_seconds(Duration::seconds(-5)), 1);
}

#[tokio::test]
#[ignore] // Requires actual Redis server
async fn test_challenge_store_lifecycle() {
    let store = RedisChallengeStore::new(live_client().await);
    let key = ChallengeKey::account(Uuid::new_v4(), Purpose::LoginTwoFactor);
    let now = Utc::now();

    assert!(store.load(&key).await.unwrap().is_none());

    store.store_issued(&key, "123456", now).await.unwrap();
    assert_eq!(store.record_failure(&key).await.unwrap(), 1);

    assert!(!store.consume(&key, "000000").await.unwrap());
    assert!(store.consume(&key, "123456").await.unwrap());
    assert!(!store.consume(&key, "123456").await.unwrap());

    let record = store.load(&key).await.unwrap().unwrap();
    assert!(!record.has_code());
    assert_eq!(record.failed_attempts, 0);
    assert_eq!(
        record.last_issued_at.map(|t| t.timestamp_millis()),
        Some(now.timestamp_millis())
    );

    store.remove(&key).await.unwrap();
    assert!(store.load(&key).await.unwrap().is_none());
}

#[tokio::test]
#[ignore] // Requires actual Redis server
async fn test_challenge_store_concurrent_consume_single_winner() {
    let store = Arc::new(RedisChallengeStore::new(live_client().await));
    let key = ChallengeKey::registration(Uuid::new_v4());
    store.store_issued(&key, "654321", Utc::now()).await.unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let store = store.clone();
            tokio::spawn(async move { store.consume(&key, "654321").await.unwrap() })
        })
        .collect();

    let mut winners = 0;
    for handle in handles {
        if handle.await.unwrap() {
            winners += 1;
        }
    }
    assert_eq!(winners, 1);
}

#[tokio::test]
#[ignore] // Requires actual Redis server
async fn test_pending_registration_store_round_trip() {
    let store = RedisPendingRegistrationStore::new(live_client().await);
    let record = pending("sara@example.com", "sara");

    store.put(&record, Duration::minutes(30)).await.unwrap();
    assert_eq!(store.get(record.token).await.unwrap(), Some(record.clone()));

    store.remove(record.token).await.unwrap();
    assert!(store.get(record.token).await.unwrap().is_none());
    store.remove(record.token).await.unwrap();
}

#[tokio::test]
#[ignore] // Requires actual Redis server
async fn test_account_repository_uniqueness() {
    let repo = RedisAccountRepository::new(live_client().await);
    let sara = Account::from_registration(&pending("sara@example.com", "sara"), Utc::now());
    let reza = Account::from_registration(&pending("reza@example.com", "reza"), Utc::now());

    repo.create(sara.clone()).await.unwrap();
    repo.create(reza.clone()).await.unwrap();

    let found = repo.find_by_email("SARA@example.com").await.unwrap().unwrap();
    assert_eq!(found.id, sara.id);
    let found = repo.find_by_username("Reza").await.unwrap().unwrap();
    assert_eq!(found.id, reza.id);

    let clash = Account::from_registration(&pending("Sara@Example.com", "other"), Utc::now());
    assert!(matches!(
        repo.create(clash).await,
        Err(DomainError::Account(AccountError::EmailTaken))
    ));
    let clash = Account::from_registration(&pending("new@example.com", "SARA"), Utc::now());
    assert!(matches!(
        repo.create(clash).await,
        Err(DomainError::Account(AccountError::UsernameTaken))
    ));

    let mut moved = reza.clone();
    moved.email = "sara@example.com".to_string();
    assert!(matches!(
        repo.update(moved).await,
        Err(DomainError::Account(AccountError::EmailTaken))
    ));

    let mut moved = reza.clone();
    moved.email = "reza@new.example".to_string();
    repo.update(moved).await.unwrap();
    assert!(repo.find_by_email("reza@example.com").await.unwrap().is_none());
    assert_eq!(
        repo.find_by_email("reza@new.example").await.unwrap().map(|a| a.id),
        Some(reza.id)
    );

    let ghost = Account::from_registration(&pending("ghost@example.com", "ghost"), Utc::now());
    assert!(matches!(
        repo.update(ghost).await,
        Err(DomainError::Account(AccountError::AccountNotFound))
    ));
}

#[tokio::test]
#[ignore] // Requires actual Redis server
async fn test_account_repository_apply_field_changes() {
    let repo = Arc::new(RedisAccountRepository::new(live_client().await));
    let sara = Account::from_registration(&pending("sara@example.com", "sara"), Utc::now());
    repo.create(sara.clone()).await.unwrap();
    let id = sara.id;

    // Concurrent field changes all land; none is overwritten by a stale copy
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let repo = repo.clone();
            tokio::spawn(async move {
                repo.apply(
                    id,
                    AccountUpdate::RecordLogin {
                        at: Utc::now(),
                        two_factor: false,
                    },
                )
                .await
            })
        })
        .collect();
    repo.apply(sara.id, AccountUpdate::SetTwoFactor(true)).await.unwrap();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let stored = repo.find_by_id(sara.id).await.unwrap().unwrap();
    assert_eq!(stored.login_count, 4);
    assert!(stored.two_factor_enabled);

    repo.apply(
        sara.id,
        AccountUpdate::SetPendingEmail(Some("sara@new.example".to_string())),
    )
    .await
    .unwrap();
    let moved = repo
        .apply(
            sara.id,
            AccountUpdate::ApplyPendingEmail {
                expected: "sara@new.example".to_string(),
            },
        )
        .await
        .unwrap();
    assert_eq!(moved.email, "sara@new.example");
    assert!(repo.find_by_email("sara@example.com").await.unwrap().is_none());
    assert_eq!(
        repo.find_by_email("sara@new.example").await.unwrap().map(|a| a.id),
        Some(sara.id)
    );
}
