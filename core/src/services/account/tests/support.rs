//! Shared fixture for account flow tests

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::domain::entities::{Account, AccountUpdate, ChallengeKey};
use crate::errors::DomainError;
use crate::repositories::{
    AccountRepository, ChallengeStore, InMemoryAccountRepository, InMemoryChallengeStore,
    InMemoryPendingRegistrationStore,
};
use crate::services::account::{AccountService, AccountServiceConfig, RegisterRequest};
use crate::services::clock::ManualClock;
use crate::services::verification::tests::mocks::MockNotifier;
use crate::services::verification::{VerificationCodeManager, VerificationServiceConfig};

pub const PASSWORD: &str = "s3cure-pass";

/// Account repository that lets a test commit a change from "another
/// request" right after the next lookup by id
pub struct InterleavingAccounts {
    inner: Arc<InMemoryAccountRepository>,
    after_lookup: Mutex<Option<AccountUpdate>>,
}

impl InterleavingAccounts {
    pub fn new(inner: Arc<InMemoryAccountRepository>) -> Self {
        Self {
            inner,
            after_lookup: Mutex::new(None),
        }
    }

    /// Apply `update` directly after the next `find_by_id`
    pub fn interleave(&self, update: AccountUpdate) {
        *self.after_lookup.lock().unwrap() = Some(update);
    }
}

#[async_trait]
impl AccountRepository for InterleavingAccounts {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, DomainError> {
        let found = self.inner.find_by_id(id).await?;
        let update = self.after_lookup.lock().unwrap().take();
        if let Some(update) = update {
            self.inner.apply(id, update).await?;
        }
        Ok(found)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, DomainError> {
        self.inner.find_by_email(email).await
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, DomainError> {
        self.inner.find_by_username(username).await
    }

    async fn create(&self, account: Account) -> Result<Account, DomainError> {
        self.inner.create(account).await
    }

    async fn update(&self, account: Account) -> Result<Account, DomainError> {
        self.inner.update(account).await
    }

    async fn apply(&self, id: Uuid, update: AccountUpdate) -> Result<Account, DomainError> {
        self.inner.apply(id, update).await
    }
}

pub struct Fixture {
    pub service: AccountService,
    pub accounts: Arc<InMemoryAccountRepository>,
    pub interleaving: Arc<InterleavingAccounts>,
    pub challenges: Arc<InMemoryChallengeStore>,
    pub notifier: Arc<MockNotifier>,
    pub clock: Arc<ManualClock>,
}

impl Fixture {
    pub fn new() -> Self {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2026, 3, 20, 9, 30, 0).unwrap(),
        ));
        let accounts = Arc::new(InMemoryAccountRepository::new());
        let interleaving = Arc::new(InterleavingAccounts::new(accounts.clone()));
        let challenges = Arc::new(InMemoryChallengeStore::new());
        let pending = Arc::new(InMemoryPendingRegistrationStore::with_clock(clock.clone()));
        let notifier = Arc::new(MockNotifier::new(false));

        let manager = VerificationCodeManager::new(
            challenges.clone(),
            notifier.clone(),
            VerificationServiceConfig::default(),
        )
        .with_clock(clock.clone());

        let config = AccountServiceConfig {
            password_hash_cost: 4,
            ..AccountServiceConfig::default()
        };
        let service = AccountService::new(
            interleaving.clone(),
            pending,
            Arc::new(manager),
            notifier.clone(),
            config,
        );

        Self {
            service,
            accounts,
            interleaving,
            challenges,
            notifier,
            clock,
        }
    }

    /// Code currently stored for a slot, regardless of delivery
    pub async fn stored_code(&self, key: &ChallengeKey) -> Option<String> {
        self.challenges
            .load(key)
            .await
            .unwrap()
            .and_then(|record| record.code)
    }

    /// Register and verify an account in one go
    pub async fn create_account(&self, email: &str, username: &str) -> Account {
        let started = self.service.register(request(email, username)).await.unwrap();
        let code = self.notifier.last_code_for(email).unwrap();
        self.service
            .verify_registration(started.token, &code)
            .await
            .unwrap()
    }

    pub fn unknown_id() -> Uuid {
        Uuid::new_v4()
    }
}

pub fn request(email: &str, username: &str) -> RegisterRequest {
    RegisterRequest {
        email: email.to_string(),
        username: username.to_string(),
        age: Some(25),
        password: PASSWORD.to_string(),
        password_confirmation: PASSWORD.to_string(),
    }
}
