//! In-memory account repository

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::{Account, AccountUpdate};
use crate::errors::{AccountError, DomainError};

use super::trait_::AccountRepository;

/// Account repository backed by a map behind a lock
#[derive(Clone, Default)]
pub struct InMemoryAccountRepository {
    accounts: Arc<RwLock<HashMap<Uuid, Account>>>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn count(&self) -> usize {
        self.accounts.read().await.len()
    }
}

fn same(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, DomainError> {
        Ok(self.accounts.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, DomainError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.values().find(|a| same(&a.email, email)).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, DomainError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.values().find(|a| same(&a.username, username)).cloned())
    }

    async fn create(&self, account: Account) -> Result<Account, DomainError> {
        let mut accounts = self.accounts.write().await;

        if accounts.values().any(|a| same(&a.email, &account.email)) {
            return Err(AccountError::EmailTaken.into());
        }
        if accounts.values().any(|a| same(&a.username, &account.username)) {
            return Err(AccountError::UsernameTaken.into());
        }

        accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn update(&self, account: Account) -> Result<Account, DomainError> {
        let mut accounts = self.accounts.write().await;

        if !accounts.contains_key(&account.id) {
            return Err(AccountError::AccountNotFound.into());
        }
        if accounts
            .values()
            .any(|a| a.id != account.id && same(&a.email, &account.email))
        {
            return Err(AccountError::EmailTaken.into());
        }

        accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn apply(&self, id: Uuid, update: AccountUpdate) -> Result<Account, DomainError> {
        let mut accounts = self.accounts.write().await;

        let mut account = accounts
            .get(&id)
            .cloned()
            .ok_or(AccountError::AccountNotFound)?;
        account.apply(&update)?;

        if accounts
            .values()
            .any(|a| a.id != id && same(&a.email, &account.email))
        {
            return Err(AccountError::EmailTaken.into());
        }

        accounts.insert(id, account.clone());
        Ok(account)
    }
}
