//! Redis-backed account repository
//!
//! Accounts are JSON strings at `account:{id}`. Two index keys,
//! `account:email:{email}` and `account:username:{username}` (both
//! lowercased), map to the id and carry the uniqueness constraints. Writes
//! run as Lua scripts so the index check and the write are atomic.
//! Field-level changes are applied in Rust and written back with a
//! compare-and-swap on the stored payload, retried when another writer got
//! there first.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use redis::Script;
use tracing::{debug, info, warn};
use uuid::Uuid;

use pimx_core::domain::entities::{Account, AccountUpdate};
use pimx_core::errors::{AccountError, DomainError};
use pimx_core::repositories::AccountRepository;
use pimx_shared::utils::email::mask_email;

use crate::cache::RedisClient;
use crate::InfrastructureError;

// KEYS: record, email index, username index. ARGV: id, payload.
static CREATE_SCRIPT: Lazy<Script> = Lazy::new(|| {
    Script::new(
        r"
        if redis.call('EXISTS', KEYS[2]) == 1 then
            return 'email_taken'
        end
        if redis.call('EXISTS', KEYS[3]) == 1 then
            return 'username_taken'
        end
        redis.call('SET', KEYS[1], ARGV[2])
        redis.call('SET', KEYS[2], ARGV[1])
        redis.call('SET', KEYS[3], ARGV[1])
        return 'ok'
        ",
    )
});

// KEYS: record, new email index, old email index. ARGV: id, payload.
static UPDATE_SCRIPT: Lazy<Script> = Lazy::new(|| {
    Script::new(
        r"
        if redis.call('EXISTS', KEYS[1]) == 0 then
            return 'not_found'
        end
        local owner = redis.call('GET', KEYS[2])
        if owner and owner ~= ARGV[1] then
            return 'email_taken'
        end
        if KEYS[3] ~= KEYS[2] then
            redis.call('DEL', KEYS[3])
        end
        redis.call('SET', KEYS[2], ARGV[1])
        redis.call('SET', KEYS[1], ARGV[2])
        return 'ok'
        ",
    )
});

// KEYS: record, new email index, old email index. ARGV: id, payload, expected payload.
static APPLY_SCRIPT: Lazy<Script> = Lazy::new(|| {
    Script::new(
        r"
        local current = redis.call('GET', KEYS[1])
        if not current then
            return 'not_found'
        end
        if current ~= ARGV[3] then
            return 'conflict'
        end
        local owner = redis.call('GET', KEYS[2])
        if owner and owner ~= ARGV[1] then
            return 'email_taken'
        end
        if KEYS[3] ~= KEYS[2] then
            redis.call('DEL', KEYS[3])
        end
        redis.call('SET', KEYS[2], ARGV[1])
        redis.call('SET', KEYS[1], ARGV[2])
        return 'ok'
        ",
    )
});

const MAX_APPLY_ATTEMPTS: u32 = 5;

/// Accounts stored as JSON with lowercase lookup indexes
#[derive(Clone)]
pub struct RedisAccountRepository {
    client: RedisClient,
}

impl RedisAccountRepository {
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }

    async fn load_by_index(&self, index_key: &str) -> Result<Option<Account>, DomainError> {
        let Some(raw_id) = self.client.get(&self.client.key(index_key)).await? else {
            return Ok(None);
        };
        let id = Uuid::parse_str(&raw_id).map_err(|e| InfrastructureError::CorruptRecord {
            key: index_key.to_string(),
            reason: e.to_string(),
        })?;
        self.find_by_id(id).await
    }
}

pub(crate) fn account_key(id: Uuid) -> String {
    format!("account:{}", id)
}

pub(crate) fn email_index_key(email: &str) -> String {
    format!("account:email:{}", email.to_lowercase())
}

pub(crate) fn username_index_key(username: &str) -> String {
    format!("account:username:{}", username.to_lowercase())
}

fn script_outcome(outcome: &str) -> Result<(), DomainError> {
    match outcome {
        "ok" => Ok(()),
        "email_taken" => Err(AccountError::EmailTaken.into()),
        "username_taken" => Err(AccountError::UsernameTaken.into()),
        "not_found" => Err(AccountError::AccountNotFound.into()),
        other => Err(DomainError::Internal {
            message: format!("Unexpected account script result: {}", other),
        }),
    }
}

#[async_trait]
impl AccountRepository for RedisAccountRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, DomainError> {
        let key = self.client.key(&account_key(id));
        let Some(payload) = self.client.get(&key).await? else {
            return Ok(None);
        };
        let account = serde_json::from_str(&payload).map_err(InfrastructureError::from)?;
        Ok(Some(account))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, DomainError> {
        self.load_by_index(&email_index_key(email)).await
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, DomainError> {
        self.load_by_index(&username_index_key(username)).await
    }

    async fn create(&self, account: Account) -> Result<Account, DomainError> {
        let payload = serde_json::to_string(&account).map_err(InfrastructureError::from)?;
        let keys = [
            self.client.key(&account_key(account.id)),
            self.client.key(&email_index_key(&account.email)),
            self.client.key(&username_index_key(&account.username)),
        ];
        let outcome: String = self
            .client
            .eval_script(&CREATE_SCRIPT, &keys, &[account.id.to_string(), payload])
            .await?;
        script_outcome(&outcome)?;

        info!(
            event = "account_created",
            account_id = %account.id,
            email = %mask_email(&account.email),
            "Account stored"
        );
        Ok(account)
    }

    async fn update(&self, account: Account) -> Result<Account, DomainError> {
        let Some(stored) = self.find_by_id(account.id).await? else {
            return Err(AccountError::AccountNotFound.into());
        };

        let payload = serde_json::to_string(&account).map_err(InfrastructureError::from)?;
        let keys = [
            self.client.key(&account_key(account.id)),
            self.client.key(&email_index_key(&account.email)),
            self.client.key(&email_index_key(&stored.email)),
        ];
        let outcome: String = self
            .client
            .eval_script(&UPDATE_SCRIPT, &keys, &[account.id.to_string(), payload])
            .await?;

        if let Err(e) = script_outcome(&outcome) {
            warn!(event = "account_update_rejected", account_id = %account.id, reason = %outcome);
            return Err(e);
        }
        Ok(account)
    }

    async fn apply(&self, id: Uuid, update: AccountUpdate) -> Result<Account, DomainError> {
        let record_key = self.client.key(&account_key(id));

        for attempt in 1..=MAX_APPLY_ATTEMPTS {
            let Some(current) = self.client.get(&record_key).await? else {
                return Err(AccountError::AccountNotFound.into());
            };
            let mut account: Account =
                serde_json::from_str(&current).map_err(InfrastructureError::from)?;
            let old_email = account.email.clone();
            account.apply(&update)?;

            let payload = serde_json::to_string(&account).map_err(InfrastructureError::from)?;
            let keys = [
                record_key.clone(),
                self.client.key(&email_index_key(&account.email)),
                self.client.key(&email_index_key(&old_email)),
            ];
            let outcome: String = self
                .client
                .eval_script(&APPLY_SCRIPT, &keys, &[id.to_string(), payload, current])
                .await?;

            if outcome == "conflict" {
                debug!(event = "account_apply_conflict", account_id = %id, attempt = attempt);
                continue;
            }
            script_outcome(&outcome)?;
            return Ok(account);
        }

        warn!(event = "account_apply_exhausted", account_id = %id, "Account kept changing during update");
        Err(DomainError::Internal {
            message: format!(
                "Account {} changed concurrently {} times; update abandoned",
                id, MAX_APPLY_ATTEMPTS
            ),
        })
    }
}
