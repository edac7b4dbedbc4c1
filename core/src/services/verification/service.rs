//! Verification code manager
//!
//! Owns issuance, expiry, validation and resend throttling for every
//! purpose. Purpose-specific side effects stay with the callers.

use chrono::{DateTime, Utc};
use pimx_shared::utils::mask_email;
use std::sync::Arc;
use tracing;

use crate::domain::entities::{ChallengeKey, ChallengeRecord, VerificationChallenge};
use crate::domain::value_objects::ChallengeStatus;
use crate::errors::{DomainResult, VerificationError};
use crate::repositories::ChallengeStore;
use crate::services::clock::{Clock, SystemClock};

use super::config::VerificationServiceConfig;
use super::expiry::{can_resend, remaining_seconds, validate};
use super::generator::OsRngCodeGenerator;
use super::traits::{CodeGenerator, Notifier};
use super::types::{DeliveryStatus, IssuedCode};

/// Issues and checks one-time codes for any `(principal, purpose)` slot
pub struct VerificationCodeManager {
    /// Challenge persistence
    store: Arc<dyn ChallengeStore>,
    /// Delivery channel for codes
    notifier: Arc<dyn Notifier>,
    generator: Arc<dyn CodeGenerator>,
    clock: Arc<dyn Clock>,
    config: VerificationServiceConfig,
}

impl VerificationCodeManager {
    /// Create a manager using the OS random source and the system clock
    pub fn new(
        store: Arc<dyn ChallengeStore>,
        notifier: Arc<dyn Notifier>,
        config: VerificationServiceConfig,
    ) -> Self {
        Self {
            store,
            notifier,
            generator: Arc::new(OsRngCodeGenerator),
            clock: Arc::new(SystemClock),
            config,
        }
    }

    /// Replace the code generator
    pub fn with_generator(mut self, generator: Arc<dyn CodeGenerator>) -> Self {
        self.generator = generator;
        self
    }

    /// Replace the clock
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &VerificationServiceConfig {
        &self.config
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Issue a fresh code for `key` and deliver it to `destination`
    ///
    /// The new code replaces any previous one for the slot. It is stored
    /// before delivery is attempted, so a failed or timed out delivery
    /// leaves a usable code behind; the outcome is reported in
    /// [`IssuedCode::delivery`].
    pub async fn issue_code(&self, key: &ChallengeKey, destination: &str) -> DomainResult<IssuedCode> {
        let code = self.generator.generate();
        let issued_at = self.clock.now();

        self.store.store_issued(key, &code, issued_at).await.map_err(|e| {
            tracing::error!(
                challenge = %key,
                error = %e,
                event = "code_storage_failed",
                "Failed to store verification code"
            );
            e
        })?;

        tracing::info!(
            challenge = %key,
            destination = %mask_email(destination),
            event = "code_issued",
            "Issued verification code"
        );

        let delivery = self.deliver(key, destination, &code).await;

        Ok(IssuedCode {
            challenge: VerificationChallenge {
                key: *key,
                code,
                issued_at,
            },
            delivery,
        })
    }

    async fn deliver(&self, key: &ChallengeKey, destination: &str, code: &str) -> DeliveryStatus {
        let send = self.notifier.send_code(destination, code, key.purpose);
        match tokio::time::timeout(self.config.delivery_timeout(), send).await {
            Ok(Ok(message_id)) => {
                tracing::debug!(
                    challenge = %key,
                    message_id = %message_id,
                    event = "code_delivered",
                    "Verification code delivered"
                );
                DeliveryStatus::Sent { message_id }
            }
            Ok(Err(reason)) => {
                tracing::warn!(
                    challenge = %key,
                    destination = %mask_email(destination),
                    error = %reason,
                    event = "code_delivery_failed",
                    "Verification code delivery failed"
                );
                DeliveryStatus::Failed { reason }
            }
            Err(_) => {
                tracing::warn!(
                    challenge = %key,
                    destination = %mask_email(destination),
                    timeout_seconds = self.config.delivery_timeout_seconds,
                    event = "code_delivery_timeout",
                    "Verification code delivery timed out"
                );
                DeliveryStatus::Failed {
                    reason: format!(
                        "delivery timed out after {} seconds",
                        self.config.delivery_timeout_seconds
                    ),
                }
            }
        }
    }

    /// Issue a new code unless the slot is still in its resend cooldown
    ///
    /// Unlike [`issue_code`](Self::issue_code), a failed delivery is
    /// returned as [`VerificationError::DeliveryFailure`]; the new code is
    /// stored regardless.
    pub async fn resend_code(&self, key: &ChallengeKey, destination: &str) -> DomainResult<IssuedCode> {
        let record = self.store.load(key).await?;
        let last_issued_at = record.and_then(|r| r.last_issued_at);
        let (allowed, remaining) = can_resend(last_issued_at, self.config.cooldown(), self.clock.now());

        if !allowed {
            tracing::warn!(
                challenge = %key,
                cooldown_remaining = remaining,
                event = "resend_cooldown",
                "Verification code resend refused during cooldown"
            );
            return Err(VerificationError::Cooldown {
                remaining_seconds: remaining,
            }
            .into());
        }

        let issued = self.issue_code(key, destination).await?;
        match &issued.delivery {
            DeliveryStatus::Sent { .. } => Ok(issued),
            DeliveryStatus::Failed { reason } => Err(VerificationError::DeliveryFailure {
                reason: reason.clone(),
            }
            .into()),
        }
    }

    /// Check `input` against the slot and consume the code on success
    ///
    /// Consumption is a compare-and-clear in the store, so of two
    /// concurrent correct submissions only one succeeds; the other sees
    /// `Mismatch`. With attempt limiting enabled, the mismatch that reaches
    /// the limit invalidates the code and yields `TooManyAttempts`.
    pub async fn verify_and_consume(&self, key: &ChallengeKey, input: &str) -> DomainResult<()> {
        let record = self.store.load(key).await?.unwrap_or_default();
        let now = self.clock.now();

        match validate(
            input,
            record.code.as_deref(),
            record.issued_at,
            self.config.window(),
            now,
        ) {
            Ok(()) => {}
            Err(VerificationError::Mismatch) if record.has_code() => {
                return Err(self.on_mismatch(key).await?.into())
            }
            Err(e) => {
                tracing::info!(
                    challenge = %key,
                    reason = e.error_code(),
                    event = "code_rejected",
                    "Verification code rejected"
                );
                return Err(e.into());
            }
        }

        if !self.store.consume(key, input).await? {
            tracing::warn!(
                challenge = %key,
                event = "code_consume_lost",
                "Verification code was consumed or replaced concurrently"
            );
            return Err(VerificationError::Mismatch.into());
        }

        tracing::info!(challenge = %key, event = "code_verified", "Verification code accepted");
        Ok(())
    }

    async fn on_mismatch(&self, key: &ChallengeKey) -> DomainResult<VerificationError> {
        let Some(max_attempts) = self.config.max_failed_attempts else {
            tracing::info!(challenge = %key, event = "code_mismatch", "Verification code mismatch");
            return Ok(VerificationError::Mismatch);
        };

        let failures = self.store.record_failure(key).await?;
        if failures >= max_attempts {
            self.store.invalidate(key).await?;
            tracing::warn!(
                challenge = %key,
                failures = failures,
                event = "code_attempts_exhausted",
                "Verification code invalidated after too many mismatches"
            );
            return Ok(VerificationError::TooManyAttempts);
        }

        tracing::info!(
            challenge = %key,
            failures = failures,
            max_attempts = max_attempts,
            event = "code_mismatch",
            "Verification code mismatch"
        );
        Ok(VerificationError::Mismatch)
    }

    /// Countdown and resend state of a slot at the current time
    pub async fn status(&self, key: &ChallengeKey) -> DomainResult<ChallengeStatus> {
        let record = self.store.load(key).await?.unwrap_or_default();
        Ok(self.status_of(key, &record))
    }

    /// Build a status from an already loaded record
    pub fn status_of(&self, key: &ChallengeKey, record: &ChallengeRecord) -> ChallengeStatus {
        let now = self.clock.now();
        let remaining = if record.has_code() {
            remaining_seconds(record.issued_at, self.config.window(), now)
        } else {
            0
        };
        let (resend_allowed, resend_after_seconds) =
            can_resend(record.last_issued_at, self.config.cooldown(), now);

        ChallengeStatus {
            purpose: key.purpose,
            remaining_seconds: remaining,
            resend_allowed,
            resend_after_seconds,
            delivered: None,
        }
    }

    /// Status right after an issuance, carrying its delivery outcome
    pub fn status_after_issue(&self, issued: &IssuedCode) -> ChallengeStatus {
        let record = ChallengeRecord::issued(
            issued.challenge.code.clone(),
            issued.challenge.issued_at,
        );
        self.status_of(&issued.challenge.key, &record)
            .with_delivery(issued.delivery.is_sent())
    }

    /// Whether the slot holds a code that is still inside its window
    pub async fn has_active_code(&self, key: &ChallengeKey) -> DomainResult<bool> {
        let status = self.status(key).await?;
        Ok(status.remaining_seconds > 0)
    }

    /// Whether the slot still holds a code, expired or not
    pub async fn has_pending_code(&self, key: &ChallengeKey) -> DomainResult<bool> {
        let record = self.store.load(key).await?;
        Ok(record.map_or(false, |r| r.has_code()))
    }

    /// Drop the active code, keeping the cooldown state
    pub async fn invalidate(&self, key: &ChallengeKey) -> DomainResult<()> {
        self.store.invalidate(key).await
    }

    /// Forget the slot, including its cooldown state
    pub async fn remove(&self, key: &ChallengeKey) -> DomainResult<()> {
        self.store.remove(key).await
    }
}
