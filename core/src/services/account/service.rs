//! Account flows built on the verification code manager
//!
//! The manager owns all code arithmetic; this service only decides which
//! slot a flow uses, where the code goes, and what a successful match
//! changes on the account.

use chrono::{DateTime, Utc};
use pimx_shared::utils::{is_valid_email, mask_email, normalize_email};
use pimx_shared::validation::{is_acceptable_password, is_valid_username};
use std::sync::Arc;
use tracing;
use uuid::Uuid;

use crate::domain::entities::{
    Account, AccountUpdate, ChallengeKey, PendingRegistration, PrincipalRef, Purpose, ResetGrant,
};
use crate::domain::value_objects::ChallengeStatus;
use crate::errors::{AccountError, DomainError, DomainResult, VerificationError};
use crate::repositories::{AccountRepository, PendingRegistrationStore};
use crate::services::verification::{AccountNotice, Notifier, VerificationCodeManager};

use super::config::AccountServiceConfig;
use super::types::{LoginOutcome, PasswordResetStarted, RegisterRequest, RegistrationStarted};

/// Registration, login 2FA, password reset and email change
pub struct AccountService {
    accounts: Arc<dyn AccountRepository>,
    pending: Arc<dyn PendingRegistrationStore>,
    verification: Arc<VerificationCodeManager>,
    /// Used for notices; codes go through the manager
    notifier: Arc<dyn Notifier>,
    config: AccountServiceConfig,
}

impl AccountService {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        pending: Arc<dyn PendingRegistrationStore>,
        verification: Arc<VerificationCodeManager>,
        notifier: Arc<dyn Notifier>,
        config: AccountServiceConfig,
    ) -> Self {
        Self {
            accounts,
            pending,
            verification,
            notifier,
            config,
        }
    }

    pub fn verification(&self) -> &VerificationCodeManager {
        &self.verification
    }

    // ---- Registration ----

    /// Validate a sign-up form, hold it as a pending registration and send
    /// a registration code to the email address
    pub async fn register(&self, request: RegisterRequest) -> DomainResult<RegistrationStarted> {
        let email = normalize_email(&request.email);
        if !is_valid_email(&email) {
            return Err(AccountError::InvalidEmail.into());
        }
        let username = request.username.trim().to_string();
        if !is_valid_username(&username) {
            return Err(AccountError::InvalidUsername.into());
        }
        check_new_password(&request.password, &request.password_confirmation)?;

        if self.accounts.find_by_email(&email).await?.is_some() {
            return Err(AccountError::EmailTaken.into());
        }
        if self.accounts.find_by_username(&username).await?.is_some() {
            return Err(AccountError::UsernameTaken.into());
        }

        let password_hash = self.hash_password(&request.password)?;
        let pending = PendingRegistration::new(
            email,
            username,
            request.age,
            password_hash,
            self.verification.now(),
        );
        self.pending
            .put(&pending, self.config.pending_registration_ttl())
            .await?;

        let issued = self
            .verification
            .issue_code(&ChallengeKey::registration(pending.token), &pending.email)
            .await?;

        tracing::info!(
            email = %mask_email(&pending.email),
            token = %pending.token,
            event = "registration_started",
            "Registration pending email verification"
        );

        Ok(RegistrationStarted {
            token: pending.token,
            status: self.verification.status_after_issue(&issued),
        })
    }

    /// Countdown for a pending registration
    ///
    /// When the code is missing or already expired a new one is issued on
    /// the spot, so viewing the verification step never shows a dead code.
    pub async fn registration_status(&self, token: Uuid) -> DomainResult<ChallengeStatus> {
        let pending = self.pending_registration(token).await?;
        let key = ChallengeKey::registration(token);

        let status = self.verification.status(&key).await?;
        if status.remaining_seconds > 0 {
            return Ok(status);
        }

        tracing::info!(
            token = %token,
            event = "registration_code_reissued",
            "Registration code missing or expired; issuing a new one"
        );
        let issued = self.verification.issue_code(&key, &pending.email).await?;
        Ok(self.verification.status_after_issue(&issued))
    }

    /// Confirm a registration code and create the account
    ///
    /// An expired code discards the pending registration; the user has to
    /// register again.
    pub async fn verify_registration(&self, token: Uuid, code: &str) -> DomainResult<Account> {
        let pending = self.pending_registration(token).await?;
        let key = ChallengeKey::registration(token);

        if let Err(e) = self.verification.verify_and_consume(&key, code).await {
            if matches!(e, DomainError::Verification(VerificationError::Expired)) {
                self.discard_registration(token).await?;
                tracing::info!(
                    token = %token,
                    event = "registration_expired",
                    "Registration code expired; pending registration discarded"
                );
            }
            return Err(e);
        }

        let account = Account::from_registration(&pending, self.verification.now());
        let account = self.accounts.create(account).await?;
        self.discard_registration(token).await?;

        tracing::info!(
            account_id = %account.id,
            email = %mask_email(&account.email),
            event = "registration_completed",
            "Account created from verified registration"
        );
        Ok(account)
    }

    /// Send a new registration code once the cooldown allows it
    pub async fn resend_registration_code(&self, token: Uuid) -> DomainResult<ChallengeStatus> {
        let pending = self.pending_registration(token).await?;
        let issued = self
            .verification
            .resend_code(&ChallengeKey::registration(token), &pending.email)
            .await?;
        Ok(self.verification.status_after_issue(&issued))
    }

    async fn pending_registration(&self, token: Uuid) -> DomainResult<PendingRegistration> {
        self.pending
            .get(token)
            .await?
            .ok_or_else(|| AccountError::RegistrationNotFound.into())
    }

    async fn discard_registration(&self, token: Uuid) -> DomainResult<()> {
        self.pending.remove(token).await?;
        self.verification
            .remove(&ChallengeKey::registration(token))
            .await
    }

    // ---- Login ----

    /// Check credentials, asking for a login code when 2FA is due
    pub async fn login(&self, email: &str, password: &str) -> DomainResult<LoginOutcome> {
        let email = normalize_email(email);
        let account = match self.accounts.find_by_email(&email).await? {
            Some(account) if account.verify_password(password) => account,
            _ => {
                tracing::warn!(
                    email = %mask_email(&email),
                    event = "login_failed",
                    "Login rejected: invalid credentials"
                );
                return Err(AccountError::InvalidCredentials.into());
            }
        };
        if !account.is_active {
            return Err(AccountError::AccountInactive.into());
        }

        let now = self.verification.now();
        if account.requires_login_code(now, self.config.two_factor_interval()) {
            let key = ChallengeKey::account(account.id, Purpose::LoginTwoFactor);
            let issued = self.verification.issue_code(&key, &account.email).await?;
            tracing::info!(
                account_id = %account.id,
                event = "login_code_required",
                "Login requires a verification code"
            );
            return Ok(LoginOutcome::CodeRequired {
                account_id: account.id,
                status: self.verification.status_after_issue(&issued),
            });
        }

        let account = self
            .accounts
            .apply(
                account.id,
                AccountUpdate::RecordLogin {
                    at: now,
                    two_factor: false,
                },
            )
            .await?;
        tracing::info!(account_id = %account.id, event = "login_succeeded", "Login completed");
        self.notify_login(&account, now).await;
        Ok(LoginOutcome::Authenticated(account))
    }

    /// Finish a login with the emailed code
    ///
    /// Only a login started by [`login`](Self::login) can be finished. An
    /// expired code ends that login; the password has to be entered again.
    pub async fn verify_login_code(&self, account_id: Uuid, code: &str) -> DomainResult<Account> {
        let account = self.account(account_id).await?;
        let key = ChallengeKey::account(account_id, Purpose::LoginTwoFactor);
        self.ensure_login_in_progress(&account, &key).await?;

        if let Err(e) = self.verification.verify_and_consume(&key, code).await {
            if matches!(e, DomainError::Verification(VerificationError::Expired)) {
                self.verification.remove(&key).await?;
                tracing::info!(
                    account_id = %account_id,
                    event = "login_code_expired",
                    "Login code expired; login has to start over"
                );
            }
            return Err(e);
        }

        let now = self.verification.now();
        let account = self
            .accounts
            .apply(
                account_id,
                AccountUpdate::RecordLogin {
                    at: now,
                    two_factor: true,
                },
            )
            .await?;
        tracing::info!(
            account_id = %account.id,
            event = "login_succeeded",
            "Login completed with verification code"
        );
        self.notify_login(&account, now).await;
        Ok(account)
    }

    /// Send a new code for a login started by [`login`](Self::login)
    pub async fn resend_login_code(&self, account_id: Uuid) -> DomainResult<ChallengeStatus> {
        let account = self.account(account_id).await?;
        let key = ChallengeKey::account(account_id, Purpose::LoginTwoFactor);
        self.ensure_login_in_progress(&account, &key).await?;

        let issued = self.verification.resend_code(&key, &account.email).await?;
        Ok(self.verification.status_after_issue(&issued))
    }

    /// A login is waiting for its code while the account still needs a
    /// second factor and the slot holds a code nobody has used up
    async fn ensure_login_in_progress(&self, account: &Account, key: &ChallengeKey) -> DomainResult<()> {
        if !account.is_active {
            return Err(AccountError::AccountInactive.into());
        }
        let due = account.requires_login_code(self.verification.now(), self.config.two_factor_interval());
        if !due || !self.verification.has_pending_code(key).await? {
            tracing::warn!(
                account_id = %account.id,
                event = "login_code_without_login",
                "Login code request without a login in progress"
            );
            return Err(AccountError::LoginNotInProgress.into());
        }
        Ok(())
    }

    async fn notify_login(&self, account: &Account, at: DateTime<Utc>) {
        if !account.login_notifications_enabled {
            return;
        }
        self.send_notice(
            &account.email,
            AccountNotice::NewLogin {
                username: account.username.clone(),
                login_count: account.login_count,
                at,
            },
        )
        .await;
    }

    // ---- Password reset ----

    /// Send a password reset code to the account's email
    pub async fn request_password_reset(&self, email: &str) -> DomainResult<PasswordResetStarted> {
        let email = normalize_email(email);
        let account = self
            .accounts
            .find_by_email(&email)
            .await?
            .ok_or(AccountError::AccountNotFound)?;
        if !account.is_active {
            return Err(AccountError::AccountInactive.into());
        }

        let key = ChallengeKey::account(account.id, Purpose::PasswordReset);
        let issued = self.verification.issue_code(&key, &account.email).await?;
        tracing::info!(
            account_id = %account.id,
            event = "password_reset_requested",
            "Password reset code issued"
        );

        Ok(PasswordResetStarted {
            account_id: account.id,
            status: self.verification.status_after_issue(&issued),
        })
    }

    /// Exchange a reset code for a short-lived grant to set a new password
    pub async fn verify_password_reset_code(
        &self,
        account_id: Uuid,
        code: &str,
    ) -> DomainResult<ResetGrant> {
        self.account(account_id).await?;
        self.verification
            .verify_and_consume(&ChallengeKey::account(account_id, Purpose::PasswordReset), code)
            .await?;

        let grant = ResetGrant::new(self.verification.now());
        self.accounts
            .apply(account_id, AccountUpdate::SetResetGrant(Some(grant.clone())))
            .await?;
        Ok(grant)
    }

    /// Set a new password using a grant from [`verify_password_reset_code`](Self::verify_password_reset_code)
    pub async fn complete_password_reset(
        &self,
        account_id: Uuid,
        grant_token: Uuid,
        new_password: &str,
        confirmation: &str,
    ) -> DomainResult<Account> {
        let account = self.account(account_id).await?;
        let now = self.verification.now();

        let grant_ok = account.reset_grant.as_ref().map_or(false, |grant| {
            grant.token == grant_token && grant.is_valid_at(now, self.config.reset_grant_window())
        });
        if !grant_ok {
            return Err(AccountError::InvalidResetGrant.into());
        }
        check_new_password(new_password, confirmation)?;

        // The grant is checked again when the hash is written, so of two
        // concurrent completions only one changes the password
        let password_hash = self.hash_password(new_password)?;
        let account = self
            .accounts
            .apply(
                account_id,
                AccountUpdate::ResetPassword {
                    password_hash,
                    grant: grant_token,
                },
            )
            .await?;

        tracing::info!(
            account_id = %account.id,
            event = "password_reset_completed",
            "Password changed through reset"
        );
        if account.login_notifications_enabled {
            self.send_notice(
                &account.email,
                AccountNotice::PasswordChanged {
                    username: account.username.clone(),
                },
            )
            .await;
        }
        Ok(account)
    }

    pub async fn resend_password_reset_code(
        &self,
        account_id: Uuid,
    ) -> DomainResult<ChallengeStatus> {
        let account = self.account(account_id).await?;
        let issued = self
            .verification
            .resend_code(
                &ChallengeKey::account(account_id, Purpose::PasswordReset),
                &account.email,
            )
            .await?;
        Ok(self.verification.status_after_issue(&issued))
    }

    // ---- Email change ----

    /// Record a new address and send a confirmation code to it
    pub async fn request_email_change(
        &self,
        account_id: Uuid,
        new_email: &str,
    ) -> DomainResult<ChallengeStatus> {
        let account = self.account(account_id).await?;
        let new_email = normalize_email(new_email);
        if !is_valid_email(&new_email) {
            return Err(AccountError::InvalidEmail.into());
        }
        if new_email.eq_ignore_ascii_case(&account.email) {
            return Err(AccountError::SameEmail.into());
        }
        if self.accounts.find_by_email(&new_email).await?.is_some() {
            return Err(AccountError::EmailTaken.into());
        }

        self.accounts
            .apply(account_id, AccountUpdate::SetPendingEmail(Some(new_email.clone())))
            .await?;

        let key = ChallengeKey::account(account_id, Purpose::EmailChange);
        let issued = self.verification.issue_code(&key, &new_email).await?;
        tracing::info!(
            account_id = %account_id,
            new_email = %mask_email(&new_email),
            event = "email_change_requested",
            "Email change code issued"
        );
        Ok(self.verification.status_after_issue(&issued))
    }

    /// Apply the pending address once its code is confirmed
    ///
    /// An expired code drops the pending address; the change has to be
    /// requested again.
    pub async fn verify_email_change(&self, account_id: Uuid, code: &str) -> DomainResult<Account> {
        let current = self.account(account_id).await?;
        let Some(new_email) = current.pending_email.clone() else {
            return Err(AccountError::NoPendingEmailChange.into());
        };
        let key = ChallengeKey::account(account_id, Purpose::EmailChange);

        if let Err(e) = self.verification.verify_and_consume(&key, code).await {
            if matches!(e, DomainError::Verification(VerificationError::Expired)) {
                self.accounts
                    .apply(account_id, AccountUpdate::SetPendingEmail(None))
                    .await?;
                tracing::info!(
                    account_id = %account_id,
                    event = "email_change_expired",
                    "Email change code expired; pending address cleared"
                );
            }
            return Err(e);
        }

        let update = AccountUpdate::ApplyPendingEmail {
            expected: new_email,
        };
        let account = match self.accounts.apply(account_id, update).await {
            Ok(account) => account,
            Err(DomainError::Account(AccountError::EmailTaken)) => {
                self.accounts
                    .apply(account_id, AccountUpdate::SetPendingEmail(None))
                    .await?;
                return Err(AccountError::EmailTaken.into());
            }
            Err(e) => return Err(e),
        };
        tracing::info!(
            account_id = %account.id,
            email = %mask_email(&account.email),
            event = "email_change_completed",
            "Account email changed"
        );

        if account.login_notifications_enabled {
            self.send_notice(
                &current.email,
                AccountNotice::EmailChanged {
                    username: account.username.clone(),
                    new_email: account.email.clone(),
                },
            )
            .await;
        }
        Ok(account)
    }

    pub async fn resend_email_change_code(&self, account_id: Uuid) -> DomainResult<ChallengeStatus> {
        let account = self.account(account_id).await?;
        let new_email = account
            .pending_email
            .ok_or(AccountError::NoPendingEmailChange)?;
        let issued = self
            .verification
            .resend_code(&ChallengeKey::account(account_id, Purpose::EmailChange), &new_email)
            .await?;
        Ok(self.verification.status_after_issue(&issued))
    }

    // ---- Settings ----

    pub async fn set_two_factor(&self, account_id: Uuid, enabled: bool) -> DomainResult<Account> {
        let account = self
            .accounts
            .apply(account_id, AccountUpdate::SetTwoFactor(enabled))
            .await?;
        tracing::info!(
            account_id = %account_id,
            enabled = enabled,
            event = "two_factor_toggled",
            "Two-factor setting changed"
        );
        Ok(account)
    }

    pub async fn set_login_notifications(
        &self,
        account_id: Uuid,
        enabled: bool,
    ) -> DomainResult<Account> {
        self.accounts
            .apply(account_id, AccountUpdate::SetLoginNotifications(enabled))
            .await
    }

    /// Countdown and resend state for any slot
    pub async fn challenge_status(
        &self,
        principal: PrincipalRef,
        purpose: Purpose,
    ) -> DomainResult<ChallengeStatus> {
        self.verification
            .status(&ChallengeKey::new(principal, purpose))
            .await
    }

    pub async fn account(&self, account_id: Uuid) -> DomainResult<Account> {
        self.accounts
            .find_by_id(account_id)
            .await?
            .ok_or_else(|| AccountError::AccountNotFound.into())
    }

    // ---- Helpers ----

    fn hash_password(&self, password: &str) -> DomainResult<String> {
        bcrypt::hash(password, self.config.password_hash_cost).map_err(|e| DomainError::Internal {
            message: format!("Failed to hash password: {}", e),
        })
    }

    /// Notices are informational; a failed send is logged and ignored
    async fn send_notice(&self, destination: &str, notice: AccountNotice) {
        if let Err(e) = self.notifier.send_notice(destination, &notice).await {
            tracing::warn!(
                destination = %mask_email(destination),
                error = %e,
                event = "notice_delivery_failed",
                "Failed to send account notice"
            );
        }
    }
}

fn check_new_password(password: &str, confirmation: &str) -> DomainResult<()> {
    if password != confirmation {
        return Err(AccountError::PasswordMismatch.into());
    }
    if !is_acceptable_password(password) {
        return Err(AccountError::WeakPassword.into());
    }
    Ok(())
}
