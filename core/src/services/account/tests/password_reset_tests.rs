//! Password reset flow tests

use chrono::Duration;
use uuid::Uuid;

use crate::errors::{AccountError, DomainError, VerificationError};
use crate::services::account::LoginOutcome;
use crate::services::verification::AccountNotice;

use super::support::{Fixture, PASSWORD};

const NEW_PASSWORD: &str = "brand-new-pass";

#[tokio::test]
async fn test_full_password_reset() {
    let f = Fixture::new();
    let account = f.create_account("sima@example.com", "sima").await;

    let started = f.service.request_password_reset("sima@example.com").await.unwrap();
    assert_eq!(started.account_id, account.id);
    let code = f.notifier.last_code_for("sima@example.com").unwrap();

    let grant = f
        .service
        .verify_password_reset_code(account.id, &code)
        .await
        .unwrap();
    f.clock.advance(Duration::minutes(5));
    let updated = f
        .service
        .complete_password_reset(account.id, grant.token, NEW_PASSWORD, NEW_PASSWORD)
        .await
        .unwrap();
    assert!(updated.reset_grant.is_none());

    assert!(matches!(
        f.service.login("sima@example.com", PASSWORD).await,
        Err(DomainError::Account(AccountError::InvalidCredentials))
    ));
    assert!(matches!(
        f.service.login("sima@example.com", NEW_PASSWORD).await.unwrap(),
        LoginOutcome::Authenticated(_)
    ));

    let notices = f.notifier.notices();
    assert_eq!(notices.len(), 2);
    assert_eq!(notices[0].0, "sima@example.com");
    assert!(matches!(notices[0].1, AccountNotice::PasswordChanged { .. }));
    assert!(matches!(notices[1].1, AccountNotice::NewLogin { .. }));
}

#[tokio::test]
async fn test_reset_for_unknown_email() {
    let f = Fixture::new();
    assert!(matches!(
        f.service.request_password_reset("ghost@example.com").await,
        Err(DomainError::Account(AccountError::AccountNotFound))
    ));
}

#[tokio::test]
async fn test_grant_is_single_use_and_time_boxed() {
    let f = Fixture::new();
    let account = f.create_account("sima@example.com", "sima").await;
    f.service.request_password_reset("sima@example.com").await.unwrap();
    let code = f.notifier.last_code_for("sima@example.com").unwrap();
    let grant = f
        .service
        .verify_password_reset_code(account.id, &code)
        .await
        .unwrap();

    assert!(matches!(
        f.service
            .complete_password_reset(account.id, Uuid::new_v4(), NEW_PASSWORD, NEW_PASSWORD)
            .await,
        Err(DomainError::Account(AccountError::InvalidResetGrant))
    ));
    assert!(matches!(
        f.service
            .complete_password_reset(account.id, grant.token, NEW_PASSWORD, "other-pass")
            .await,
        Err(DomainError::Account(AccountError::PasswordMismatch))
    ));

    f.clock.advance(Duration::minutes(10));
    assert!(matches!(
        f.service
            .complete_password_reset(account.id, grant.token, NEW_PASSWORD, NEW_PASSWORD)
            .await,
        Err(DomainError::Account(AccountError::InvalidResetGrant))
    ));
}

#[tokio::test]
async fn test_grant_cannot_be_reused() {
    let f = Fixture::new();
    let account = f.create_account("sima@example.com", "sima").await;
    f.service.request_password_reset("sima@example.com").await.unwrap();
    let code = f.notifier.last_code_for("sima@example.com").unwrap();
    let grant = f
        .service
        .verify_password_reset_code(account.id, &code)
        .await
        .unwrap();

    f.service
        .complete_password_reset(account.id, grant.token, NEW_PASSWORD, NEW_PASSWORD)
        .await
        .unwrap();
    assert!(matches!(
        f.service
            .complete_password_reset(account.id, grant.token, "third-password", "third-password")
            .await,
        Err(DomainError::Account(AccountError::InvalidResetGrant))
    ));
}

#[tokio::test]
async fn test_expired_reset_code() {
    let f = Fixture::new();
    let account = f.create_account("sima@example.com", "sima").await;
    f.service.request_password_reset("sima@example.com").await.unwrap();
    let code = f.notifier.last_code_for("sima@example.com").unwrap();

    f.clock.advance(Duration::seconds(121));
    assert!(matches!(
        f.service.verify_password_reset_code(account.id, &code).await,
        Err(DomainError::Verification(VerificationError::Expired))
    ));

    let status = f.service.resend_password_reset_code(account.id).await.unwrap();
    assert_eq!(status.remaining_seconds, 120);
}

#[tokio::test]
async fn test_no_notice_when_notifications_disabled() {
    let f = Fixture::new();
    let account = f.create_account("sima@example.com", "sima").await;
    f.service.set_login_notifications(account.id, false).await.unwrap();

    f.service.request_password_reset("sima@example.com").await.unwrap();
    let code = f.notifier.last_code_for("sima@example.com").unwrap();
    let grant = f
        .service
        .verify_password_reset_code(account.id, &code)
        .await
        .unwrap();
    f.service
        .complete_password_reset(account.id, grant.token, NEW_PASSWORD, NEW_PASSWORD)
        .await
        .unwrap();

    assert!(f.notifier.notices().is_empty());
}
