//! Registration flow tests

use chrono::Duration;

use crate::domain::entities::{ChallengeKey, Purpose};
use crate::errors::{AccountError, DomainError, VerificationError};
use crate::repositories::AccountRepository;

use super::support::{request, Fixture};

#[tokio::test]
async fn test_register_sends_code_and_verifies() {
    let f = Fixture::new();

    let started = f.service.register(request("Mina@Example.COM", "mina")).await.unwrap();
    assert_eq!(started.status.purpose, Purpose::Registration);
    assert_eq!(started.status.remaining_seconds, 120);
    assert_eq!(started.status.delivered, Some(true));

    let code = f.notifier.last_code_for("Mina@example.com").unwrap();
    let account = f.service.verify_registration(started.token, &code).await.unwrap();

    assert_eq!(account.email, "Mina@example.com");
    assert_eq!(account.username, "mina");
    assert_eq!(account.age, Some(25));
    assert!(account.is_active && account.is_verified);
    assert!(account.verify_password(super::support::PASSWORD));
    assert!(f.accounts.find_by_id(account.id).await.unwrap().is_some());

    // the pending registration is gone
    assert!(matches!(
        f.service.registration_status(started.token).await,
        Err(DomainError::Account(AccountError::RegistrationNotFound))
    ));
}

#[tokio::test]
async fn test_register_validates_form() {
    let f = Fixture::new();

    let mut bad = request("not-an-email", "mina");
    assert!(matches!(
        f.service.register(bad.clone()).await,
        Err(DomainError::Account(AccountError::InvalidEmail))
    ));

    bad = request("mina@example.com", "mina");
    bad.password_confirmation = "different-pass".to_string();
    assert!(matches!(
        f.service.register(bad).await,
        Err(DomainError::Account(AccountError::PasswordMismatch))
    ));

    bad = request("mina@example.com", "mina");
    bad.password = "1234567".to_string();
    bad.password_confirmation = "1234567".to_string();
    assert!(matches!(
        f.service.register(bad).await,
        Err(DomainError::Account(AccountError::WeakPassword))
    ));

    bad = request("mina@example.com", "has space");
    assert!(matches!(
        f.service.register(bad).await,
        Err(DomainError::Account(AccountError::InvalidUsername))
    ));

    assert_eq!(f.notifier.code_count(), 0);
}

#[tokio::test]
async fn test_register_rejects_taken_email_and_username() {
    let f = Fixture::new();
    f.create_account("mina@example.com", "mina").await;

    assert!(matches!(
        f.service.register(request("mina@example.com", "other")).await,
        Err(DomainError::Account(AccountError::EmailTaken))
    ));
    assert!(matches!(
        f.service.register(request("other@example.com", "mina")).await,
        Err(DomainError::Account(AccountError::UsernameTaken))
    ));
}

#[tokio::test]
async fn test_expired_registration_code_discards_pending_registration() {
    let f = Fixture::new();
    let started = f.service.register(request("mina@example.com", "mina")).await.unwrap();
    let code = f.notifier.last_code_for("mina@example.com").unwrap();

    f.clock.advance(Duration::minutes(2));
    match f.service.verify_registration(started.token, &code).await {
        Err(DomainError::Verification(VerificationError::Expired)) => {}
        other => panic!("Expected expired, got {:?}", other),
    }

    assert!(matches!(
        f.service.verify_registration(started.token, &code).await,
        Err(DomainError::Account(AccountError::RegistrationNotFound))
    ));
}

#[tokio::test]
async fn test_wrong_code_keeps_registration_pending() {
    let f = Fixture::new();
    let started = f.service.register(request("mina@example.com", "mina")).await.unwrap();
    let code = f.notifier.last_code_for("mina@example.com").unwrap();
    let wrong = if code == "000000" { "111111" } else { "000000" };

    assert!(matches!(
        f.service.verify_registration(started.token, wrong).await,
        Err(DomainError::Verification(VerificationError::Mismatch))
    ));
    assert!(matches!(
        f.service.verify_registration(started.token, "12a456").await,
        Err(DomainError::Verification(VerificationError::InvalidFormat))
    ));
    assert!(f.service.verify_registration(started.token, &code).await.is_ok());
}

#[tokio::test]
async fn test_status_reissues_expired_registration_code() {
    let f = Fixture::new();
    let started = f.service.register(request("mina@example.com", "mina")).await.unwrap();
    let first = f.notifier.last_code_for("mina@example.com").unwrap();

    f.clock.advance(Duration::seconds(45));
    let status = f.service.registration_status(started.token).await.unwrap();
    assert_eq!(status.remaining_seconds, 75);
    assert_eq!(status.remaining_label(pimx_shared::Language::Persian), "1 دقیقه و 15 ثانیه");
    assert_eq!(f.notifier.code_count(), 1);

    f.clock.advance(Duration::minutes(5));
    let status = f.service.registration_status(started.token).await.unwrap();
    assert_eq!(status.remaining_seconds, 120);
    assert_eq!(f.notifier.code_count(), 2);

    let key = ChallengeKey::registration(started.token);
    let second = f.stored_code(&key).await.unwrap();
    assert_eq!(f.notifier.last_code_for("mina@example.com"), Some(second.clone()));
    if first != second {
        assert!(f.service.verify_registration(started.token, &first).await.is_err());
    }
    assert!(f.service.verify_registration(started.token, &second).await.is_ok());
}

#[tokio::test]
async fn test_resend_registration_code_cooldown() {
    let f = Fixture::new();
    let started = f.service.register(request("mina@example.com", "mina")).await.unwrap();

    f.clock.advance(Duration::seconds(30));
    match f.service.resend_registration_code(started.token).await {
        Err(DomainError::Verification(VerificationError::Cooldown { remaining_seconds })) => {
            assert_eq!(remaining_seconds, 90)
        }
        other => panic!("Expected cooldown, got {:?}", other),
    }

    f.clock.advance(Duration::seconds(90));
    let status = f.service.resend_registration_code(started.token).await.unwrap();
    assert_eq!(status.remaining_seconds, 120);
    assert!(!status.resend_allowed);
    assert_eq!(f.notifier.code_count(), 2);
}

#[tokio::test]
async fn test_pending_registration_expires_on_its_own() {
    let f = Fixture::new();
    let started = f.service.register(request("mina@example.com", "mina")).await.unwrap();

    f.clock.advance(Duration::minutes(30));
    assert!(matches!(
        f.service.registration_status(started.token).await,
        Err(DomainError::Account(AccountError::RegistrationNotFound))
    ));
}

#[tokio::test]
async fn test_registration_code_survives_delivery_failure() {
    let f = Fixture::new();
    f.notifier.set_failing(true);

    let started = f.service.register(request("mina@example.com", "mina")).await.unwrap();
    assert_eq!(started.status.delivered, Some(false));

    let code = f
        .stored_code(&ChallengeKey::registration(started.token))
        .await
        .unwrap();
    assert!(f.service.verify_registration(started.token, &code).await.is_ok());
}
