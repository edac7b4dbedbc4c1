//! Tests for message composition and the mock notifier

use chrono::{TimeZone, Utc};
use pimx_core::domain::entities::Purpose;
use pimx_core::services::{AccountNotice, Notifier};
use pimx_shared::config::NotifierConfig;

use crate::notify::{compose_code_message, compose_notice_message, create_notifier, MockNotifier};

fn quiet() -> MockNotifier {
    MockNotifier::with_options(NotifierConfig::default(), false, false)
}

#[test]
fn test_code_message_contains_code_and_product() {
    let config = NotifierConfig::default();
    let message = compose_code_message(&config, "sara@example.com", "004213", Purpose::PasswordReset);

    assert_eq!(message.to, "sara@example.com");
    assert_eq!(message.from, config.from_address);
    assert!(message.subject.starts_with("PIMXCHAT"));
    assert!(message.body.contains("004213"));
}

#[test]
fn test_notice_message_mentions_new_email() {
    let notice = AccountNotice::EmailChanged {
        username: "sara".to_string(),
        new_email: "sara@new.example".to_string(),
    };
    let message = compose_notice_message(&NotifierConfig::default(), "sara@example.com", &notice);
    assert!(message.body.contains("sara@new.example"));
    assert!(message.body.contains("sara"));
}

#[test]
fn test_new_login_notice_has_time_and_count() {
    let notice = AccountNotice::NewLogin {
        username: "sara".to_string(),
        login_count: 7,
        at: Utc.with_ymd_and_hms(2026, 3, 20, 9, 30, 5).unwrap(),
    };
    let message = compose_notice_message(&NotifierConfig::default(), "sara@example.com", &notice);

    assert!(message.subject.contains("ورود جدید"));
    assert!(message.body.contains("09:30:05 20-03-2026"));
    assert!(message.body.contains("Login count: 7"));
}

#[tokio::test]
async fn test_mock_send_code_success() {
    let notifier = quiet();
    let id = notifier
        .send_code("sara@example.com", "123456", Purpose::Registration)
        .await
        .unwrap();

    assert!(id.starts_with("mock_"));
    assert_eq!(notifier.message_count(), 1);
}

#[tokio::test]
async fn test_mock_rejects_invalid_destination() {
    let notifier = quiet();
    let result = notifier
        .send_code("not-an-email", "123456", Purpose::LoginTwoFactor)
        .await;

    assert!(result.is_err());
    assert_eq!(notifier.message_count(), 0);
}

#[tokio::test]
async fn test_mock_simulated_failure() {
    let notifier = quiet();
    notifier.set_simulate_failure(true);
    let notice = AccountNotice::PasswordChanged {
        username: "sara".to_string(),
    };
    assert!(notifier.send_notice("sara@example.com", &notice).await.is_err());

    notifier.set_simulate_failure(false);
    assert!(notifier.send_notice("sara@example.com", &notice).await.is_ok());
    assert_eq!(notifier.message_count(), 1);
}

#[tokio::test]
async fn test_unknown_provider_falls_back_to_mock() {
    let config = NotifierConfig {
        provider: "carrier-pigeon".to_string(),
        ..Default::default()
    };
    let notifier = create_notifier(&config);
    assert!(notifier
        .send_code("sara@example.com", "123456", Purpose::EmailChange)
        .await
        .is_ok());
}
