//! Shared setup for the HTTP tests

#![allow(dead_code)]

use std::sync::Arc;

use actix_web::web;
use chrono::{TimeZone, Utc};

use pimx_api::AppState;
use pimx_core::repositories::{
    InMemoryAccountRepository, InMemoryChallengeStore, InMemoryPendingRegistrationStore,
};
use pimx_core::services::{
    AccountService, AccountServiceConfig, CodeGenerator, ManualClock, VerificationCodeManager,
    VerificationServiceConfig,
};
use pimx_infra::notify::MockNotifier;
use pimx_shared::config::NotifierConfig;

/// Every code issued in these tests
pub const CODE: &str = "246810";
pub const WRONG_CODE: &str = "135791";
pub const PASSWORD: &str = "s3cure-pass";
pub const MAX_PAYLOAD: usize = 64 * 1024;

struct FixedGenerator;

impl CodeGenerator for FixedGenerator {
    fn generate(&self) -> String {
        CODE.to_string()
    }
}

pub struct TestContext {
    pub state: web::Data<AppState>,
    pub clock: Arc<ManualClock>,
    pub notifier: Arc<MockNotifier>,
}

pub fn context() -> TestContext {
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2026, 3, 20, 9, 30, 0).unwrap(),
    ));
    let notifier = Arc::new(MockNotifier::with_options(NotifierConfig::default(), false, false));

    let verification = VerificationCodeManager::new(
        Arc::new(InMemoryChallengeStore::new()),
        notifier.clone(),
        VerificationServiceConfig::default(),
    )
    .with_generator(Arc::new(FixedGenerator))
    .with_clock(clock.clone());

    let service = AccountService::new(
        Arc::new(InMemoryAccountRepository::new()),
        Arc::new(InMemoryPendingRegistrationStore::with_clock(clock.clone())),
        Arc::new(verification),
        notifier.clone(),
        AccountServiceConfig {
            password_hash_cost: 4,
            ..AccountServiceConfig::default()
        },
    );

    TestContext {
        state: web::Data::new(AppState::new(Arc::new(service))),
        clock,
        notifier,
    }
}

pub fn registration(email: &str, username: &str) -> serde_json::Value {
    serde_json::json!({
        "email": email,
        "username": username,
        "age": 27,
        "password": PASSWORD,
        "password_confirmation": PASSWORD,
    })
}

/// Send a `TestRequest` and return the status with the JSON body
macro_rules! call {
    ($app:expr, $req:expr) => {{
        let resp = actix_web::test::call_service($app, $req.to_request()).await;
        let status = resp.status();
        let body: serde_json::Value = actix_web::test::read_body_json(resp).await;
        (status, body)
    }};
}

/// Register and verify an account, returning its id
macro_rules! create_account {
    ($app:expr, $email:expr, $username:expr) => {{
        let (status, body) = call!(
            $app,
            actix_web::test::TestRequest::post()
                .uri("/api/v1/accounts/register")
                .set_json(common::registration($email, $username))
        );
        assert_eq!(status, actix_web::http::StatusCode::CREATED, "{}", body);
        let token = body["data"]["token"].as_str().unwrap().to_string();

        let (status, body) = call!(
            $app,
            actix_web::test::TestRequest::post()
                .uri(&format!("/api/v1/accounts/register/{}/verify", token))
                .set_json(serde_json::json!({ "code": common::CODE }))
        );
        assert_eq!(status, actix_web::http::StatusCode::CREATED, "{}", body);
        body["data"]["account"]["id"].as_str().unwrap().to_string()
    }};
}
