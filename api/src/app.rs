//! Application state and factory
//!
//! Builds the storage backends and services from configuration and
//! provides the factory for the Actix-web application.

use std::sync::Arc;

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    error::InternalError,
    middleware::Logger,
    web, App, HttpRequest, HttpResponse,
};
use log::info;

use pimx_core::repositories::{
    AccountRepository, ChallengeStore, InMemoryAccountRepository, InMemoryChallengeStore,
    InMemoryPendingRegistrationStore, PendingRegistrationStore,
};
use pimx_core::services::{
    AccountService, AccountServiceConfig, VerificationCodeManager, VerificationServiceConfig,
};
use pimx_infra::cache::{
    RedisAccountRepository, RedisChallengeStore, RedisClient, RedisPendingRegistrationStore,
};
use pimx_infra::notify::create_notifier;
use pimx_shared::config::{AppConfig, StorageBackend};
use pimx_shared::{ApiResponse, Language};

use crate::i18n::request_language;
use crate::routes;

/// Application state shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub account_service: Arc<AccountService>,
}

impl AppState {
    pub fn new(account_service: Arc<AccountService>) -> Self {
        Self { account_service }
    }

    /// Wire stores, notifier and services according to `config`
    pub async fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let (challenges, accounts, pending): (
            Arc<dyn ChallengeStore>,
            Arc<dyn AccountRepository>,
            Arc<dyn PendingRegistrationStore>,
        ) = match config.storage {
            StorageBackend::Memory => {
                info!("Using in-memory storage; state is lost on restart");
                (
                    Arc::new(InMemoryChallengeStore::new()),
                    Arc::new(InMemoryAccountRepository::new()),
                    Arc::new(InMemoryPendingRegistrationStore::new()),
                )
            }
            StorageBackend::Redis => {
                let client = RedisClient::new(config.cache.clone()).await?;
                if !client.health_check().await? {
                    anyhow::bail!("Redis health check failed");
                }
                (
                    Arc::new(RedisChallengeStore::new(client.clone())),
                    Arc::new(RedisAccountRepository::new(client.clone())),
                    Arc::new(RedisPendingRegistrationStore::new(client)),
                )
            }
        };

        let notifier = create_notifier(&config.notifier);
        let verification = Arc::new(VerificationCodeManager::new(
            challenges,
            notifier.clone(),
            VerificationServiceConfig::from(&config.verification),
        ));
        let account_service = AccountService::new(
            accounts,
            pending,
            verification,
            notifier,
            AccountServiceConfig::from(&config.verification),
        );

        Ok(Self::new(Arc::new(account_service)))
    }
}

/// Create and configure the application
pub fn create_app(
    state: web::Data<AppState>,
    max_payload_size: usize,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let json_config = web::JsonConfig::default()
        .limit(max_payload_size)
        .error_handler(|err, req| {
            let message = match request_language(req) {
                Language::English => "Request body is not valid JSON for this endpoint",
                Language::Persian => "بدنه درخواست برای این مسیر معتبر نیست",
            };
            log::warn!("Rejected request body on {}: {}", req.path(), err);
            let response = HttpResponse::BadRequest()
                .json(ApiResponse::<()>::error("INVALID_REQUEST_BODY", message));
            InternalError::from_response(err, response).into()
        });

    App::new()
        .app_data(state)
        .app_data(json_config)
        .wrap(Logger::default())
        .route("/health", web::get().to(health_check))
        .configure(routes::configure)
        .default_service(web::route().to(not_found))
}

/// Health check endpoint handler
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "pimxchat-api",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Default 404 handler
async fn not_found(req: HttpRequest) -> HttpResponse {
    let message = match request_language(&req) {
        Language::English => "The requested resource was not found",
        Language::Persian => "منبع درخواستی یافت نشد",
    };
    HttpResponse::NotFound().json(ApiResponse::<()>::error("NOT_FOUND", message))
}
