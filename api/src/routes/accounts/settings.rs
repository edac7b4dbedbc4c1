use actix_web::{http::StatusCode, web, HttpRequest, HttpResponse};
use uuid::Uuid;

use pimx_core::domain::entities::{PrincipalRef, Purpose};
use pimx_core::errors::DomainError;

use crate::app::AppState;
use crate::dto::{AccountMessageResponse, AccountResponse, ChallengeStatusResponse, SettingsRequest};
use crate::handlers::{error_response, request_id, success_response};
use crate::i18n::{request_language, Message};

/// GET /api/v1/accounts/{account_id}
pub async fn account(
    req: HttpRequest,
    state: web::Data<AppState>,
    account_id: web::Path<Uuid>,
) -> HttpResponse {
    let request_id = request_id(&req);
    let lang = request_language(&req);

    match state.account_service.account(account_id.into_inner()).await {
        Ok(account) => success_response(StatusCode::OK, AccountResponse::from(account), &request_id),
        Err(e) => error_response(&e, lang, &request_id),
    }
}

/// PUT /api/v1/accounts/{account_id}/settings
pub async fn update(
    req: HttpRequest,
    state: web::Data<AppState>,
    account_id: web::Path<Uuid>,
    body: web::Json<SettingsRequest>,
) -> HttpResponse {
    let request_id = request_id(&req);
    let lang = request_language(&req);
    let account_id = account_id.into_inner();
    let service = &state.account_service;

    let result = async {
        let mut account = service.account(account_id).await?;
        if let Some(enabled) = body.two_factor_enabled {
            account = service.set_two_factor(account_id, enabled).await?;
        }
        if let Some(enabled) = body.login_notifications_enabled {
            account = service.set_login_notifications(account_id, enabled).await?;
        }
        Ok::<_, DomainError>(account)
    }
    .await;

    match result {
        Ok(account) => success_response(
            StatusCode::OK,
            AccountMessageResponse::new(account, Message::SettingsUpdated, lang),
            &request_id,
        ),
        Err(e) => error_response(&e, lang, &request_id),
    }
}

/// GET /api/v1/accounts/{account_id}/challenges/{purpose}
///
/// Countdown for one of the account's codes. Registration codes belong to
/// pending registrations and are served by the registration status route.
pub async fn challenge_status(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<(Uuid, String)>,
) -> HttpResponse {
    let request_id = request_id(&req);
    let lang = request_language(&req);
    let (account_id, purpose) = path.into_inner();

    let purpose = match purpose.parse::<Purpose>() {
        Ok(purpose) if purpose != Purpose::Registration => purpose,
        _ => {
            let error = DomainError::NotFound {
                resource: format!("challenge {}", purpose),
            };
            return error_response(&error, lang, &request_id);
        }
    };

    let service = &state.account_service;
    let result = async {
        service.account(account_id).await?;
        service
            .challenge_status(PrincipalRef::Account(account_id), purpose)
            .await
    }
    .await;

    match result {
        Ok(status) => success_response(
            StatusCode::OK,
            ChallengeStatusResponse::new(status, lang),
            &request_id,
        ),
        Err(e) => error_response(&e, lang, &request_id),
    }
}
