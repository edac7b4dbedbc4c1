use actix_web::{http::StatusCode, web, HttpRequest, HttpResponse};
use uuid::Uuid;
use validator::Validate;

use pimx_shared::utils::email::mask_email;

use crate::app::AppState;
use crate::dto::{
    AccountMessageResponse, ChallengeStatusResponse, RegisterRequest, RegistrationStartedResponse,
    VerifyCodeRequest,
};
use crate::handlers::{error_response, request_id, success_response, validation_error_response};
use crate::i18n::{request_language, Message};

/// POST /api/v1/accounts/register
///
/// Holds the sign-up data as a pending registration and emails a code.
/// The returned token addresses the registration in the later calls.
pub async fn register(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> HttpResponse {
    let request_id = request_id(&req);
    let lang = request_language(&req);
    let body = body.into_inner();

    if let Err(errors) = body.validate() {
        return validation_error_response(&errors, lang, &request_id);
    }

    log::info!("[{}] Registration requested for {}", request_id, mask_email(&body.email));

    match state.account_service.register(body.into()).await {
        Ok(started) => success_response(
            StatusCode::CREATED,
            RegistrationStartedResponse {
                token: started.token,
                verification: ChallengeStatusResponse::new(started.status, lang),
            },
            &request_id,
        ),
        Err(e) => error_response(&e, lang, &request_id),
    }
}

/// GET /api/v1/accounts/register/{token}
///
/// Countdown for the registration code; a dead code is replaced on the spot.
pub async fn status(
    req: HttpRequest,
    state: web::Data<AppState>,
    token: web::Path<Uuid>,
) -> HttpResponse {
    let request_id = request_id(&req);
    let lang = request_language(&req);

    match state.account_service.registration_status(token.into_inner()).await {
        Ok(status) => success_response(
            StatusCode::OK,
            ChallengeStatusResponse::new(status, lang),
            &request_id,
        ),
        Err(e) => error_response(&e, lang, &request_id),
    }
}

/// POST /api/v1/accounts/register/{token}/verify
pub async fn verify(
    req: HttpRequest,
    state: web::Data<AppState>,
    token: web::Path<Uuid>,
    body: web::Json<VerifyCodeRequest>,
) -> HttpResponse {
    let request_id = request_id(&req);
    let lang = request_language(&req);
    let token = token.into_inner();

    match state.account_service.verify_registration(token, &body.code).await {
        Ok(account) => {
            log::info!("[{}] Registration {} completed as {}", request_id, token, account.id);
            success_response(
                StatusCode::CREATED,
                AccountMessageResponse::new(account, Message::RegistrationCompleted, lang),
                &request_id,
            )
        }
        Err(e) => error_response(&e, lang, &request_id),
    }
}

/// POST /api/v1/accounts/register/{token}/resend
pub async fn resend(
    req: HttpRequest,
    state: web::Data<AppState>,
    token: web::Path<Uuid>,
) -> HttpResponse {
    let request_id = request_id(&req);
    let lang = request_language(&req);

    match state
        .account_service
        .resend_registration_code(token.into_inner())
        .await
    {
        Ok(status) => success_response(
            StatusCode::OK,
            ChallengeStatusResponse::new(status, lang),
            &request_id,
        ),
        Err(e) => error_response(&e, lang, &request_id),
    }
}
