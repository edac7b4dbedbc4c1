use actix_web::{http::StatusCode, web, HttpRequest, HttpResponse};
use uuid::Uuid;
use validator::Validate;

use pimx_core::services::LoginOutcome;
use pimx_shared::utils::email::mask_email;

use crate::app::AppState;
use crate::dto::{
    AccountMessageResponse, ChallengeStatusResponse, LoginRequest, LoginResponse,
    VerifyCodeRequest,
};
use crate::handlers::{error_response, request_id, success_response, validation_error_response};
use crate::i18n::{request_language, Message};

/// POST /api/v1/accounts/login
///
/// Either completes the login or, when two-factor is due, emails a code
/// and answers with `result = "code_required"`.
pub async fn login(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> HttpResponse {
    let request_id = request_id(&req);
    let lang = request_language(&req);

    if let Err(errors) = body.validate() {
        return validation_error_response(&errors, lang, &request_id);
    }

    log::info!("[{}] Login attempt for {}", request_id, mask_email(&body.email));

    match state.account_service.login(&body.email, &body.password).await {
        Ok(LoginOutcome::Authenticated(account)) => success_response(
            StatusCode::OK,
            LoginResponse::Authenticated {
                message: Message::LoginCompleted.text(lang).to_string(),
                account: account.into(),
            },
            &request_id,
        ),
        Ok(LoginOutcome::CodeRequired { account_id, status }) => success_response(
            StatusCode::ACCEPTED,
            LoginResponse::CodeRequired {
                message: Message::LoginCodeRequired.text(lang).to_string(),
                account_id,
                verification: ChallengeStatusResponse::new(status, lang),
            },
            &request_id,
        ),
        Err(e) => error_response(&e, lang, &request_id),
    }
}

/// POST /api/v1/accounts/{account_id}/login/verify
pub async fn verify(
    req: HttpRequest,
    state: web::Data<AppState>,
    account_id: web::Path<Uuid>,
    body: web::Json<VerifyCodeRequest>,
) -> HttpResponse {
    let request_id = request_id(&req);
    let lang = request_language(&req);

    match state
        .account_service
        .verify_login_code(account_id.into_inner(), &body.code)
        .await
    {
        Ok(account) => success_response(
            StatusCode::OK,
            AccountMessageResponse::new(account, Message::LoginCompleted, lang),
            &request_id,
        ),
        Err(e) => error_response(&e, lang, &request_id),
    }
}

/// POST /api/v1/accounts/{account_id}/login/resend
pub async fn resend(
    req: HttpRequest,
    state: web::Data<AppState>,
    account_id: web::Path<Uuid>,
) -> HttpResponse {
    let request_id = request_id(&req);
    let lang = request_language(&req);

    match state.account_service.resend_login_code(account_id.into_inner()).await {
        Ok(status) => success_response(
            StatusCode::OK,
            ChallengeStatusResponse::new(status, lang),
            &request_id,
        ),
        Err(e) => error_response(&e, lang, &request_id),
    }
}
