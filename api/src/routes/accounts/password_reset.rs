use actix_web::{http::StatusCode, web, HttpRequest, HttpResponse};
use uuid::Uuid;
use validator::Validate;

use pimx_shared::utils::email::mask_email;

use crate::app::AppState;
use crate::dto::{
    AccountMessageResponse, ChallengeStatusResponse, CompletePasswordResetRequest,
    PasswordResetRequest, PasswordResetStartedResponse, ResetGrantResponse, VerifyCodeRequest,
};
use crate::handlers::{error_response, request_id, success_response, validation_error_response};
use crate::i18n::{request_language, Message};

/// POST /api/v1/accounts/password-reset
pub async fn request(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<PasswordResetRequest>,
) -> HttpResponse {
    let request_id = request_id(&req);
    let lang = request_language(&req);

    if let Err(errors) = body.validate() {
        return validation_error_response(&errors, lang, &request_id);
    }

    log::info!("[{}] Password reset requested for {}", request_id, mask_email(&body.email));

    match state.account_service.request_password_reset(&body.email).await {
        Ok(started) => success_response(
            StatusCode::OK,
            PasswordResetStartedResponse {
                account_id: started.account_id,
                verification: ChallengeStatusResponse::new(started.status, lang),
            },
            &request_id,
        ),
        Err(e) => error_response(&e, lang, &request_id),
    }
}

/// POST /api/v1/accounts/{account_id}/password-reset/verify
///
/// Exchanges the emailed code for a short-lived reset grant.
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
        .verify_password_reset_code(account_id.into_inner(), &body.code)
        .await
    {
        Ok(grant) => success_response(
            StatusCode::OK,
            ResetGrantResponse::new(grant, lang),
            &request_id,
        ),
        Err(e) => error_response(&e, lang, &request_id),
    }
}

/// POST /api/v1/accounts/{account_id}/password-reset/complete
pub async fn complete(
    req: HttpRequest,
    state: web::Data<AppState>,
    account_id: web::Path<Uuid>,
    body: web::Json<CompletePasswordResetRequest>,
) -> HttpResponse {
    let request_id = request_id(&req);
    let lang = request_language(&req);

    if let Err(errors) = body.validate() {
        return validation_error_response(&errors, lang, &request_id);
    }

    match state
        .account_service
        .complete_password_reset(
            account_id.into_inner(),
            body.grant_token,
            &body.password,
            &body.password_confirmation,
        )
        .await
    {
        Ok(account) => {
            log::info!("[{}] Password reset completed for {}", request_id, account.id);
            success_response(
                StatusCode::OK,
                AccountMessageResponse::new(account, Message::PasswordChanged, lang),
                &request_id,
            )
        }
        Err(e) => error_response(&e, lang, &request_id),
    }
}

/// POST /api/v1/accounts/{account_id}/password-reset/resend
pub async fn resend(
    req: HttpRequest,
    state: web::Data<AppState>,
    account_id: web::Path<Uuid>,
) -> HttpResponse {
    let request_id = request_id(&req);
    let lang = request_language(&req);

    match state
        .account_service
        .resend_password_reset_code(account_id.into_inner())
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
