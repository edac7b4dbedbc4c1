use actix_web::{http::StatusCode, web, HttpRequest, HttpResponse};
use uuid::Uuid;
use validator::Validate;

use pimx_shared::utils::email::mask_email;

use crate::app::AppState;
use crate::dto::{
    AccountMessageResponse, ChallengeStatusResponse, EmailChangeRequest, VerifyCodeRequest,
};
use crate::handlers::{error_response, request_id, success_response, validation_error_response};
use crate::i18n::{request_language, Message};

/// POST /api/v1/accounts/{account_id}/email-change
///
/// Stores the new address as pending and sends a code to it.
pub async fn request(
    req: HttpRequest,
    state: web::Data<AppState>,
    account_id: web::Path<Uuid>,
    body: web::Json<EmailChangeRequest>,
) -> HttpResponse {
    let request_id = request_id(&req);
    let lang = request_language(&req);

    if let Err(errors) = body.validate() {
        return validation_error_response(&errors, lang, &request_id);
    }

    let account_id = account_id.into_inner();
    log::info!(
        "[{}] Email change to {} requested by {}",
        request_id,
        mask_email(&body.new_email),
        account_id
    );

    match state
        .account_service
        .request_email_change(account_id, &body.new_email)
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

/// POST /api/v1/accounts/{account_id}/email-change/verify
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
        .verify_email_change(account_id.into_inner(), &body.code)
        .await
    {
        Ok(account) => success_response(
            StatusCode::OK,
            AccountMessageResponse::new(account, Message::EmailChanged, lang),
            &request_id,
        ),
        Err(e) => error_response(&e, lang, &request_id),
    }
}

/// POST /api/v1/accounts/{account_id}/email-change/resend
pub async fn resend(
    req: HttpRequest,
    state: web::Data<AppState>,
    account_id: web::Path<Uuid>,
) -> HttpResponse {
    let request_id = request_id(&req);
    let lang = request_language(&req);

    match state
        .account_service
        .resend_email_change_code(account_id.into_inner())
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
