//! Mapping of domain errors to HTTP responses

use actix_web::{http::StatusCode, HttpResponse};
use serde_json::json;
use validator::ValidationErrors;

use pimx_core::errors::{localized_message, AccountError, DomainError, VerificationError};
use pimx_core::services::verification::format_remaining;
use pimx_shared::{ApiResponse, Language};

const INTERNAL_MESSAGE: &str = "An internal error occurred | خطای داخلی رخ داد";
const INVALID_REQUEST_MESSAGE: &str =
    "Invalid request data. Please check the highlighted fields | اطلاعات ارسالی نامعتبر است. لطفاً فیلدهای مشخص‌شده را بررسی کنید";

/// HTTP status for a domain error
pub fn status_for(error: &DomainError) -> StatusCode {
    match error {
        DomainError::Validation { .. } => StatusCode::BAD_REQUEST,
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        DomainError::Verification(e) => match e {
            VerificationError::InvalidFormat => StatusCode::BAD_REQUEST,
            VerificationError::Mismatch => StatusCode::UNPROCESSABLE_ENTITY,
            VerificationError::Expired => StatusCode::GONE,
            VerificationError::DeliveryFailure { .. } => StatusCode::BAD_GATEWAY,
            VerificationError::Cooldown { .. } | VerificationError::TooManyAttempts => {
                StatusCode::TOO_MANY_REQUESTS
            }
        },
        DomainError::Account(e) => match e {
            AccountError::EmailTaken
            | AccountError::UsernameTaken
            | AccountError::NoPendingEmailChange
            | AccountError::LoginNotInProgress => StatusCode::CONFLICT,
            AccountError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AccountError::AccountInactive => StatusCode::FORBIDDEN,
            AccountError::AccountNotFound | AccountError::RegistrationNotFound => {
                StatusCode::NOT_FOUND
            }
            AccountError::InvalidResetGrant => StatusCode::UNPROCESSABLE_ENTITY,
            AccountError::PasswordMismatch
            | AccountError::WeakPassword
            | AccountError::InvalidEmail
            | AccountError::InvalidUsername
            | AccountError::SameEmail => StatusCode::BAD_REQUEST,
        },
    }
}

/// Build the error envelope for a domain error
///
/// Internal errors are logged in full and answered with a generic message.
pub fn error_response(error: &DomainError, language: Language, request_id: &str) -> HttpResponse {
    let status = status_for(error);

    let message = match error {
        DomainError::Internal { .. } => {
            log::error!("[{}] Internal error: {}", request_id, error);
            localized_message(INTERNAL_MESSAGE, language).to_string()
        }
        _ => {
            log::warn!("[{}] Request failed ({}): {}", request_id, status, error.error_code());
            localized_message(&error.to_string(), language).to_string()
        }
    };

    let mut body = ApiResponse::<()>::error(error.error_code(), message).with_request_id(request_id);
    if let Some(VerificationError::Cooldown { remaining_seconds }) = error.as_verification() {
        body = body.with_details(json!({
            "remaining_seconds": remaining_seconds,
            "remaining_label": format_remaining(*remaining_seconds, language),
        }));
    }

    HttpResponse::build(status).json(body)
}

/// 400 response listing the failing fields
pub fn validation_error_response(
    errors: &ValidationErrors,
    language: Language,
    request_id: &str,
) -> HttpResponse {
    let fields: serde_json::Map<String, serde_json::Value> = errors
        .field_errors()
        .into_iter()
        .map(|(field, errors)| {
            let codes: Vec<String> = errors.iter().map(|e| e.code.to_string()).collect();
            (field.to_string(), json!(codes))
        })
        .collect();

    log::warn!("[{}] Validation failed: {:?}", request_id, fields.keys().collect::<Vec<_>>());

    let body = ApiResponse::<()>::error(
        "VALIDATION_ERROR",
        localized_message(INVALID_REQUEST_MESSAGE, language),
    )
    .with_details(json!({ "fields": fields }))
    .with_request_id(request_id);

    HttpResponse::BadRequest().json(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases: Vec<(DomainError, StatusCode)> = vec![
            (VerificationError::InvalidFormat.into(), StatusCode::BAD_REQUEST),
            (VerificationError::Mismatch.into(), StatusCode::UNPROCESSABLE_ENTITY),
            (VerificationError::Expired.into(), StatusCode::GONE),
            (
                VerificationError::Cooldown { remaining_seconds: 30 }.into(),
                StatusCode::TOO_MANY_REQUESTS,
            ),
            (
                VerificationError::DeliveryFailure { reason: "smtp".into() }.into(),
                StatusCode::BAD_GATEWAY,
            ),
            (AccountError::EmailTaken.into(), StatusCode::CONFLICT),
            (AccountError::RegistrationNotFound.into(), StatusCode::NOT_FOUND),
            (AccountError::LoginNotInProgress.into(), StatusCode::CONFLICT),
            (
                DomainError::Internal { message: "redis down".into() },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(status_for(&error), expected, "{:?}", error);
        }
    }

    #[actix_web::test]
    async fn test_internal_error_hides_details() {
        let error = DomainError::Internal {
            message: "redis://secret@host".into(),
        };
        let response = error_response(&error, Language::English, "req-1");
        let body = actix_web::body::to_bytes(response.into_body()).await.unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();

        assert!(text.contains("INTERNAL_ERROR"));
        assert!(!text.contains("secret"));
    }

    #[actix_web::test]
    async fn test_cooldown_details_are_localized() {
        let error: DomainError = VerificationError::Cooldown { remaining_seconds: 75 }.into();
        let response = error_response(&error, Language::Persian, "req-2");
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

        let body = actix_web::body::to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"]["code"], "RESEND_COOLDOWN");
        assert_eq!(json["error"]["details"]["remaining_seconds"], 75);
        assert_eq!(json["error"]["details"]["remaining_label"], "1 دقیقه و 15 ثانیه");
    }
}
