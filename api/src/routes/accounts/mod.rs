//! Account flow endpoints
//!
//! - Registration: start, status, verify, resend
//! - Login with optional emailed second factor
//! - Password reset: request, verify code, complete, resend
//! - Email change: request, verify, resend
//! - Settings and challenge countdowns

pub mod email_change;
pub mod login;
pub mod password_reset;
pub mod registration;
pub mod settings;

use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/accounts")
            .route("/register", web::post().to(registration::register))
            .route("/register/{token}", web::get().to(registration::status))
            .route("/register/{token}/verify", web::post().to(registration::verify))
            .route("/register/{token}/resend", web::post().to(registration::resend))
            .route("/login", web::post().to(login::login))
            .route("/password-reset", web::post().to(password_reset::request))
            .route("/{account_id}", web::get().to(settings::account))
            .route("/{account_id}/settings", web::put().to(settings::update))
            .route(
                "/{account_id}/challenges/{purpose}",
                web::get().to(settings::challenge_status),
            )
            .route("/{account_id}/login/verify", web::post().to(login::verify))
            .route("/{account_id}/login/resend", web::post().to(login::resend))
            .route(
                "/{account_id}/password-reset/verify",
                web::post().to(password_reset::verify),
            )
            .route(
                "/{account_id}/password-reset/complete",
                web::post().to(password_reset::complete),
            )
            .route(
                "/{account_id}/password-reset/resend",
                web::post().to(password_reset::resend),
            )
            .route("/{account_id}/email-change", web::post().to(email_change::request))
            .route(
                "/{account_id}/email-change/verify",
                web::post().to(email_change::verify),
            )
            .route(
                "/{account_id}/email-change/resend",
                web::post().to(email_change::resend),
            ),
    );
}
