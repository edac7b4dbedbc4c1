//! Route registration

pub mod accounts;

use actix_web::web;

/// Register the versioned API
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/api/v1").configure(accounts::configure));
}
