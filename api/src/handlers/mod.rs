//! Response helpers shared by the route handlers

pub mod error;

use actix_web::{http::StatusCode, HttpRequest, HttpResponse};
use pimx_shared::ApiResponse;
use serde::Serialize;
use uuid::Uuid;

pub use error::{error_response, status_for, validation_error_response};

/// Request ID from `X-Request-ID`, or a fresh one
pub fn request_id(req: &HttpRequest) -> String {
    req.headers()
        .get("X-Request-ID")
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

/// Wrap `data` in the standard success envelope
pub fn success_response<T: Serialize>(status: StatusCode, data: T, request_id: &str) -> HttpResponse {
    HttpResponse::build(status).json(ApiResponse::success(data).with_request_id(request_id))
}
