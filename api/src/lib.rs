//! HTTP API for the PIMXCHAT account verification flows
//!
//! Exposes registration, two-factor login, password reset and email change
//! under `/api/v1/accounts`. Messages follow the `Accept-Language` header,
//! Persian by default.

pub mod app;
pub mod dto;
pub mod handlers;
pub mod i18n;
pub mod routes;

pub use app::{create_app, AppState};
