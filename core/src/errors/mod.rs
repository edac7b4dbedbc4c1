//! Domain-specific error types and error handling.

mod types;


// Re-export all error types and utilities
pub use types::{
    extract_english_message, extract_persian_message, localized_message, AccountError,
    VerificationError,
};

use thiserror::Error;

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message} | خطای اعتبارسنجی: {message}")]
    Validation { message: String },

    #[error("Resource not found: {resource} | منبع یافت نشد: {resource}")]
    NotFound { resource: String },

    #[error("Internal error: {message} | خطای داخلی: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Verification(#[from] VerificationError),

    #[error(transparent)]
    Account(#[from] AccountError),
}

impl DomainError {
    /// Stable machine-readable code
    pub fn error_code(&self) -> &'static str {
        match self {
            DomainError::Validation { .. } => "VALIDATION_ERROR",
            DomainError::NotFound { .. } => "NOT_FOUND",
            DomainError::Internal { .. } => "INTERNAL_ERROR",
            DomainError::Verification(e) => e.error_code(),
            DomainError::Account(e) => e.error_code(),
        }
    }

    /// Verification outcome carried by this error, if any
    pub fn as_verification(&self) -> Option<&VerificationError> {
        match self {
            DomainError::Verification(e) => Some(e),
            _ => None,
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
