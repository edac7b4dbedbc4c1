//! # PIMXCHAT Core
//!
//! Core business logic and domain layer for the PIMXCHAT backend.
//! This crate contains the verification code lifecycle (issue, expire,
//! validate, resend), the four account flows built on top of it
//! (registration, login 2FA, password reset, email change), repository
//! interfaces, and error types.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::entities::{
    Account, AccountUpdate, ChallengeKey, ChallengeRecord, PendingRegistration, PrincipalRef,
    Purpose, ResetGrant, VerificationChallenge,
};
pub use domain::value_objects::ChallengeStatus;
pub use errors::{AccountError, DomainError, DomainResult, VerificationError};
pub use repositories::{
    AccountRepository, ChallengeStore, InMemoryAccountRepository, InMemoryChallengeStore,
    InMemoryPendingRegistrationStore, PendingRegistrationStore,
};
pub use services::{
    AccountNotice, AccountService, AccountServiceConfig, Clock, CodeGenerator, DeliveryStatus,
    IssuedCode, LoginOutcome, ManualClock, Notifier, OsRngCodeGenerator, PasswordResetStarted,
    RegisterRequest, RegistrationStarted, SystemClock, VerificationCodeManager,
    VerificationServiceConfig,
};
