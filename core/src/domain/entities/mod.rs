//! Domain entities representing core business objects.

pub mod account;
pub mod challenge;
pub mod pending_registration;

// Re-export commonly used types
pub use account::{Account, AccountUpdate, ResetGrant};
pub use challenge::{
    format_code, ChallengeKey, ChallengeRecord, PrincipalRef, Purpose, VerificationChallenge,
    CODE_LENGTH, CODE_SPACE,
};
pub use pending_registration::PendingRegistration;
