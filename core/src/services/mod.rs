//! Business services containing domain logic and use cases.

pub mod account;
pub mod clock;
pub mod verification;

// Re-export commonly used types
pub use account::{
    AccountService, AccountServiceConfig, LoginOutcome, PasswordResetStarted, RegisterRequest,
    RegistrationStarted,
};
pub use clock::{Clock, ManualClock, SystemClock};
pub use verification::{
    AccountNotice, CodeGenerator, DeliveryStatus, IssuedCode, Notifier, OsRngCodeGenerator,
    VerificationCodeManager, VerificationServiceConfig,
};
