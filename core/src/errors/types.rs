//! Domain-specific error types for verification and account flows
//!
//! Messages are bilingual: English first, then Persian, separated by `" | "`.
//! Use [`localized_message`] to pick the half matching the caller's language.

use pimx_shared::Language;
use thiserror::Error;

/// Outcomes of the verification code lifecycle other than success
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerificationError {
    #[error("Verification code must be exactly 6 digits | کد تأیید باید دقیقاً ۶ رقم باشد")]
    InvalidFormat,

    #[error("Verification code has expired. Please request a new code | کد تأیید منقضی شده است. لطفاً کد جدید درخواست کنید")]
    Expired,

    #[error("Verification code is incorrect | کد تأیید نادرست است")]
    Mismatch,

    #[error("Could not deliver the verification code: {reason} | ارسال کد تأیید ممکن نشد: {reason}")]
    DeliveryFailure { reason: String },

    #[error("Please wait {remaining_seconds} seconds before requesting a new code | لطفاً {remaining_seconds} ثانیه تا درخواست کد جدید صبر کنید")]
    Cooldown { remaining_seconds: i64 },

    #[error("Too many incorrect attempts. Please request a new code | تعداد تلاش‌های نادرست بیش از حد مجاز است. لطفاً کد جدید درخواست کنید")]
    TooManyAttempts,
}

impl VerificationError {
    /// Stable machine-readable code
    pub fn error_code(&self) -> &'static str {
        match self {
            VerificationError::InvalidFormat => "INVALID_CODE_FORMAT",
            VerificationError::Expired => "CODE_EXPIRED",
            VerificationError::Mismatch => "CODE_MISMATCH",
            VerificationError::DeliveryFailure { .. } => "DELIVERY_FAILURE",
            VerificationError::Cooldown { .. } => "RESEND_COOLDOWN",
            VerificationError::TooManyAttempts => "TOO_MANY_ATTEMPTS",
        }
    }
}

/// Account flow errors with bilingual messages
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccountError {
    #[error("This email address is already registered | این ایمیل قبلاً ثبت شده است")]
    EmailTaken,

    #[error("This username is already taken | این نام کاربری قبلاً انتخاب شده است")]
    UsernameTaken,

    #[error("Email or password is incorrect | ایمیل یا رمز عبور نادرست است")]
    InvalidCredentials,

    #[error("Account not found | حساب کاربری یافت نشد")]
    AccountNotFound,

    #[error("Account is inactive | حساب کاربری غیرفعال است")]
    AccountInactive,

    #[error("Registration session not found or expired. Please register again | اطلاعات ثبت‌نام یافت نشد یا منقضی شده است. لطفاً دوباره ثبت‌نام کنید")]
    RegistrationNotFound,

    #[error("Password reset permission is invalid or expired | مجوز بازنشانی رمز عبور نامعتبر یا منقضی شده است")]
    InvalidResetGrant,

    #[error("Passwords do not match | رمزهای عبور مطابقت ندارند")]
    PasswordMismatch,

    #[error("Password must be at least 8 characters and not only digits | رمز عبور باید حداقل ۸ کاراکتر و غیر عددی باشد")]
    WeakPassword,

    #[error("Invalid email address | آدرس ایمیل نامعتبر است")]
    InvalidEmail,

    #[error("Invalid username | نام کاربری نامعتبر است")]
    InvalidUsername,

    #[error("The new email is the same as the current one | ایمیل جدید با ایمیل فعلی یکسان است")]
    SameEmail,

    #[error("No email change is pending | هیچ درخواست تغییر ایمیلی در انتظار نیست")]
    NoPendingEmailChange,

    #[error("No login is waiting for a code. Please log in again | هیچ ورودی در انتظار کد تأیید نیست. لطفاً دوباره وارد شوید")]
    LoginNotInProgress,
}

impl AccountError {
    /// Stable machine-readable code
    pub fn error_code(&self) -> &'static str {
        match self {
            AccountError::EmailTaken => "EMAIL_TAKEN",
            AccountError::UsernameTaken => "USERNAME_TAKEN",
            AccountError::InvalidCredentials => "INVALID_CREDENTIALS",
            AccountError::AccountNotFound => "ACCOUNT_NOT_FOUND",
            AccountError::AccountInactive => "ACCOUNT_INACTIVE",
            AccountError::RegistrationNotFound => "REGISTRATION_NOT_FOUND",
            AccountError::InvalidResetGrant => "INVALID_RESET_GRANT",
            AccountError::PasswordMismatch => "PASSWORD_MISMATCH",
            AccountError::WeakPassword => "WEAK_PASSWORD",
            AccountError::InvalidEmail => "INVALID_EMAIL",
            AccountError::InvalidUsername => "INVALID_USERNAME",
            AccountError::SameEmail => "SAME_EMAIL",
            AccountError::NoPendingEmailChange => "NO_PENDING_EMAIL_CHANGE",
            AccountError::LoginNotInProgress => "LOGIN_NOT_IN_PROGRESS",
        }
    }
}

/// Helper function to extract English message from bilingual error
pub fn extract_english_message(message: &str) -> &str {
    message.split(" | ").next().unwrap_or(message)
}

/// Helper function to extract Persian message from bilingual error
pub fn extract_persian_message(message: &str) -> &str {
    message.split(" | ").nth(1).unwrap_or(message)
}

/// Pick the half of a bilingual message for `language`
pub fn localized_message(message: &str, language: Language) -> &str {
    match language {
        Language::English => extract_english_message(message),
        Language::Persian => extract_persian_message(message),
    }
}
