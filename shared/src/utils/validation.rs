//! Common validation utilities

/// Number of digits in a one-time code
pub const CODE_LENGTH: usize = 6;

/// Minimum accepted password length
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum username length
pub const MAX_USERNAME_LENGTH: usize = 150;

/// Check that a one-time code is exactly six ASCII digits
///
/// No trimming or normalization happens here: `" 123456"` and `"١٢٣٤٥٦"`
/// (Eastern Arabic digits) are both rejected.
pub fn is_valid_code_format(code: &str) -> bool {
    code.len() == CODE_LENGTH && code.bytes().all(|b| b.is_ascii_digit())
}

/// Check password strength rules
pub fn is_acceptable_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LENGTH
        && !password.chars().all(|c| c.is_ascii_digit())
}

/// Check username rules: non-empty, bounded, letters/digits and `@.+-_`
pub fn is_valid_username(username: &str) -> bool {
    let count = username.chars().count();
    count > 0
        && count <= MAX_USERNAME_LENGTH
        && username
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
}
