//! Expiry, countdown and resend arithmetic
//!
//! Pure functions of their inputs and an explicit `now`. A code issued at
//! `T` with window `W` is valid on the half-open interval `[T, T + W)`.

use chrono::{DateTime, Duration, Utc};
use constant_time_eq::constant_time_eq;
use pimx_shared::validation::is_valid_code_format;
use pimx_shared::Language;

use crate::errors::VerificationError;

/// Whether a code issued at `issued_at` has expired at `now`
///
/// A missing timestamp means there is no active code, which counts as expired.
pub fn is_expired(issued_at: Option<DateTime<Utc>>, window: Duration, now: DateTime<Utc>) -> bool {
    match issued_at {
        None => true,
        Some(issued_at) => now >= issued_at + window,
    }
}

/// Whole seconds left before `issued_at + window`, floored and never negative
pub fn remaining_seconds(
    issued_at: Option<DateTime<Utc>>,
    window: Duration,
    now: DateTime<Utc>,
) -> i64 {
    match issued_at {
        None => 0,
        Some(issued_at) => (issued_at + window - now).num_seconds().max(0),
    }
}

/// Render a countdown for display
///
/// Non-positive values render the expired label. Under a minute only
/// seconds are shown; otherwise both parts always appear, even when the
/// seconds part is zero.
pub fn format_remaining(seconds: i64, language: Language) -> String {
    if seconds <= 0 {
        return match language {
            Language::Persian => "منقضی شده".to_string(),
            Language::English => "expired".to_string(),
        };
    }

    let minutes = seconds / 60;
    let rest = seconds % 60;

    match language {
        Language::Persian if minutes > 0 => format!("{} دقیقه و {} ثانیه", minutes, rest),
        Language::Persian => format!("{} ثانیه", rest),
        Language::English if minutes > 0 => format!(
            "{} {} and {} {}",
            minutes,
            plural(minutes, "minute"),
            rest,
            plural(rest, "second")
        ),
        Language::English => format!("{} {}", rest, plural(rest, "second")),
    }
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        unit.to_string()
    } else {
        format!("{}s", unit)
    }
}

/// Check user input against a stored code
///
/// Checks run in a fixed order: format, then expiry, then the match itself.
/// An expired code is reported as expired even when the digits are right,
/// and a missing timestamp always counts as expired.
pub fn validate(
    input: &str,
    stored: Option<&str>,
    issued_at: Option<DateTime<Utc>>,
    window: Duration,
    now: DateTime<Utc>,
) -> Result<(), VerificationError> {
    if !is_valid_code_format(input) {
        return Err(VerificationError::InvalidFormat);
    }

    if is_expired(issued_at, window, now) {
        return Err(VerificationError::Expired);
    }

    // A consumed slot keeps its timestamp but no code, so replays land here
    match stored {
        Some(code) if constant_time_eq(input.as_bytes(), code.as_bytes()) => Ok(()),
        _ => Err(VerificationError::Mismatch),
    }
}

/// Whether a new code may be issued, and if not, seconds left in the cooldown
pub fn can_resend(
    last_issued_at: Option<DateTime<Utc>>,
    cooldown: Duration,
    now: DateTime<Utc>,
) -> (bool, i64) {
    match last_issued_at {
        None => (true, 0),
        Some(last) if now - last >= cooldown => (true, 0),
        Some(last) => (false, remaining_seconds(Some(last), cooldown, now)),
    }
}
