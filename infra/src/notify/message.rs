//! Email content for codes and notices

use pimx_core::domain::entities::Purpose;
use pimx_core::services::AccountNotice;
use pimx_shared::config::NotifierConfig;

/// A rendered email
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

fn purpose_subject(purpose: Purpose) -> &'static str {
    match purpose {
        Purpose::Registration => "کد تأیید ثبت‌نام",
        Purpose::LoginTwoFactor => "کد ورود دو مرحله‌ای",
        Purpose::PasswordReset => "کد بازیابی رمز عبور",
        Purpose::EmailChange => "کد تأیید ایمیل جدید",
    }
}

/// Compose the email carrying a one-time code
pub fn compose_code_message(
    config: &NotifierConfig,
    destination: &str,
    code: &str,
    purpose: Purpose,
) -> EmailMessage {
    EmailMessage {
        from: config.from_address.clone(),
        to: destination.to_string(),
        subject: format!("{} - {}", config.product_name, purpose_subject(purpose)),
        body: format!(
            "کد تأیید شما: {code}\nYour verification code: {code}\n\n\
             اگر این درخواست را شما ارسال نکرده‌اید، این ایمیل را نادیده بگیرید.\n\
             If you did not request this, ignore this email."
        ),
    }
}

/// Compose an informational account notice
pub fn compose_notice_message(
    config: &NotifierConfig,
    destination: &str,
    notice: &AccountNotice,
) -> EmailMessage {
    let (subject, body) = match notice {
        AccountNotice::PasswordChanged { username } => (
            "رمز عبور تغییر کرد",
            format!(
                "{username} عزیز، رمز عبور حساب شما تغییر کرد.\n\
                 Dear {username}, your account password was changed."
            ),
        ),
        AccountNotice::EmailChanged {
            username,
            new_email,
        } => (
            "ایمیل حساب تغییر کرد",
            format!(
                "{username} عزیز، ایمیل حساب شما به {new_email} تغییر کرد.\n\
                 Dear {username}, your account email was changed to {new_email}."
            ),
        ),
        AccountNotice::NewLogin {
            username,
            login_count,
            at,
        } => {
            let when = at.format("%H:%M:%S %d-%m-%Y");
            (
                "ورود جدید به حساب شما",
                format!(
                    "{username} عزیز، ورود جدیدی به حساب شما در {when} (UTC) ثبت شد. \
                     تعداد ورودها: {login_count}\n\
                     Dear {username}, a new login to your account was recorded at {when} (UTC). \
                     Login count: {login_count}\n\n\
                     اگر این ورود توسط شما نبوده، رمز عبور خود را تغییر دهید.\n\
                     If this was not you, change your password."
                ),
            )
        }
    };

    EmailMessage {
        from: config.from_address.clone(),
        to: destination.to_string(),
        subject: format!("{} - {}", config.product_name, subject),
        body,
    }
}
