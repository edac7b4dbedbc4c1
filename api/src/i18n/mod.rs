//! Language negotiation and success messages

use actix_web::{http::header, HttpRequest};
use pimx_shared::Language;

/// Language requested through `Accept-Language`, Persian when absent
pub fn request_language(req: &HttpRequest) -> Language {
    req.headers()
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|value| value.to_str().ok())
        .map(Language::from_accept_language)
        .unwrap_or_default()
}

/// User-facing confirmations returned with successful responses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    CodeSent,
    CodeNotDelivered,
    RegistrationCompleted,
    LoginCompleted,
    LoginCodeRequired,
    ResetCodeVerified,
    PasswordChanged,
    EmailChanged,
    SettingsUpdated,
}

impl Message {
    pub fn text(self, language: Language) -> &'static str {
        match (self, language) {
            (Message::CodeSent, Language::Persian) => "کد تأیید به ایمیل شما ارسال شد",
            (Message::CodeSent, Language::English) => "A verification code was sent to your email",
            (Message::CodeNotDelivered, Language::Persian) => {
                "ارسال ایمیل با مشکل مواجه شد. می‌توانید پس از پایان زمان انتظار کد جدید درخواست کنید"
            }
            (Message::CodeNotDelivered, Language::English) => {
                "The email could not be sent. You can request a new code once the cooldown ends"
            }
            (Message::RegistrationCompleted, Language::Persian) => "ثبت‌نام شما با موفقیت تکمیل شد",
            (Message::RegistrationCompleted, Language::English) => "Your registration is complete",
            (Message::LoginCompleted, Language::Persian) => "با موفقیت وارد شدید",
            (Message::LoginCompleted, Language::English) => "Logged in successfully",
            (Message::LoginCodeRequired, Language::Persian) => {
                "برای ورود، کد ارسال‌شده به ایمیل خود را وارد کنید"
            }
            (Message::LoginCodeRequired, Language::English) => {
                "Enter the code sent to your email to finish logging in"
            }
            (Message::ResetCodeVerified, Language::Persian) => "اکنون می‌توانید رمز عبور جدید را تعیین کنید",
            (Message::ResetCodeVerified, Language::English) => "You can now set a new password",
            (Message::PasswordChanged, Language::Persian) => "رمز عبور شما با موفقیت تغییر کرد",
            (Message::PasswordChanged, Language::English) => "Your password was changed",
            (Message::EmailChanged, Language::Persian) => "ایمیل شما با موفقیت تغییر کرد",
            (Message::EmailChanged, Language::English) => "Your email address was changed",
            (Message::SettingsUpdated, Language::Persian) => "تنظیمات ذخیره شد",
            (Message::SettingsUpdated, Language::English) => "Settings saved",
        }
    }
}
