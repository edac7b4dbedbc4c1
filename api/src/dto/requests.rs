use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use pimx_core::services::RegisterRequest as RegisterCommand;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1, max = 150))]
    pub username: String,

    #[validate(range(min = 1, max = 150))]
    pub age: Option<u32>,

    #[validate(length(min = 1, max = 128))]
    pub password: String,

    pub password_confirmation: String,
}

impl From<RegisterRequest> for RegisterCommand {
    fn from(request: RegisterRequest) -> Self {
        Self {
            email: request.email,
            username: request.username,
            age: request.age,
            password: request.password,
            password_confirmation: request.password_confirmation,
        }
    }
}

/// Code typed by the user; format is checked by the verification manager
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyCodeRequest {
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 254))]
    pub email: String,

    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PasswordResetRequest {
    #[validate(email)]
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CompletePasswordResetRequest {
    /// Grant returned by the reset code verification
    pub grant_token: Uuid,

    #[validate(length(min = 1, max = 128))]
    pub password: String,

    pub password_confirmation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EmailChangeRequest {
    #[validate(email)]
    pub new_email: String,
}

/// Partial settings update; absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsRequest {
    pub two_factor_enabled: Option<bool>,
    pub login_notifications_enabled: Option<bool>,
}
