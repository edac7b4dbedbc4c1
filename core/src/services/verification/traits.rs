//! Traits for notifier and code generator integration

use async_trait::async_trait;

use crate::domain::entities::Purpose;

use super::types::AccountNotice;

/// Trait for delivering codes and notices to an address
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver a one-time code, returning a provider message id
    async fn send_code(
        &self,
        destination: &str,
        code: &str,
        purpose: Purpose,
    ) -> Result<String, String>;

    /// Deliver an informational notice
    async fn send_notice(&self, destination: &str, notice: &AccountNotice)
        -> Result<String, String>;
}

/// Source of fresh six-digit codes
pub trait CodeGenerator: Send + Sync {
    fn generate(&self) -> String;
}
