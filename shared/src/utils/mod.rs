//! Common utility functions

pub mod email;
pub mod validation;

pub use email::{is_valid_email, mask_email, normalize_email};
pub use validation::{is_valid_code_format, CODE_LENGTH};
