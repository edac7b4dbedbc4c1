//! Type definitions shared across crates
//!
//! - `language` - Message language selection
//! - `response` - API response wrappers

pub mod language;
pub mod response;

pub use language::Language;
pub use response::{ApiResponse, ErrorBody};
