//! Request and response bodies

pub mod requests;
pub mod responses;

pub use requests::*;
pub use responses::*;
