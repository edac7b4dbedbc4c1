//! Value objects representing immutable domain concepts.

pub mod challenge_status;

// Re-export commonly used types
pub use challenge_status::ChallengeStatus;
