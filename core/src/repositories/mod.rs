//! Repository interfaces and their in-memory implementations.

pub mod account;
pub mod challenge;
pub mod pending_registration;

pub use account::{AccountRepository, InMemoryAccountRepository};
pub use challenge::{ChallengeStore, InMemoryChallengeStore};
pub use pending_registration::{InMemoryPendingRegistrationStore, PendingRegistrationStore};
