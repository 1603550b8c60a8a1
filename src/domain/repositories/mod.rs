//! Repository trait definitions for the domain layer.
//!
//! Traits define the storage contract; implementations live in
//! `crate::infrastructure::persistence`. Mock implementations are generated
//! via `mockall` for unit tests.
//!
//! # Available Repositories
//!
//! - [`ExpertRepository`] - Expert records and versioned availability writes
//! - [`TokenRepository`] - Admin API token authentication

pub mod expert_repository;
pub mod token_repository;

pub use expert_repository::{CasOutcome, ExpertRepository};
pub use token_repository::{ApiToken, TokenRepository};

#[cfg(test)]
pub use expert_repository::MockExpertRepository;
#[cfg(test)]
pub use token_repository::MockTokenRepository;
