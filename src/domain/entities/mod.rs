//! Core domain entities.
//!
//! Entities follow the same split used across the service:
//! - [`Expert`] - A persisted record
//! - [`NewExpert`] - Input for onboarding
//! - [`UpdateExpert`] - Partial profile update

pub mod expert;

pub use expert::{Expert, NewExpert, UpdateExpert};
