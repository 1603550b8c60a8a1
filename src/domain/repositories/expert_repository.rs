//! Repository trait for expert records.

use crate::domain::entities::{Expert, NewExpert, UpdateExpert};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Result of a conditional availability write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CasOutcome {
    /// The write was applied; carries the record with its new version.
    Applied(Expert),
    /// The record changed since it was read. Nothing was written.
    VersionConflict,
}

/// Repository interface for experts.
///
/// Availability is never written unconditionally: every write names the
/// version it was computed from and is rejected if that version is stale.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgExpertRepository`] - PostgreSQL
/// - [`crate::infrastructure::persistence::InMemoryExpertRepository`] - process-local
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExpertRepository: Send + Sync {
    /// Creates a new expert with an empty availability set and version 0.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the email is already registered.
    /// Returns [`AppError::Internal`] on storage errors.
    async fn create(&self, new_expert: NewExpert) -> Result<Expert, AppError>;

    /// Finds an expert by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors or malformed records.
    async fn find_by_id(&self, id: i64) -> Result<Option<Expert>, AppError>;

    /// Finds an expert by email (exact match on the normalized address).
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn find_by_email(&self, email: &str) -> Result<Option<Expert>, AppError>;

    /// Lists experts ordered by id, optionally filtered by the active flag.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn list(&self, active: Option<bool>) -> Result<Vec<Expert>, AppError>;

    /// Applies a partial profile update. Does not touch availability or version.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the expert does not exist.
    /// Returns [`AppError::Internal`] on storage errors.
    async fn update_profile(&self, id: i64, update: UpdateExpert) -> Result<Expert, AppError>;

    /// Flips the `active` flag and returns the updated record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the expert does not exist.
    /// Returns [`AppError::Internal`] on storage errors.
    async fn toggle_active(&self, id: i64) -> Result<Expert, AppError>;

    /// Replaces the availability set if the stored version equals
    /// `expected_version`, incrementing the version in the same write.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the expert does not exist.
    /// Returns [`AppError::Unavailable`] or [`AppError::Internal`] on storage
    /// errors; in that case nothing was written.
    async fn compare_and_swap_availability(
        &self,
        id: i64,
        availability: Vec<DateTime<Utc>>,
        expected_version: i64,
    ) -> Result<CasOutcome, AppError>;

    /// Checks that the store is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unavailable`] if the store cannot be reached.
    async fn ping(&self) -> Result<(), AppError>;
}
