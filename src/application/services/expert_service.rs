//! Expert profile and onboarding service.

use std::sync::Arc;

use crate::domain::entities::{Expert, NewExpert, UpdateExpert};
use crate::domain::repositories::ExpertRepository;
use crate::error::AppError;
use crate::utils::email::normalize_email;
use serde_json::json;

/// Upper bound for `years_of_experience`.
pub const MAX_YEARS_OF_EXPERIENCE: i32 = 80;

/// Service for expert profiles and admin-side expert management.
///
/// Availability is deliberately absent here: it is only changed through
/// [`crate::application::services::AvailabilityService`].
pub struct ExpertService<R: ExpertRepository + ?Sized> {
    repository: Arc<R>,
}

impl<R: ExpertRepository + ?Sized> ExpertService<R> {
    /// Creates a new expert service.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Onboards a new expert with an empty availability set.
    ///
    /// The email is trimmed and lowercased before the uniqueness check.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if a field is invalid.
    /// Returns [`AppError::Conflict`] if the email is already registered.
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn onboard_expert(&self, mut new_expert: NewExpert) -> Result<Expert, AppError> {
        new_expert.email = normalize_email(&new_expert.email);
        new_expert.fullname = new_expert.fullname.trim().to_string();
        new_expert.specialization = normalize_optional(new_expert.specialization);

        if !new_expert.email.contains('@') {
            return Err(AppError::bad_request(
                "Invalid email address",
                json!({ "email": new_expert.email }),
            ));
        }
        validate_fullname(&new_expert.fullname)?;
        validate_years(new_expert.years_of_experience)?;

        if self
            .repository
            .find_by_email(&new_expert.email)
            .await?
            .is_some()
        {
            return Err(AppError::conflict(
                "Expert already exists",
                json!({ "email": new_expert.email }),
            ));
        }

        let expert = self.repository.create(new_expert).await?;
        tracing::info!(expert_id = expert.id, "Expert onboarded");
        Ok(expert)
    }

    /// Retrieves an expert by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the expert does not exist.
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn get_expert(&self, expert_id: i64) -> Result<Expert, AppError> {
        self.repository
            .find_by_id(expert_id)
            .await?
            .ok_or_else(|| AppError::not_found("Expert not found", json!({ "expert_id": expert_id })))
    }

    /// Applies a partial profile update.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the update is empty or a field is invalid.
    /// Returns [`AppError::NotFound`] if the expert does not exist.
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn update_profile(
        &self,
        expert_id: i64,
        mut update: UpdateExpert,
    ) -> Result<Expert, AppError> {
        if update.is_empty() {
            return Err(AppError::bad_request(
                "Nothing to update",
                json!({ "fields": ["fullname", "specialization", "years_of_experience"] }),
            ));
        }

        if let Some(fullname) = update.fullname.as_mut() {
            *fullname = fullname.trim().to_string();
            validate_fullname(fullname)?;
        }
        if let Some(specialization) = update.specialization.take() {
            update.specialization = Some(normalize_optional(specialization));
        }
        if let Some(years) = update.years_of_experience {
            validate_years(years)?;
        }

        self.repository.update_profile(expert_id, update).await
    }

    /// Lists experts, optionally filtered by the active flag.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn list_experts(&self, active: Option<bool>) -> Result<Vec<Expert>, AppError> {
        self.repository.list(active).await
    }

    /// Flips an expert's active flag.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the expert does not exist.
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn toggle_active(&self, expert_id: i64) -> Result<Expert, AppError> {
        let expert = self.repository.toggle_active(expert_id).await?;
        tracing::info!(expert_id, active = expert.active, "Expert active flag toggled");
        Ok(expert)
    }

    /// Checks store connectivity.
    ///
    /// # Errors
    ///
    /// Returns the store error if it cannot be reached.
    pub async fn health_check(&self) -> Result<(), AppError> {
        self.repository.ping().await
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn validate_fullname(fullname: &str) -> Result<(), AppError> {
    if fullname.is_empty() || fullname.chars().count() > 120 {
        return Err(AppError::bad_request(
            "Invalid fullname length",
            json!({ "min": 1, "max": 120 }),
        ));
    }
    Ok(())
}

fn validate_years(years: i32) -> Result<(), AppError> {
    if !(0..=MAX_YEARS_OF_EXPERIENCE).contains(&years) {
        return Err(AppError::bad_request(
            "Invalid years of experience",
            json!({ "min": 0, "max": MAX_YEARS_OF_EXPERIENCE, "got": years }),
        ));
    }
    Ok(())
}
