//! Expert entity representing a bookable interview expert.

use chrono::{DateTime, Utc};

/// An expert account with a reservable availability set.
///
/// `availability` holds slot start instants in insertion order. It is only
/// ever extended through
/// [`ExpertRepository::compare_and_swap_availability`](crate::domain::repositories::ExpertRepository::compare_and_swap_availability),
/// and `version` is bumped on every such write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expert {
    pub id: i64,
    pub email: String,
    pub fullname: String,
    pub specialization: Option<String>,
    pub years_of_experience: i32,
    pub active: bool,
    pub availability: Vec<DateTime<Utc>>,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Expert {
    /// Checks the record shape before it leaves the store boundary.
    ///
    /// # Errors
    ///
    /// Returns a description of the first malformed field.
    pub fn check_record(&self) -> Result<(), String> {
        if self.id <= 0 {
            return Err(format!("id must be positive, got {}", self.id));
        }
        if self.email.trim().is_empty() {
            return Err("email is empty".to_string());
        }
        if self.fullname.trim().is_empty() {
            return Err("fullname is empty".to_string());
        }
        if self.years_of_experience < 0 {
            return Err(format!(
                "years_of_experience is negative: {}",
                self.years_of_experience
            ));
        }
        if self.version < 0 {
            return Err(format!("version is negative: {}", self.version));
        }

        Ok(())
    }
}

/// Input data for onboarding a new expert.
///
/// New experts start active with an empty availability set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExpert {
    pub email: String,
    pub fullname: String,
    pub specialization: Option<String>,
    pub years_of_experience: i32,
}

/// Partial profile update.
///
/// `None` leaves a field unchanged. For `specialization`, `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateExpert {
    pub fullname: Option<String>,
    pub specialization: Option<Option<String>>,
    pub years_of_experience: Option<i32>,
}

impl UpdateExpert {
    pub fn is_empty(&self) -> bool {
        self.fullname.is_none()
            && self.specialization.is_none()
            && self.years_of_experience.is_none()
    }
}
