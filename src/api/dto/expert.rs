//! DTOs for expert profile and availability endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use validator::Validate;

use crate::domain::entities::{Expert, UpdateExpert};

/// Public profile returned by `GET /api/expert/profile/{id}`.
#[derive(Debug, Serialize)]
pub struct ExpertProfileResponse {
    pub id: i64,
    pub fullname: String,
    pub email: String,
    pub specialization: Option<String>,
    pub years_of_experience: i32,
}

impl From<Expert> for ExpertProfileResponse {
    fn from(expert: Expert) -> Self {
        Self {
            id: expert.id,
            fullname: expert.fullname,
            email: expert.email,
            specialization: expert.specialization,
            years_of_experience: expert.years_of_experience,
        }
    }
}

/// Request body for `PUT /api/expert/profile/{id}`.
///
/// All fields are optional. Availability is not part of the profile and
/// unknown fields such as `availability` are ignored.
///
/// # `specialization` semantics
///
/// - **Absent** → leave existing value unchanged
/// - **`null`** → clear it
/// - **String** → set it (a blank string also clears it)
#[serde_as]
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 120, message = "Fullname must be 1-120 characters"))]
    pub fullname: Option<String>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub specialization: Option<Option<String>>,

    #[validate(range(min = 0, max = 80, message = "Years of experience must be 0-80"))]
    pub years_of_experience: Option<i32>,
}

impl From<UpdateProfileRequest> for UpdateExpert {
    fn from(req: UpdateProfileRequest) -> Self {
        UpdateExpert {
            fullname: req.fullname,
            specialization: req.specialization,
            years_of_experience: req.years_of_experience,
        }
    }
}

/// Response for a profile update.
#[derive(Debug, Serialize)]
pub struct UpdateProfileResponse {
    pub id: i64,
}

/// Request body for `PATCH /api/expert/availability/{id}`.
///
/// ```json
/// { "availability": "2026-03-01T10:00:00Z" }
/// ```
///
/// `slot` is accepted as an alias for the field name.
#[derive(Debug, Deserialize)]
pub struct ReserveSlotRequest {
    #[serde(alias = "slot")]
    pub availability: String,
}

/// Full availability of an expert, in stored order.
#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    pub expert_id: i64,
    pub availability: Vec<DateTime<Utc>>,
}
