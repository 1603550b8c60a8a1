//! DTOs for admin expert management.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};
use validator::Validate;

use crate::domain::entities::{Expert, NewExpert};

/// Query parameters for `GET /api/admin/experts`.
#[serde_as]
#[derive(Debug, Deserialize)]
pub struct ExpertListParams {
    /// Only experts whose `active` flag matches.
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub active: Option<bool>,
}

/// Individual expert as seen by admins.
#[derive(Debug, Serialize)]
pub struct ExpertSummary {
    pub id: i64,
    pub fullname: String,
    pub email: String,
    pub specialization: Option<String>,
    pub active: bool,
}

impl From<Expert> for ExpertSummary {
    fn from(expert: Expert) -> Self {
        Self {
            id: expert.id,
            fullname: expert.fullname,
            email: expert.email,
            specialization: expert.specialization,
            active: expert.active,
        }
    }
}

/// Response containing list of experts.
#[derive(Debug, Serialize)]
pub struct ExpertListResponse {
    pub items: Vec<ExpertSummary>,
}

/// Request body for `POST /api/admin/experts`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateExpertRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(min = 1, max = 120, message = "Fullname must be 1-120 characters"))]
    pub fullname: String,

    pub specialization: Option<String>,

    #[serde(default)]
    #[validate(range(min = 0, max = 80, message = "Years of experience must be 0-80"))]
    pub years_of_experience: i32,
}

impl From<CreateExpertRequest> for NewExpert {
    fn from(req: CreateExpertRequest) -> Self {
        NewExpert {
            email: req.email,
            fullname: req.fullname,
            specialization: req.specialization,
            years_of_experience: req.years_of_experience,
        }
    }
}

/// Expert record returned by admin mutations.
#[derive(Debug, Serialize)]
pub struct ExpertResponse {
    pub id: i64,
    pub email: String,
    pub fullname: String,
    pub specialization: Option<String>,
    pub years_of_experience: i32,
    pub active: bool,
    pub availability: Vec<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Expert> for ExpertResponse {
    fn from(expert: Expert) -> Self {
        Self {
            id: expert.id,
            email: expert.email,
            fullname: expert.fullname,
            specialization: expert.specialization,
            years_of_experience: expert.years_of_experience,
            active: expert.active,
            availability: expert.availability,
            created_at: expert.created_at,
            updated_at: expert.updated_at,
        }
    }
}
