//! Handlers for expert profile and availability endpoints.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use validator::Validate;

use crate::api::dto::expert::{
    AvailabilityResponse, ExpertProfileResponse, ReserveSlotRequest, UpdateProfileRequest,
    UpdateProfileResponse,
};
use crate::error::AppError;
use crate::state::AppState;

/// Returns the public profile of an expert.
///
/// # Endpoint
///
/// `GET /api/expert/profile/{id}`
///
/// # Errors
///
/// Returns 404 Not Found if the expert does not exist.
pub async fn get_profile_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<ExpertProfileResponse>, AppError> {
    let expert = state.expert_service.get_expert(id).await?;
    Ok(Json(expert.into()))
}

/// Partially updates an expert profile.
///
/// # Endpoint
///
/// `PUT /api/expert/profile/{id}`
///
/// # Request Body
///
/// ```json
/// {
///   "fullname": "Ada Lovelace",
///   "specialization": "Algorithms",   // null to clear
///   "years_of_experience": 7
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if validation fails or no field is given.
/// Returns 404 Not Found if the expert does not exist.
pub async fn update_profile_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    payload: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> Result<Json<UpdateProfileResponse>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let expert = state
        .expert_service
        .update_profile(id, payload.into())
        .await?;

    Ok(Json(UpdateProfileResponse { id: expert.id }))
}

/// Returns the reserved slots of an expert in stored order.
///
/// # Endpoint
///
/// `GET /api/expert/availability/{id}`
pub async fn get_availability_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    let availability = state.availability_service.list_availability(id).await?;

    Ok(Json(AvailabilityResponse {
        expert_id: id,
        availability,
    }))
}

/// Reserves a new availability slot.
///
/// # Endpoint
///
/// `PATCH /api/expert/availability/{id}`
///
/// # Request Body
///
/// ```json
/// { "availability": "2026-03-01T10:00:00Z" }
/// ```
///
/// # Response Codes
///
/// - **200 OK**: slot admitted, body holds the full updated availability
/// - **400 Bad Request**: body is not JSON, the slot field is missing or not
///   a string, or the slot does not parse
/// - **404 Not Found**: expert does not exist
/// - **409 Conflict**: a stored slot is closer than the minimum separation
/// - **503 Service Unavailable**: store fault or persistent write contention
pub async fn reserve_slot_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    payload: Result<Json<ReserveSlotRequest>, JsonRejection>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    let Json(payload) = payload?;

    let availability = state
        .availability_service
        .reserve_raw_slot(id, &payload.availability)
        .await?;

    Ok(Json(AvailabilityResponse {
        expert_id: id,
        availability,
    }))
}
