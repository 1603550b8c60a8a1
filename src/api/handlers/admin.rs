//! Handlers for admin expert management.

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::admin::{
    CreateExpertRequest, ExpertListParams, ExpertListResponse, ExpertResponse, ExpertSummary,
};
use crate::error::AppError;
use crate::state::AppState;

/// Lists experts ordered by id.
///
/// # Endpoint
///
/// `GET /api/admin/experts?active=true`
///
/// The `active` filter is optional.
pub async fn list_experts_handler(
    State(state): State<AppState>,
    Query(params): Query<ExpertListParams>,
) -> Result<Json<ExpertListResponse>, AppError> {
    let experts = state.expert_service.list_experts(params.active).await?;

    Ok(Json(ExpertListResponse {
        items: experts.into_iter().map(ExpertSummary::from).collect(),
    }))
}

/// Onboards a new expert with an empty availability set.
///
/// # Endpoint
///
/// `POST /api/admin/experts`
///
/// # Errors
///
/// Returns 400 Bad Request if the body is malformed or validation fails.
/// Returns 409 Conflict if the email is already registered.
pub async fn create_expert_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreateExpertRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ExpertResponse>), AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let expert = state.expert_service.onboard_expert(payload.into()).await?;

    Ok((StatusCode::CREATED, Json(expert.into())))
}

/// Flips the `active` flag of an expert.
///
/// # Endpoint
///
/// `POST /api/admin/experts/{id}/toggle-active`
///
/// # Errors
///
/// Returns 404 Not Found if the expert does not exist.
pub async fn toggle_active_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<ExpertResponse>, AppError> {
    let expert = state.expert_service.toggle_active(id).await?;
    Ok(Json(expert.into()))
}
