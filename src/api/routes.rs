//! API route configuration.
//!
//! Admin endpoints require Bearer token authentication via
//! [`crate::api::middleware::auth`]. Expert endpoints trust the identity in
//! the path; authenticating experts is left to the layer in front of this
//! service.

use crate::api::handlers::{
    create_expert_handler, get_availability_handler, get_profile_handler, list_experts_handler,
    reserve_slot_handler, toggle_active_handler, update_profile_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Expert profile and availability routes.
///
/// # Endpoints
///
/// - `GET   /expert/profile/{id}`       - Public profile
/// - `PUT   /expert/profile/{id}`       - Partial profile update
/// - `GET   /expert/availability/{id}`  - Reserved slots
/// - `PATCH /expert/availability/{id}`  - Reserve a slot
pub fn expert_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/expert/profile/{id}",
            get(get_profile_handler).put(update_profile_handler),
        )
        .route(
            "/expert/availability/{id}",
            get(get_availability_handler).patch(reserve_slot_handler),
        )
}

/// Admin routes, protected by Bearer token authentication.
///
/// # Endpoints
///
/// - `GET  /admin/experts`                    - List experts (`?active=` filter)
/// - `POST /admin/experts`                    - Onboard an expert
/// - `POST /admin/experts/{id}/toggle-active` - Flip the active flag
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/admin/experts",
            get(list_experts_handler).post(create_expert_handler),
        )
        .route("/admin/experts/{id}/toggle-active", post(toggle_active_handler))
}
