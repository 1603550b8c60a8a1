#![allow(dead_code)]

use axum::routing::get;
use axum::{Router, middleware};
use confidently::api::handlers::health_handler;
use confidently::api::middleware::auth;
use confidently::api::routes::{admin_routes, expert_routes};
use confidently::domain::entities::{Expert, NewExpert};
use confidently::domain::slot::SlotPolicy;
use confidently::infrastructure::persistence::{InMemoryExpertRepository, InMemoryTokenRepository};
use confidently::state::AppState;
use std::sync::Arc;

pub const TEST_SIGNING_SECRET: &str = "test-signing-secret";
pub const ADMIN_TOKEN: &str = "test-admin-token";

pub fn create_test_state() -> AppState {
    AppState::new(
        Arc::new(InMemoryExpertRepository::new()),
        Arc::new(InMemoryTokenRepository::new()),
        SlotPolicy::default(),
        8,
        TEST_SIGNING_SECRET.to_string(),
    )
}

/// All routes, minus the per-IP rate limit (test requests have no peer address).
pub fn create_test_app(state: AppState) -> Router {
    let admin = admin_routes().route_layer(middleware::from_fn_with_state(
        state.clone(),
        auth::layer,
    ));

    Router::new()
        .route("/health", get(health_handler))
        .nest("/api", expert_routes().merge(admin))
        .with_state(state)
}

pub async fn create_test_expert(state: &AppState, email: &str) -> Expert {
    state
        .expert_service
        .onboard_expert(NewExpert {
            email: email.to_string(),
            fullname: "Test Expert".to_string(),
            specialization: Some("Backend".to_string()),
            years_of_experience: 5,
        })
        .await
        .unwrap()
}

pub async fn register_admin_token(state: &AppState) {
    state
        .auth_service
        .ensure_token("test", ADMIN_TOKEN)
        .await
        .unwrap();
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}
