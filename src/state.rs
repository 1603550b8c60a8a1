//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::{AuthService, AvailabilityService, ExpertService};
use crate::domain::repositories::{ExpertRepository, TokenRepository};
use crate::domain::slot::SlotPolicy;

/// Services shared across requests.
///
/// Cloning is cheap: every field is an [`Arc`].
#[derive(Clone)]
pub struct AppState {
    pub expert_service: Arc<ExpertService<dyn ExpertRepository>>,
    pub availability_service: Arc<AvailabilityService<dyn ExpertRepository>>,
    pub auth_service: Arc<AuthService<dyn TokenRepository>>,
}

impl AppState {
    /// Wires services on top of the given repositories.
    pub fn new(
        expert_repository: Arc<dyn ExpertRepository>,
        token_repository: Arc<dyn TokenRepository>,
        policy: SlotPolicy,
        max_attempts: usize,
        token_signing_secret: String,
    ) -> Self {
        Self {
            expert_service: Arc::new(ExpertService::new(expert_repository.clone())),
            availability_service: Arc::new(AvailabilityService::new(
                expert_repository,
                policy,
                max_attempts,
            )),
            auth_service: Arc::new(AuthService::new(token_repository, token_signing_secret)),
        }
    }
}
