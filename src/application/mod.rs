//! Application layer services implementing business logic.
//!
//! Services consume repository traits and provide the API used by HTTP
//! handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::availability_service::AvailabilityService`] - Slot reservation
//! - [`services::expert_service::ExpertService`] - Expert profiles and onboarding
//! - [`services::auth_service::AuthService`] - Admin API token authentication

pub mod services;
