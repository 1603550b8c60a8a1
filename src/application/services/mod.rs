//! Business logic services for the application layer.

pub mod auth_service;
pub mod availability_service;
pub mod expert_service;

pub use auth_service::AuthService;
pub use availability_service::AvailabilityService;
pub use expert_service::ExpertService;
