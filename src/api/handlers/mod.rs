//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod admin;
pub mod experts;
pub mod health;

pub use admin::{create_expert_handler, list_experts_handler, toggle_active_handler};
pub use experts::{
    get_availability_handler, get_profile_handler, reserve_slot_handler, update_profile_handler,
};
pub use health::health_handler;
