//! Domain layer containing business entities and rules.
//!
//! Nothing in here depends on HTTP or on a concrete database. The
//! infrastructure layer implements the repository traits, the application
//! layer orchestrates them.
//!
//! # Architecture
//!
//! - [`entities`] - Expert records and their create/update inputs
//! - [`repositories`] - Data access trait definitions
//! - [`slot`] - Slot parsing and the minimum-separation rule
//!
//! # Reservation Flow
//!
//! 1. HTTP handler receives a candidate slot string
//! 2. [`slot::parse_slot`] turns it into a UTC instant
//! 3. [`crate::application::services::AvailabilityService`] loads the expert,
//!    applies [`slot::SlotPolicy::admit`] and writes the result back through
//!    [`repositories::ExpertRepository::compare_and_swap_availability`]

pub mod entities;
pub mod repositories;
pub mod slot;
