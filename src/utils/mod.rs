//! Utility functions shared by the server and the admin CLI.
//!
//! - [`token`] - Admin API token generation and HMAC hashing
//! - [`email`] - Email address normalization

pub mod email;
pub mod token;
