//! Email address normalization.

/// Normalizes an email address for storage and lookup.
///
/// Trims surrounding whitespace and lowercases the whole address.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
