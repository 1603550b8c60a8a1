//! Authentication service for admin API tokens.

use std::sync::Arc;

use crate::domain::repositories::{ApiToken, TokenRepository};
use crate::error::AppError;
use crate::utils::token::hash_token;
use serde_json::json;

/// Service for authenticating admin requests via Bearer tokens.
///
/// Tokens are hashed with HMAC-SHA256 (keyed by `signing_secret`) before storage
/// and comparison. Read-only access to the token table is not enough to forge
/// or verify tokens without the server-side secret.
pub struct AuthService<R: TokenRepository + ?Sized> {
    repository: Arc<R>,
    signing_secret: String,
}

impl<R: TokenRepository + ?Sized> AuthService<R> {
    /// Creates a new authentication service.
    ///
    /// # Arguments
    ///
    /// - `repository` - token repository
    /// - `signing_secret` - HMAC key; must match the value used when tokens were created
    pub fn new(repository: Arc<R>, signing_secret: String) -> Self {
        Self {
            repository,
            signing_secret,
        }
    }

    /// Authenticates a raw token against stored credentials.
    ///
    /// On success, updates the `last_used_at` timestamp. A failure to record
    /// usage does not fail authentication.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the token is unknown or revoked.
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn authenticate(&self, token: &str) -> Result<(), AppError> {
        let token_hash = hash_token(&self.signing_secret, token);

        let is_valid = self.repository.validate_token(&token_hash).await?;

        if !is_valid {
            return Err(AppError::unauthorized(
                "Unauthorized",
                json!({"reason": "Invalid or revoked token"}),
            ));
        }

        if let Err(e) = self.repository.update_last_used(&token_hash).await {
            tracing::warn!(error = %e, "Failed to record token usage");
        }

        Ok(())
    }

    /// Registers a raw token under `name` unless a token with that name exists.
    ///
    /// Used at startup to install `ADMIN_BOOTSTRAP_TOKEN`.
    ///
    /// # Returns
    ///
    /// `Some(token)` if a token was created, `None` if the name was taken.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn ensure_token(&self, name: &str, token: &str) -> Result<Option<ApiToken>, AppError> {
        if self.repository.find_by_name(name).await?.is_some() {
            return Ok(None);
        }

        let token_hash = hash_token(&self.signing_secret, token);
        let created = self.repository.create_token(name, &token_hash).await?;
        Ok(Some(created))
    }
}
