//! In-memory implementation of the token repository.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::RwLock;

use crate::domain::repositories::{ApiToken, TokenRepository};
use crate::error::AppError;
use serde_json::json;

/// Process-local token store, used with the in-memory backend and in tests.
#[derive(Default)]
pub struct InMemoryTokenRepository {
    tokens: RwLock<Vec<ApiToken>>,
}

impl InMemoryTokenRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> AppError {
    AppError::internal("Token store lock poisoned", json!({}))
}

#[async_trait]
impl TokenRepository for InMemoryTokenRepository {
    async fn validate_token(&self, token_hash: &str) -> Result<bool, AppError> {
        let tokens = self.tokens.read().map_err(|_| poisoned())?;
        Ok(tokens
            .iter()
            .any(|t| t.token_hash == token_hash && t.revoked_at.is_none()))
    }

    async fn update_last_used(&self, token_hash: &str) -> Result<(), AppError> {
        let mut tokens = self.tokens.write().map_err(|_| poisoned())?;
        if let Some(token) = tokens
            .iter_mut()
            .find(|t| t.token_hash == token_hash && t.revoked_at.is_none())
        {
            token.last_used_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn create_token(&self, name: &str, token_hash: &str) -> Result<ApiToken, AppError> {
        let mut tokens = self.tokens.write().map_err(|_| poisoned())?;

        if tokens
            .iter()
            .any(|t| t.name == name || t.token_hash == token_hash)
        {
            return Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": "api_tokens_name_key" }),
            ));
        }

        let token = ApiToken {
            id: tokens.len() as i64 + 1,
            name: name.to_string(),
            token_hash: token_hash.to_string(),
            created_at: Utc::now(),
            last_used_at: None,
            revoked_at: None,
        };
        tokens.push(token.clone());

        Ok(token)
    }

    async fn list_tokens(&self) -> Result<Vec<ApiToken>, AppError> {
        let tokens = self.tokens.read().map_err(|_| poisoned())?;
        Ok(tokens.clone())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<ApiToken>, AppError> {
        let tokens = self.tokens.read().map_err(|_| poisoned())?;
        Ok(tokens.iter().find(|t| t.name == name).cloned())
    }

    async fn revoke_token(&self, id: i64) -> Result<(), AppError> {
        let mut tokens = self.tokens.write().map_err(|_| poisoned())?;

        match tokens
            .iter_mut()
            .find(|t| t.id == id && t.revoked_at.is_none())
        {
            Some(token) => {
                token.revoked_at = Some(Utc::now());
                Ok(())
            }
            None => Err(AppError::not_found(
                "Token not found or already revoked",
                json!({ "id": id }),
            )),
        }
    }
}
