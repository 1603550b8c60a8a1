use chrono::{DateTime, Utc};
use confidently::domain::repositories::TokenRepository;
use confidently::error::AppError;
use confidently::infrastructure::persistence::PgTokenRepository;
use sqlx::PgPool;
use std::sync::Arc;

#[sqlx::test]
async fn test_create_token(pool: PgPool) {
    let repo = PgTokenRepository::new(Arc::new(pool));

    let token = repo.create_token("test-token", "hash123").await.unwrap();

    assert_eq!(token.name, "test-token");
    assert_eq!(token.token_hash, "hash123");
    assert!(token.revoked_at.is_none());
    assert!(token.last_used_at.is_none());
}

#[sqlx::test]
async fn test_create_token_duplicate_name(pool: PgPool) {
    let repo = PgTokenRepository::new(Arc::new(pool));

    repo.create_token("dup", "hash-a").await.unwrap();
    let result = repo.create_token("dup", "hash-b").await;

    assert!(matches!(result.unwrap_err(), AppError::Conflict { .. }));
}

#[sqlx::test]
async fn test_validate_token(pool: PgPool) {
    let repo = PgTokenRepository::new(Arc::new(pool));

    repo.create_token("valid-token", "validhash").await.unwrap();

    assert!(repo.validate_token("validhash").await.unwrap());
    assert!(!repo.validate_token("nonexistent").await.unwrap());
}

#[sqlx::test]
async fn test_validate_token_revoked(pool: PgPool) {
    let repo = PgTokenRepository::new(Arc::new(pool));

    let token = repo
        .create_token("revoked-token", "revokedhash")
        .await
        .unwrap();
    repo.revoke_token(token.id).await.unwrap();

    assert!(!repo.validate_token("revokedhash").await.unwrap());
}

#[sqlx::test]
async fn test_update_last_used(pool: PgPool) {
    let repo = PgTokenRepository::new(Arc::new(pool.clone()));

    let token = repo
        .create_token("update-token", "updatehash")
        .await
        .unwrap();

    repo.update_last_used("updatehash").await.unwrap();

    let last_used: Option<DateTime<Utc>> =
        sqlx::query_scalar("SELECT last_used_at FROM api_tokens WHERE id = $1")
            .bind(token.id)
            .fetch_one(&pool)
            .await
            .unwrap();

    assert!(last_used.is_some());
}

#[sqlx::test]
async fn test_list_and_find_by_name(pool: PgPool) {
    let repo = PgTokenRepository::new(Arc::new(pool));

    repo.create_token("token1", "hash1").await.unwrap();
    repo.create_token("token2", "hash2").await.unwrap();

    let tokens = repo.list_tokens().await.unwrap();
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0].name, "token1");

    let found = repo.find_by_name("token2").await.unwrap();
    assert_eq!(found.unwrap().token_hash, "hash2");

    assert!(repo.find_by_name("missing").await.unwrap().is_none());
}

#[sqlx::test]
async fn test_revoke_already_revoked(pool: PgPool) {
    let repo = PgTokenRepository::new(Arc::new(pool));

    let token = repo
        .create_token("double-revoke", "doublehash")
        .await
        .unwrap();

    repo.revoke_token(token.id).await.unwrap();
    let result = repo.revoke_token(token.id).await;

    assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
}
