use chrono::{TimeZone, Utc};
use confidently::domain::entities::{NewExpert, UpdateExpert};
use confidently::domain::repositories::{CasOutcome, ExpertRepository};
use confidently::error::AppError;
use confidently::infrastructure::persistence::PgExpertRepository;
use sqlx::PgPool;
use std::sync::Arc;

fn new_expert(email: &str) -> NewExpert {
    NewExpert {
        email: email.to_string(),
        fullname: "Barbara Liskov".to_string(),
        specialization: Some("Distributed systems".to_string()),
        years_of_experience: 20,
    }
}

#[sqlx::test]
async fn test_create_and_find(pool: PgPool) {
    let repo = PgExpertRepository::new(Arc::new(pool));

    let created = repo.create(new_expert("barbara@example.com")).await.unwrap();

    assert!(created.active);
    assert!(created.availability.is_empty());
    assert_eq!(created.version, 0);

    let by_id = repo.find_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(by_id, created);

    let by_email = repo.find_by_email("barbara@example.com").await.unwrap();
    assert_eq!(by_email.unwrap().id, created.id);

    assert!(repo.find_by_id(created.id + 1).await.unwrap().is_none());
}

#[sqlx::test]
async fn test_create_duplicate_email(pool: PgPool) {
    let repo = PgExpertRepository::new(Arc::new(pool));

    repo.create(new_expert("barbara@example.com")).await.unwrap();
    let result = repo.create(new_expert("barbara@example.com")).await;

    assert!(matches!(result.unwrap_err(), AppError::Conflict { .. }));
}

#[sqlx::test]
async fn test_compare_and_swap(pool: PgPool) {
    let repo = PgExpertRepository::new(Arc::new(pool));
    let expert = repo.create(new_expert("barbara@example.com")).await.unwrap();
    let slot = Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0).unwrap();

    let outcome = repo
        .compare_and_swap_availability(expert.id, vec![slot], 0)
        .await
        .unwrap();

    let CasOutcome::Applied(stored) = outcome else {
        panic!("expected write to apply");
    };
    assert_eq!(stored.availability, vec![slot]);
    assert_eq!(stored.version, 1);

    let stale = repo
        .compare_and_swap_availability(expert.id, vec![], 0)
        .await
        .unwrap();
    assert_eq!(stale, CasOutcome::VersionConflict);

    let reloaded = repo.find_by_id(expert.id).await.unwrap().unwrap();
    assert_eq!(reloaded.availability, vec![slot]);
}

#[sqlx::test]
async fn test_compare_and_swap_unknown_expert(pool: PgPool) {
    let repo = PgExpertRepository::new(Arc::new(pool));

    let result = repo.compare_and_swap_availability(12345, vec![], 0).await;

    assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
}

#[sqlx::test]
async fn test_update_profile_and_toggle(pool: PgPool) {
    let repo = PgExpertRepository::new(Arc::new(pool));
    let expert = repo.create(new_expert("barbara@example.com")).await.unwrap();

    let updated = repo
        .update_profile(
            expert.id,
            UpdateExpert {
                specialization: Some(None),
                years_of_experience: Some(21),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.fullname, "Barbara Liskov");
    assert!(updated.specialization.is_none());
    assert_eq!(updated.years_of_experience, 21);
    assert_eq!(updated.version, expert.version);

    let toggled = repo.toggle_active(expert.id).await.unwrap();
    assert!(!toggled.active);

    assert_eq!(repo.list(Some(false)).await.unwrap().len(), 1);
    assert!(repo.list(Some(true)).await.unwrap().is_empty());
}

#[sqlx::test]
async fn test_malformed_row_is_rejected(pool: PgPool) {
    let repo = PgExpertRepository::new(Arc::new(pool.clone()));
    let expert = repo.create(new_expert("barbara@example.com")).await.unwrap();

    sqlx::query("UPDATE experts SET fullname = '' WHERE id = $1")
        .bind(expert.id)
        .execute(&pool)
        .await
        .unwrap();

    let result = repo.find_by_id(expert.id).await;

    assert!(matches!(result.unwrap_err(), AppError::Internal { .. }));
}

#[sqlx::test]
async fn test_ping(pool: PgPool) {
    let repo = PgExpertRepository::new(Arc::new(pool));

    assert!(repo.ping().await.is_ok());
}
