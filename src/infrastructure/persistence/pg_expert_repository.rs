//! PostgreSQL implementation of the expert repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Expert, NewExpert, UpdateExpert};
use crate::domain::repositories::{CasOutcome, ExpertRepository};
use crate::error::AppError;
use serde_json::json;

const EXPERT_COLUMNS: &str = "id, email, fullname, specialization, years_of_experience, \
     active, availability, version, created_at, updated_at";

/// Raw `experts` row as decoded by sqlx.
#[derive(Debug, sqlx::FromRow)]
struct ExpertRow {
    id: i64,
    email: String,
    fullname: String,
    specialization: Option<String>,
    years_of_experience: i32,
    active: bool,
    availability: Vec<DateTime<Utc>>,
    version: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ExpertRow> for Expert {
    type Error = AppError;

    fn try_from(row: ExpertRow) -> Result<Self, Self::Error> {
        let expert = Expert {
            id: row.id,
            email: row.email,
            fullname: row.fullname,
            specialization: row.specialization,
            years_of_experience: row.years_of_experience,
            active: row.active,
            availability: row.availability,
            version: row.version,
            created_at: row.created_at,
            updated_at: row.updated_at,
        };

        expert.check_record().map_err(|reason| {
            tracing::error!(expert_id = expert.id, %reason, "Malformed expert record");
            AppError::internal(
                "Malformed expert record",
                json!({ "expert_id": expert.id, "reason": reason }),
            )
        })?;

        Ok(expert)
    }
}

/// PostgreSQL repository for experts.
///
/// Availability writes are conditional on the `version` column, so the
/// read-check-write loop in the service cannot lose updates even across
/// several server instances.
pub struct PgExpertRepository {
    pool: Arc<PgPool>,
}

impl PgExpertRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    async fn exists(&self, id: i64) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM experts WHERE id = $1)")
            .bind(id)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(exists)
    }
}

#[async_trait]
impl ExpertRepository for PgExpertRepository {
    async fn create(&self, new_expert: NewExpert) -> Result<Expert, AppError> {
        let row = sqlx::query_as::<_, ExpertRow>(&format!(
            r#"
            INSERT INTO experts (email, fullname, specialization, years_of_experience)
            VALUES ($1, $2, $3, $4)
            RETURNING {EXPERT_COLUMNS}
            "#
        ))
        .bind(new_expert.email)
        .bind(new_expert.fullname)
        .bind(new_expert.specialization)
        .bind(new_expert.years_of_experience)
        .fetch_one(self.pool.as_ref())
        .await?;

        row.try_into()
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Expert>, AppError> {
        let row = sqlx::query_as::<_, ExpertRow>(&format!(
            "SELECT {EXPERT_COLUMNS} FROM experts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(Expert::try_from).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Expert>, AppError> {
        let row = sqlx::query_as::<_, ExpertRow>(&format!(
            "SELECT {EXPERT_COLUMNS} FROM experts WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(Expert::try_from).transpose()
    }

    async fn list(&self, active: Option<bool>) -> Result<Vec<Expert>, AppError> {
        let rows = sqlx::query_as::<_, ExpertRow>(&format!(
            r#"
            SELECT {EXPERT_COLUMNS}
            FROM experts
            WHERE ($1::BOOLEAN IS NULL OR active = $1)
            ORDER BY id
            "#
        ))
        .bind(active)
        .fetch_all(self.pool.as_ref())
        .await?;

        rows.into_iter().map(Expert::try_from).collect()
    }

    async fn update_profile(&self, id: i64, update: UpdateExpert) -> Result<Expert, AppError> {
        let update_specialization = update.specialization.is_some();
        let new_specialization = update.specialization.and_then(|v| v);

        let row = sqlx::query_as::<_, ExpertRow>(&format!(
            r#"
            UPDATE experts SET
                fullname            = COALESCE($2::TEXT, fullname),
                specialization      = CASE WHEN $3 THEN $4::TEXT ELSE specialization END,
                years_of_experience = COALESCE($5::INTEGER, years_of_experience),
                updated_at          = NOW()
            WHERE id = $1
            RETURNING {EXPERT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(update.fullname)
        .bind(update_specialization)
        .bind(new_specialization)
        .bind(update.years_of_experience)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(Expert::try_from)
            .transpose()?
            .ok_or_else(|| AppError::not_found("Expert not found", json!({ "expert_id": id })))
    }

    async fn toggle_active(&self, id: i64) -> Result<Expert, AppError> {
        let row = sqlx::query_as::<_, ExpertRow>(&format!(
            r#"
            UPDATE experts SET active = NOT active, updated_at = NOW()
            WHERE id = $1
            RETURNING {EXPERT_COLUMNS}
            "#
        ))
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(Expert::try_from)
            .transpose()?
            .ok_or_else(|| AppError::not_found("Expert not found", json!({ "expert_id": id })))
    }

    async fn compare_and_swap_availability(
        &self,
        id: i64,
        availability: Vec<DateTime<Utc>>,
        expected_version: i64,
    ) -> Result<CasOutcome, AppError> {
        let row = sqlx::query_as::<_, ExpertRow>(&format!(
            r#"
            UPDATE experts SET
                availability = $2,
                version      = version + 1,
                updated_at   = NOW()
            WHERE id = $1 AND version = $3
            RETURNING {EXPERT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(availability)
        .bind(expected_version)
        .fetch_optional(self.pool.as_ref())
        .await?;

        match row {
            Some(row) => Ok(CasOutcome::Applied(row.try_into()?)),
            None if self.exists(id).await? => Ok(CasOutcome::VersionConflict),
            None => Err(AppError::not_found(
                "Expert not found",
                json!({ "expert_id": id }),
            )),
        }
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }
}
