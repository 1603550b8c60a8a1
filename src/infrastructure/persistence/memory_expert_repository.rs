//! In-memory implementation of the expert repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::RwLock;

use crate::domain::entities::{Expert, NewExpert, UpdateExpert};
use crate::domain::repositories::{CasOutcome, ExpertRepository};
use crate::error::AppError;
use serde_json::json;

#[derive(Default)]
struct Records {
    next_id: i64,
    experts: HashMap<i64, Expert>,
}

/// Process-local expert store.
///
/// Every operation takes the lock once and never across an `.await`, so the
/// version check and the write of [`ExpertRepository::compare_and_swap_availability`]
/// happen under the same guard.
#[derive(Default)]
pub struct InMemoryExpertRepository {
    records: RwLock<Records>,
}

impl InMemoryExpertRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> AppError {
    AppError::internal("Expert store lock poisoned", json!({}))
}

fn not_found(id: i64) -> AppError {
    AppError::not_found("Expert not found", json!({ "expert_id": id }))
}

#[async_trait]
impl ExpertRepository for InMemoryExpertRepository {
    async fn create(&self, new_expert: NewExpert) -> Result<Expert, AppError> {
        let mut records = self.records.write().map_err(|_| poisoned())?;

        if records
            .experts
            .values()
            .any(|e| e.email == new_expert.email)
        {
            return Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": "experts_email_key" }),
            ));
        }

        records.next_id += 1;
        let now = Utc::now();
        let expert = Expert {
            id: records.next_id,
            email: new_expert.email,
            fullname: new_expert.fullname,
            specialization: new_expert.specialization,
            years_of_experience: new_expert.years_of_experience,
            active: true,
            availability: Vec::new(),
            version: 0,
            created_at: now,
            updated_at: now,
        };

        records.experts.insert(expert.id, expert.clone());
        Ok(expert)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Expert>, AppError> {
        let records = self.records.read().map_err(|_| poisoned())?;
        Ok(records.experts.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Expert>, AppError> {
        let records = self.records.read().map_err(|_| poisoned())?;
        Ok(records
            .experts
            .values()
            .find(|e| e.email == email)
            .cloned())
    }

    async fn list(&self, active: Option<bool>) -> Result<Vec<Expert>, AppError> {
        let records = self.records.read().map_err(|_| poisoned())?;

        let mut experts: Vec<Expert> = records
            .experts
            .values()
            .filter(|e| active.is_none_or(|flag| e.active == flag))
            .cloned()
            .collect();
        experts.sort_by_key(|e| e.id);

        Ok(experts)
    }

    async fn update_profile(&self, id: i64, update: UpdateExpert) -> Result<Expert, AppError> {
        let mut records = self.records.write().map_err(|_| poisoned())?;
        let expert = records.experts.get_mut(&id).ok_or_else(|| not_found(id))?;

        if let Some(fullname) = update.fullname {
            expert.fullname = fullname;
        }
        if let Some(specialization) = update.specialization {
            expert.specialization = specialization;
        }
        if let Some(years) = update.years_of_experience {
            expert.years_of_experience = years;
        }
        expert.updated_at = Utc::now();

        Ok(expert.clone())
    }

    async fn toggle_active(&self, id: i64) -> Result<Expert, AppError> {
        let mut records = self.records.write().map_err(|_| poisoned())?;
        let expert = records.experts.get_mut(&id).ok_or_else(|| not_found(id))?;

        expert.active = !expert.active;
        expert.updated_at = Utc::now();

        Ok(expert.clone())
    }

    async fn compare_and_swap_availability(
        &self,
        id: i64,
        availability: Vec<DateTime<Utc>>,
        expected_version: i64,
    ) -> Result<CasOutcome, AppError> {
        let mut records = self.records.write().map_err(|_| poisoned())?;
        let expert = records.experts.get_mut(&id).ok_or_else(|| not_found(id))?;

        if expert.version != expected_version {
            return Ok(CasOutcome::VersionConflict);
        }

        expert.availability = availability;
        expert.version += 1;
        expert.updated_at = Utc::now();

        Ok(CasOutcome::Applied(expert.clone()))
    }

    async fn ping(&self) -> Result<(), AppError> {
        drop(self.records.read().map_err(|_| poisoned())?);
        Ok(())
    }
}
