//! Slot reservation service.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio_retry::RetryIf;
use tokio_retry::strategy::{ExponentialBackoff, jitter};

use crate::domain::repositories::{CasOutcome, ExpertRepository};
use crate::domain::slot::{ReservationError, SlotPolicy, parse_slot};
use crate::error::AppError;
use serde_json::json;

/// Default number of read-check-write attempts per reservation.
pub const DEFAULT_MAX_ATTEMPTS: usize = 8;

/// Why a single reservation attempt did not commit.
#[derive(Debug)]
enum AttemptError {
    /// Another writer bumped the version between our read and our write.
    Contended,
    Failed(ReservationError),
}

/// Admits or rejects availability slots for experts.
///
/// Each reservation is an optimistic read-check-write loop:
///
/// 1. Load the expert and its availability `version`
/// 2. Apply [`SlotPolicy::admit`] to the loaded set
/// 3. Write the appended set conditional on `version` being unchanged
/// 4. On a version conflict, back off briefly and start over from 1
///
/// Two reservations for the same expert therefore behave as if serialized;
/// reservations for different experts never wait on each other.
pub struct AvailabilityService<R: ExpertRepository + ?Sized> {
    repository: Arc<R>,
    policy: SlotPolicy,
    max_attempts: usize,
}

impl<R: ExpertRepository + ?Sized> AvailabilityService<R> {
    /// Creates a new availability service.
    ///
    /// `max_attempts` is clamped to at least one.
    pub fn new(repository: Arc<R>, policy: SlotPolicy, max_attempts: usize) -> Self {
        Self {
            repository,
            policy,
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn policy(&self) -> SlotPolicy {
        self.policy
    }

    /// Returns the stored availability of an expert in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the expert does not exist.
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn list_availability(&self, expert_id: i64) -> Result<Vec<DateTime<Utc>>, AppError> {
        self.repository
            .find_by_id(expert_id)
            .await?
            .map(|expert| expert.availability)
            .ok_or_else(|| AppError::not_found("Expert not found", json!({ "expert_id": expert_id })))
    }

    /// Parses `raw_slot` and reserves it.
    ///
    /// The input is validated before the store is touched.
    ///
    /// # Errors
    ///
    /// See [`Self::reserve_slot`]; additionally returns
    /// [`ReservationError::InvalidInput`] if `raw_slot` does not parse.
    pub async fn reserve_raw_slot(
        &self,
        expert_id: i64,
        raw_slot: &str,
    ) -> Result<Vec<DateTime<Utc>>, ReservationError> {
        let candidate = parse_slot(raw_slot).inspect_err(|_| {
            metrics::counter!("slot_reservations_total", "outcome" => "invalid").increment(1);
        })?;
        self.reserve_slot(expert_id, candidate).await
    }

    /// Reserves `candidate` for an expert and returns the full updated set.
    ///
    /// # Errors
    ///
    /// - [`ReservationError::NotFound`] if the expert does not exist
    /// - [`ReservationError::Conflict`] if a stored slot is closer than the
    ///   minimum separation; nothing is written
    /// - [`ReservationError::Contended`] if every attempt lost a version race
    /// - [`ReservationError::Storage`] on storage faults; nothing is written
    pub async fn reserve_slot(
        &self,
        expert_id: i64,
        candidate: DateTime<Utc>,
    ) -> Result<Vec<DateTime<Utc>>, ReservationError> {
        let strategy = ExponentialBackoff::from_millis(2)
            .max_delay(Duration::from_millis(50))
            .map(jitter)
            .take(self.max_attempts - 1);

        let mut attempt = 0usize;
        let result = RetryIf::start(
            strategy,
            move || {
                attempt += 1;
                self.try_reserve(expert_id, candidate, attempt)
            },
            |e: &AttemptError| matches!(e, AttemptError::Contended),
        )
        .await;

        match result {
            Ok(availability) => {
                metrics::counter!("slot_reservations_total", "outcome" => "admitted").increment(1);
                tracing::info!(expert_id, slot = %candidate, "Slot reserved");
                Ok(availability)
            }
            Err(AttemptError::Contended) => {
                metrics::counter!("slot_reservations_total", "outcome" => "contended")
                    .increment(1);
                tracing::warn!(
                    expert_id,
                    slot = %candidate,
                    attempts = self.max_attempts,
                    "Gave up reserving slot under contention"
                );
                Err(ReservationError::Contended {
                    expert_id,
                    attempts: self.max_attempts,
                })
            }
            Err(AttemptError::Failed(e)) => {
                let outcome = match &e {
                    ReservationError::Conflict { .. } => "conflict",
                    ReservationError::NotFound { .. } => "not_found",
                    _ => "error",
                };
                metrics::counter!("slot_reservations_total", "outcome" => outcome).increment(1);
                Err(e)
            }
        }
    }

    /// One read-check-write cycle.
    async fn try_reserve(
        &self,
        expert_id: i64,
        candidate: DateTime<Utc>,
        attempt: usize,
    ) -> Result<Vec<DateTime<Utc>>, AttemptError> {
        let expert = self
            .repository
            .find_by_id(expert_id)
            .await
            .map_err(|e| AttemptError::Failed(storage_error(expert_id, e)))?
            .ok_or(AttemptError::Failed(ReservationError::NotFound { expert_id }))?;

        if !self.policy.is_well_separated(&expert.availability) {
            tracing::warn!(
                expert_id,
                "Stored availability violates the current minimum separation"
            );
        }

        let updated = self.policy.admit(&expert.availability, candidate).map_err(|existing| {
            tracing::info!(
                expert_id,
                slot = %candidate,
                conflicts_with = %existing,
                "Slot rejected"
            );
            AttemptError::Failed(ReservationError::Conflict {
                candidate,
                conflicts_with: existing,
            })
        })?;

        let outcome = self
            .repository
            .compare_and_swap_availability(expert_id, updated, expert.version)
            .await
            .map_err(|e| AttemptError::Failed(storage_error(expert_id, e)))?;

        match outcome {
            CasOutcome::Applied(stored) => Ok(stored.availability),
            CasOutcome::VersionConflict => {
                tracing::debug!(
                    expert_id,
                    attempt,
                    version = expert.version,
                    "Availability changed concurrently, retrying"
                );
                Err(AttemptError::Contended)
            }
        }
    }
}

/// Keeps a missing expert typed as `NotFound` even when the store reports it.
fn storage_error(expert_id: i64, e: AppError) -> ReservationError {
    match e {
        AppError::NotFound { .. } => ReservationError::NotFound { expert_id },
        other => {
            tracing::error!(expert_id, error = %other, "Storage failure during reservation");
            ReservationError::Storage(other)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Expert;
    use crate::domain::repositories::MockExpertRepository;
    use chrono::{TimeDelta, TimeZone};
    use mockall::Sequence;

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0).unwrap()
    }

    fn create_test_expert(id: i64, availability: Vec<DateTime<Utc>>, version: i64) -> Expert {
        let now = Utc::now();
        Expert {
            id,
            email: format!("expert{id}@example.com"),
            fullname: "Test Expert".to_string(),
            specialization: None,
            years_of_experience: 3,
            active: true,
            availability,
            version,
            created_at: now,
            updated_at: now,
        }
    }

    fn service(repo: MockExpertRepository) -> AvailabilityService<MockExpertRepository> {
        AvailabilityService::new(Arc::new(repo), SlotPolicy::default(), DEFAULT_MAX_ATTEMPTS)
    }

    #[tokio::test]
    async fn test_reserve_slot_admits_and_writes_once() {
        let mut mock_repo = MockExpertRepository::new();
        let existing = base();
        let candidate = base() + TimeDelta::minutes(61);

        let expert = create_test_expert(1, vec![existing], 4);
        mock_repo
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(expert.clone())));

        mock_repo
            .expect_compare_and_swap_availability()
            .withf(move |id, availability, version| {
                *id == 1 && availability == &vec![existing, candidate] && *version == 4
            })
            .times(1)
            .returning(|id, availability, _| {
                Ok(CasOutcome::Applied(create_test_expert(id, availability, 5)))
            });

        let result = service(mock_repo).reserve_slot(1, candidate).await.unwrap();

        assert_eq!(result, vec![existing, candidate]);
    }

    #[tokio::test]
    async fn test_reserve_slot_conflict_performs_no_write() {
        let mut mock_repo = MockExpertRepository::new();

        let expert = create_test_expert(1, vec![base()], 1);
        mock_repo
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(expert.clone())));

        mock_repo.expect_compare_and_swap_availability().times(0);

        let result = service(mock_repo)
            .reserve_slot(1, base() + TimeDelta::minutes(30))
            .await;

        match result.unwrap_err() {
            ReservationError::Conflict {
                candidate,
                conflicts_with,
            } => {
                assert_eq!(candidate, base() + TimeDelta::minutes(30));
                assert_eq!(conflicts_with, base());
            }
            other => panic!("expected conflict, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_reserve_slot_unknown_expert() {
        let mut mock_repo = MockExpertRepository::new();

        mock_repo
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(None));

        mock_repo.expect_compare_and_swap_availability().times(0);

        let result = service(mock_repo).reserve_slot(42, base()).await;

        assert!(matches!(
            result.unwrap_err(),
            ReservationError::NotFound { expert_id: 42 }
        ));
    }

    #[tokio::test]
    async fn test_reserve_slot_retries_after_version_conflict() {
        let mut mock_repo = MockExpertRepository::new();
        let mut seq = Sequence::new();
        let candidate = base() + TimeDelta::hours(3);

        let stale = create_test_expert(1, vec![], 0);
        mock_repo
            .expect_find_by_id()
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |_| Ok(Some(stale.clone())));

        mock_repo
            .expect_compare_and_swap_availability()
            .withf(|_, _, version| *version == 0)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(CasOutcome::VersionConflict));

        let fresh = create_test_expert(1, vec![base()], 1);
        mock_repo
            .expect_find_by_id()
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |_| Ok(Some(fresh.clone())));

        mock_repo
            .expect_compare_and_swap_availability()
            .withf(|_, availability, version| *version == 1 && availability.len() == 2)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|id, availability, _| {
                Ok(CasOutcome::Applied(create_test_expert(id, availability, 2)))
            });

        let result = service(mock_repo).reserve_slot(1, candidate).await.unwrap();

        assert_eq!(result, vec![base(), candidate]);
    }

    #[tokio::test]
    async fn test_reserve_slot_retry_observes_conflicting_commit() {
        let mut mock_repo = MockExpertRepository::new();
        let mut seq = Sequence::new();
        let candidate = base() + TimeDelta::minutes(10);

        let stale = create_test_expert(1, vec![], 0);
        mock_repo
            .expect_find_by_id()
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |_| Ok(Some(stale.clone())));

        mock_repo
            .expect_compare_and_swap_availability()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(CasOutcome::VersionConflict));

        let fresh = create_test_expert(1, vec![base()], 1);
        mock_repo
            .expect_find_by_id()
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |_| Ok(Some(fresh.clone())));

        let result = service(mock_repo).reserve_slot(1, candidate).await;

        assert!(matches!(
            result.unwrap_err(),
            ReservationError::Conflict { .. }
        ));
    }

    #[tokio::test]
    async fn test_reserve_slot_gives_up_after_max_attempts() {
        let mut mock_repo = MockExpertRepository::new();

        mock_repo
            .expect_find_by_id()
            .times(3)
            .returning(|_| Ok(Some(create_test_expert(1, vec![], 0))));

        mock_repo
            .expect_compare_and_swap_availability()
            .times(3)
            .returning(|_, _, _| Ok(CasOutcome::VersionConflict));

        let service = AvailabilityService::new(Arc::new(mock_repo), SlotPolicy::default(), 3);

        let result = service.reserve_slot(1, base()).await;

        assert!(matches!(
            result.unwrap_err(),
            ReservationError::Contended {
                expert_id: 1,
                attempts: 3
            }
        ));
    }

    #[tokio::test]
    async fn test_reserve_slot_single_attempt_budget() {
        let mut mock_repo = MockExpertRepository::new();

        mock_repo
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(Some(create_test_expert(1, vec![], 0))));

        mock_repo
            .expect_compare_and_swap_availability()
            .times(1)
            .returning(|_, _, _| Ok(CasOutcome::VersionConflict));

        let service = AvailabilityService::new(Arc::new(mock_repo), SlotPolicy::default(), 1);

        let result = service.reserve_slot(1, base()).await;

        assert!(matches!(
            result.unwrap_err(),
            ReservationError::Contended { attempts: 1, .. }
        ));
    }

    #[tokio::test]
    async fn test_reserve_slot_storage_failure_is_not_retried() {
        let mut mock_repo = MockExpertRepository::new();

        mock_repo
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(Some(create_test_expert(1, vec![], 0))));

        mock_repo
            .expect_compare_and_swap_availability()
            .times(1)
            .returning(|_, _, _| Err(AppError::unavailable("Storage unavailable", json!({}))));

        let result = service(mock_repo).reserve_slot(1, base()).await;

        assert!(matches!(
            result.unwrap_err(),
            ReservationError::Storage(AppError::Unavailable { .. })
        ));
    }

    #[tokio::test]
    async fn test_reserve_raw_slot_rejects_before_store_access() {
        let mut mock_repo = MockExpertRepository::new();
        mock_repo.expect_find_by_id().times(0);

        let result = service(mock_repo).reserve_raw_slot(1, "next tuesday").await;

        assert!(matches!(
            result.unwrap_err(),
            ReservationError::InvalidInput { .. }
        ));
    }

    #[tokio::test]
    async fn test_list_availability_not_found() {
        let mut mock_repo = MockExpertRepository::new();
        mock_repo
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(None));

        let result = service(mock_repo).list_availability(7).await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }
}
