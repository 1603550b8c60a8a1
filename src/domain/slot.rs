//! Availability slots and the minimum-separation rule.
//!
//! A slot is a single UTC instant marking the start of a fixed-length session.
//! Two reserved slots of the same expert must be at least
//! [`SlotPolicy::min_separation`] apart; a candidate closer than that to any
//! stored slot is rejected.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, Utc};
use serde_json::json;
use thiserror::Error;

use crate::error::AppError;

/// Default minimum distance between two reserved slots, in minutes.
pub const DEFAULT_MIN_SEPARATION_MINUTES: i64 = 60;

/// Naive formats accepted in addition to RFC 3339. Interpreted as UTC.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Outcome of a rejected or failed reservation.
///
/// `Conflict` is a business rejection and carries the stored instant the
/// candidate collided with; only the candidate reaches the HTTP response.
/// `Storage` wraps infrastructure faults.
#[derive(Debug, Error)]
pub enum ReservationError {
    #[error("expert {expert_id} not found")]
    NotFound { expert_id: i64 },

    #[error("invalid slot {input:?}: {reason}")]
    InvalidInput { input: String, reason: String },

    #[error("slot already reserved")]
    Conflict {
        candidate: DateTime<Utc>,
        conflicts_with: DateTime<Utc>,
    },

    #[error("availability of expert {expert_id} is contended after {attempts} attempts")]
    Contended { expert_id: i64, attempts: usize },

    #[error(transparent)]
    Storage(#[from] AppError),
}

impl From<ReservationError> for AppError {
    fn from(e: ReservationError) -> Self {
        match e {
            ReservationError::NotFound { expert_id } => {
                AppError::not_found("Expert not found", json!({ "expert_id": expert_id }))
            }
            ReservationError::InvalidInput { input, reason } => AppError::bad_request(
                "Invalid slot",
                json!({ "slot": input, "reason": reason }),
            ),
            // The colliding instant belongs to another reservation and stays in the logs.
            ReservationError::Conflict { candidate, .. } => {
                AppError::conflict("Slot already reserved", json!({ "slot": candidate }))
            }
            ReservationError::Contended {
                expert_id,
                attempts,
            } => AppError::unavailable(
                "Availability is being updated concurrently, retry later",
                json!({ "expert_id": expert_id, "attempts": attempts }),
            ),
            ReservationError::Storage(inner) => inner,
        }
    }
}

/// The minimum-separation rule applied to an expert's availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotPolicy {
    min_separation: TimeDelta,
}

impl Default for SlotPolicy {
    fn default() -> Self {
        Self::from_minutes(DEFAULT_MIN_SEPARATION_MINUTES)
    }
}

impl SlotPolicy {
    pub fn new(min_separation: TimeDelta) -> Self {
        Self {
            min_separation: min_separation.abs(),
        }
    }

    /// # Panics
    ///
    /// Panics if `minutes` overflows a [`TimeDelta`]; configuration caps it at one day.
    pub fn from_minutes(minutes: i64) -> Self {
        Self::new(TimeDelta::minutes(minutes))
    }

    pub fn min_separation(&self) -> TimeDelta {
        self.min_separation
    }

    /// Returns the first stored instant that is strictly closer than the
    /// minimum separation to `candidate`.
    pub fn find_conflict(
        &self,
        existing: &[DateTime<Utc>],
        candidate: DateTime<Utc>,
    ) -> Option<DateTime<Utc>> {
        existing
            .iter()
            .copied()
            .find(|slot| (*slot - candidate).abs() < self.min_separation)
    }

    /// Appends `candidate` if it clears every stored instant.
    ///
    /// # Errors
    ///
    /// Returns the conflicting stored instant.
    pub fn admit(
        &self,
        existing: &[DateTime<Utc>],
        candidate: DateTime<Utc>,
    ) -> Result<Vec<DateTime<Utc>>, DateTime<Utc>> {
        if let Some(conflict) = self.find_conflict(existing, candidate) {
            return Err(conflict);
        }

        let mut updated = Vec::with_capacity(existing.len() + 1);
        updated.extend_from_slice(existing);
        updated.push(candidate);
        Ok(updated)
    }

    /// Whether every pair of instants is at least the minimum separation apart.
    pub fn is_well_separated(&self, slots: &[DateTime<Utc>]) -> bool {
        let mut sorted = slots.to_vec();
        sorted.sort_unstable();
        sorted
            .windows(2)
            .all(|pair| pair[1] - pair[0] >= self.min_separation)
    }
}

/// Parses an ISO-8601-like timestamp into a UTC instant.
///
/// Accepts RFC 3339 (`2026-03-01T10:00:00+02:00`), naive date-times with or
/// without seconds (treated as UTC) and bare dates (midnight UTC).
///
/// # Errors
///
/// Returns [`ReservationError::InvalidInput`] if no accepted format matches.
pub fn parse_slot(input: &str) -> Result<DateTime<Utc>, ReservationError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(ReservationError::InvalidInput {
            input: input.to_string(),
            reason: "slot is empty".to_string(),
        });
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.with_timezone(&Utc));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(naive.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        && let Some(midnight) = date.and_hms_opt(0, 0, 0)
    {
        return Ok(midnight.and_utc());
    }

    Err(ReservationError::InvalidInput {
        input: input.to_string(),
        reason: "expected an ISO-8601 timestamp such as 2026-03-01T10:00:00Z".to_string(),
    })
}
