//! Animal, intake, and outcome entity models and DTOs.

use pawhaven_core::types::{DateOnly, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An animal in (or formerly in) shelter care. Never hard-deleted; a
/// terminal status retires the record.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Animal {
    pub id: DbId,
    pub organization_id: DbId,
    pub name: String,
    pub species: String,
    pub status: String,
    pub intake_date: DateOnly,
    pub kennel: Option<String>,
    pub microchip: Option<String>,
    pub attributes_json: serde_json::Value,
    /// Bumped on every status transition; backs optimistic concurrency.
    pub version: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// An intake record. One per animal, immutable once created.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Intake {
    pub id: DbId,
    pub organization_id: DbId,
    pub animal_id: DbId,
    pub intake_type: String,
    pub intake_date: DateOnly,
    pub medical_hold: bool,
    pub notes: Option<String>,
    pub created_at: Timestamp,
}

/// An outcome record. The terminal disposition of an animal; immutable.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Outcome {
    pub id: DbId,
    pub organization_id: DbId,
    pub animal_id: DbId,
    pub outcome_type: String,
    pub outcome_date: DateOnly,
    pub notes: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for intaking an animal: creates the animal and its intake record
/// in one transaction.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateIntake {
    pub name: String,
    pub species: String,
    pub intake_type: String,
    pub intake_date: DateOnly,
    /// When true, the animal starts on `hold` instead of `available`.
    #[serde(default)]
    pub medical_hold: bool,
    pub kennel: Option<String>,
    pub microchip: Option<String>,
    pub attributes_json: Option<serde_json::Value>,
    pub notes: Option<String>,
}

/// DTO for a guarded status transition.
#[derive(Debug, Clone, Deserialize)]
pub struct TransitionAnimal {
    pub new_status: String,
    /// Outcome date when entering a terminal status. Defaults to today.
    pub outcome_date: Option<DateOnly>,
    pub outcome_notes: Option<String>,
    /// Close status for the active foster assignment when leaving
    /// `fostered`. Defaults to `completed`.
    pub foster_close_status: Option<String>,
    /// Optimistic-lock check: fails `ConcurrentModification` when the
    /// row's version no longer matches.
    pub expected_version: Option<DbId>,
}

/// Result of an animal status transition: the updated animal plus the
/// outcome record if a terminal status was entered.
#[derive(Debug, Clone, Serialize)]
pub struct TransitionResult {
    pub animal: Animal,
    pub outcome: Option<Outcome>,
}
