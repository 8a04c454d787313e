//! Foster assignment and adoption entity models and DTOs.

use pawhaven_core::types::{DateOnly, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A foster placement. At most one per animal is `active` at a time.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FosterAssignment {
    pub id: DbId,
    pub organization_id: DbId,
    pub animal_id: DbId,
    pub person_id: DbId,
    pub application_id: Option<DbId>,
    pub status: String,
    pub start_date: DateOnly,
    pub end_date: Option<DateOnly>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A finalized adoption.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Adoption {
    pub id: DbId,
    pub organization_id: DbId,
    pub animal_id: DbId,
    pub adopter_id: DbId,
    pub application_id: Option<DbId>,
    pub adoption_date: DateOnly,
    pub fee_cents: i64,
    pub donation_cents: i64,
    pub contract_ref: Option<String>,
    pub payment_ref: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for finalizing an approved adoption application.
#[derive(Debug, Clone, Deserialize)]
pub struct FinalizeAdoption {
    pub fee_cents: i64,
    #[serde(default)]
    pub donation_cents: i64,
    /// Defaults to today.
    pub adoption_date: Option<DateOnly>,
    pub contract_ref: Option<String>,
    pub payment_ref: Option<String>,
}

/// DTO for placing a foster from an approved foster application.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceFoster {
    /// Defaults to today.
    pub start_date: Option<DateOnly>,
}

/// DTO for ending an active foster assignment.
#[derive(Debug, Clone, Deserialize)]
pub struct EndFoster {
    /// `completed` or `failed`. Defaults to `completed`.
    pub close_status: Option<String>,
    /// Status the animal returns to: `available` or `hold`. Defaults to
    /// `available`.
    pub return_status: Option<String>,
    /// Defaults to today.
    pub end_date: Option<DateOnly>,
}
