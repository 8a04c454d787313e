//! Read-side dashboard aggregation types.
//!
//! None of these are stored; every field is recomputed on demand from
//! current entity state (plus the audit-independent base tables for
//! time-bucketed trends).

use pawhaven_core::types::DateOnly;
use serde::Serialize;
use sqlx::FromRow;

/// Headline shelter counts.
#[derive(Debug, Clone, Serialize)]
pub struct ShelterCounts {
    /// Animals currently in care (available, hold, or fostered).
    pub in_care: i64,
    pub available: i64,
    pub on_hold: i64,
    pub in_foster: i64,
    /// Applications still moving through the pipeline (received or review).
    pub open_applications: i64,
    /// Non-terminal medical tasks past their due date.
    pub overdue_tasks: i64,
}

/// One species bucket of the in-care population.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SpeciesCount {
    pub species: String,
    pub count: i64,
}

/// One month of intake volume.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MonthlyIntake {
    /// First day of the month.
    pub month: DateOnly,
    pub count: i64,
}

/// Counts for the four-column application board.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineStageCounts {
    pub received: i64,
    pub review: i64,
    /// Approved but not yet finalized.
    pub approved: i64,
    /// Approved and finalized into an adoption or foster placement.
    pub completed: i64,
}

/// Medical compliance over a reporting window.
#[derive(Debug, Clone, Serialize)]
pub struct ComplianceSummary {
    pub completed: i64,
    /// Tasks that became overdue in the window and were never completed.
    pub missed: i64,
    /// completed / (completed + missed); absent when nothing was due.
    pub rate: Option<f64>,
}

/// Outcome counts and live-release rate over a reporting window.
#[derive(Debug, Clone, Serialize)]
pub struct OutcomeSummary {
    pub adoptions: i64,
    pub transfers: i64,
    pub returns_to_owner: i64,
    pub euthanasias: i64,
    /// Share of outcomes that were live releases; absent when no outcomes
    /// were recorded in the window.
    pub live_release_rate: Option<f64>,
}
