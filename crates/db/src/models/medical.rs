//! Medical task and record entity models and DTOs.

use pawhaven_core::medical::TaskClassification;
use pawhaven_core::types::{DateOnly, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A scheduled medical task.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MedicalTask {
    pub id: DbId,
    pub organization_id: DbId,
    pub animal_id: DbId,
    pub task_type: String,
    pub status: String,
    pub due_date: DateOnly,
    pub assigned_to: Option<DbId>,
    pub notes: Option<String>,
    pub version: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// An immutable record of care delivered, created by task completion or
/// direct staff entry.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MedicalRecord {
    pub id: DbId,
    pub organization_id: DbId,
    pub animal_id: DbId,
    pub task_id: Option<DbId>,
    pub record_type: String,
    pub performed_on: DateOnly,
    pub performed_by: Option<DbId>,
    pub details_json: serde_json::Value,
    pub created_at: Timestamp,
}

/// DTO for scheduling a task.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMedicalTask {
    pub task_type: String,
    pub due_date: DateOnly,
    pub assigned_to: Option<DbId>,
    pub notes: Option<String>,
}

/// DTO for rescheduling/reassigning a task among non-terminal statuses.
/// Completion and cancellation go through their dedicated operations.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateMedicalTask {
    pub status: Option<String>,
    pub due_date: Option<DateOnly>,
    pub assigned_to: Option<DbId>,
    pub notes: Option<String>,
    pub expected_version: Option<DbId>,
}

/// Result of completing a task: the completed task, the medical record
/// snapshot, and the recurrence follow-up task.
#[derive(Debug, Clone, Serialize)]
pub struct CompleteTaskResult {
    pub task: MedicalTask,
    pub record: MedicalRecord,
    pub follow_up: MedicalTask,
}

/// Per-task failure within a batch completion.
#[derive(Debug, Clone, Serialize)]
pub struct BatchFailure {
    pub task_id: DbId,
    pub reason: String,
}

/// Result of a batch completion. Partial-failure semantics: each task is
/// processed independently and one failure does not abort the batch.
#[derive(Debug, Clone, Serialize)]
pub struct BatchCompleteResult {
    pub updated: usize,
    pub failures: Vec<BatchFailure>,
}

/// A task paired with its read-time classification.
#[derive(Debug, Clone, Serialize)]
pub struct ClassifiedTask {
    #[serde(flatten)]
    pub task: MedicalTask,
    pub classification: TaskClassification,
}
