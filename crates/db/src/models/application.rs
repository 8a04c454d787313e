//! Application entity models and DTOs.

use pawhaven_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An adoption or foster application moving through the review pipeline.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Application {
    pub id: DbId,
    pub organization_id: DbId,
    pub animal_id: DbId,
    pub person_id: DbId,
    pub kind: String,
    pub status: String,
    pub form_json: serde_json::Value,
    pub decision_notes: Option<String>,
    pub version: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for submitting an application.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateApplication {
    pub animal_id: DbId,
    pub person_id: DbId,
    pub kind: String,
    pub form_json: Option<serde_json::Value>,
}

/// DTO for a pipeline stage transition (move-to-review, approve, deny,
/// withdraw). The target status comes from the route, not the body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransitionApplication {
    pub notes: Option<String>,
    pub expected_version: Option<DbId>,
}
