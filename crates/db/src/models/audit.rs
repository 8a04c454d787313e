//! Audit log entity models and DTOs.
//!
//! Audit entries are append-only: no `updated_at`, and no UPDATE or DELETE
//! path anywhere in this crate.

use pawhaven_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A single audit log entry. Immutable once created.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AuditLogEntry {
    pub id: DbId,
    pub organization_id: DbId,
    pub actor_id: Option<DbId>,
    pub action: String,
    pub entity_type: String,
    pub entity_id: DbId,
    pub details_json: serde_json::Value,
    pub created_at: Timestamp,
}

/// DTO for appending an audit entry.
#[derive(Debug, Clone)]
pub struct CreateAuditEntry {
    pub organization_id: DbId,
    pub actor_id: Option<DbId>,
    pub action: String,
    pub entity_type: String,
    pub entity_id: DbId,
    /// Before/after snapshot of the mutated fields.
    pub details_json: serde_json::Value,
}

/// Filter parameters for querying the audit log. Always org-scoped by the
/// repository; these narrow within the tenant.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditQuery {
    pub actor_id: Option<DbId>,
    pub action: Option<String>,
    pub entity_type: Option<String>,
    pub entity_id: Option<DbId>,
    pub from: Option<Timestamp>,
    pub to: Option<Timestamp>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Paginated response for audit log queries.
#[derive(Debug, Clone, Serialize)]
pub struct AuditLogPage {
    pub items: Vec<AuditLogEntry>,
    pub total: i64,
}
