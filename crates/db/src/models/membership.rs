//! Membership entity models and DTOs.

use pawhaven_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A (user, organization) -> role grant. The sole source of authorization
/// decisions; role is never client-supplied state.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Membership {
    pub id: DbId,
    pub user_id: DbId,
    pub organization_id: DbId,
    pub role: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for adding a member to an organization.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMembership {
    pub user_id: DbId,
    pub role: String,
}

/// A membership row joined with the member's email, for listings.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MemberWithEmail {
    pub id: DbId,
    pub user_id: DbId,
    pub organization_id: DbId,
    pub role: String,
    pub email: String,
    pub created_at: Timestamp,
}
