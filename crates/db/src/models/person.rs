//! Person (external contact) entity models and DTOs.

use pawhaven_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An external contact (adopter, foster, volunteer, donor). Not a login
/// user. `flags_json` carries well-known keys such as `do_not_adopt`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Person {
    pub id: DbId,
    pub organization_id: DbId,
    pub person_type: String,
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub flags_json: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a person.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePerson {
    pub person_type: String,
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub flags_json: Option<serde_json::Value>,
}

/// DTO for updating a person. All fields optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePerson {
    pub person_type: Option<String>,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub flags_json: Option<serde_json::Value>,
}
