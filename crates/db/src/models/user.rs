//! User entity models and DTOs.

use pawhaven_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A global login identity. Gains tenant access only via memberships.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub email: String,
    /// Argon2id PHC string. Never serialized into responses.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a user. The password is hashed by the caller; this
/// layer only ever sees the PHC string.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub email: String,
    pub password_hash: String,
}
