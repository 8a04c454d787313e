//! Note and photo entity models and DTOs.

use pawhaven_core::annotations::SubjectKind;
use pawhaven_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A note attached to an animal, person, or application.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Note {
    pub id: DbId,
    pub organization_id: DbId,
    pub subject_type: String,
    pub subject_id: DbId,
    pub author_id: Option<DbId>,
    pub body: String,
    pub visibility: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A photo attached to an animal, person, or application. The file itself
/// lives in external storage; only the reference is kept here.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Photo {
    pub id: DbId,
    pub organization_id: DbId,
    pub subject_type: String,
    pub subject_id: DbId,
    pub storage_ref: String,
    pub caption: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for creating a note.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateNote {
    pub subject_type: SubjectKind,
    pub subject_id: DbId,
    pub body: String,
    pub visibility: Option<String>,
}

/// DTO for attaching a photo.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePhoto {
    pub subject_type: SubjectKind,
    pub subject_id: DbId,
    pub storage_ref: String,
    pub caption: Option<String>,
}
