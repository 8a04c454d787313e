//! Repository for the `notes` and `photos` tables.
//!
//! Both attach polymorphically to a (subject kind, subject id) pair. The
//! subject is resolved within the tenant before every insert, so a dangling
//! or cross-tenant subject fails `NotFound` at write time.

use sqlx::PgPool;

use pawhaven_core::annotations::{validate_visibility, SubjectKind, VISIBILITY_STAFF_ONLY};
use pawhaven_core::audit::{actions, creation_snapshot, entity_types};
use pawhaven_core::error::CoreError;
use pawhaven_core::types::DbId;

use crate::error::DbResult;
use crate::models::annotation::{CreateNote, CreatePhoto, Note, Photo};
use crate::models::audit::CreateAuditEntry;
use crate::repositories::AuditLogRepo;

/// Column list for notes queries.
const NOTE_COLUMNS: &str = "\
    id, organization_id, subject_type, subject_id, author_id, body, \
    visibility, created_at, updated_at";

/// Column list for photos queries.
const PHOTO_COLUMNS: &str = "\
    id, organization_id, subject_type, subject_id, storage_ref, caption, created_at";

/// Provides insert and listing for notes and photos.
pub struct NoteRepo;

impl NoteRepo {
    /// Insert a note after resolving its subject within the tenant. Audited.
    pub async fn create_note(
        pool: &PgPool,
        organization_id: DbId,
        actor_id: DbId,
        input: &CreateNote,
    ) -> DbResult<Note> {
        let visibility = input.visibility.as_deref().unwrap_or(VISIBILITY_STAFF_ONLY);
        validate_visibility(visibility)?;

        let mut tx = pool.begin().await?;

        resolve_subject(&mut tx, organization_id, input.subject_type, input.subject_id).await?;

        let query = format!(
            "INSERT INTO notes \
                (organization_id, subject_type, subject_id, author_id, body, visibility) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {NOTE_COLUMNS}"
        );
        let note = sqlx::query_as::<_, Note>(&query)
            .bind(organization_id)
            .bind(input.subject_type.as_str())
            .bind(input.subject_id)
            .bind(actor_id)
            .bind(&input.body)
            .bind(visibility)
            .fetch_one(&mut *tx)
            .await?;

        AuditLogRepo::append_tx(
            &mut tx,
            &CreateAuditEntry {
                organization_id,
                actor_id: Some(actor_id),
                action: actions::NOTE_CREATE.to_string(),
                entity_type: entity_types::NOTE.to_string(),
                entity_id: note.id,
                details_json: creation_snapshot(&serde_json::json!({
                    "subject_type": note.subject_type,
                    "subject_id": note.subject_id,
                    "visibility": note.visibility,
                })),
            },
        )
        .await?;

        tx.commit().await?;
        Ok(note)
    }

    /// List notes for a subject, newest first.
    pub async fn list_notes(
        pool: &PgPool,
        organization_id: DbId,
        subject_type: SubjectKind,
        subject_id: DbId,
    ) -> Result<Vec<Note>, sqlx::Error> {
        let query = format!(
            "SELECT {NOTE_COLUMNS} FROM notes \
             WHERE organization_id = $1 AND subject_type = $2 AND subject_id = $3 \
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Note>(&query)
            .bind(organization_id)
            .bind(subject_type.as_str())
            .bind(subject_id)
            .fetch_all(pool)
            .await
    }

    /// Attach a photo after resolving its subject within the tenant.
    pub async fn create_photo(
        pool: &PgPool,
        organization_id: DbId,
        input: &CreatePhoto,
    ) -> DbResult<Photo> {
        let mut tx = pool.begin().await?;

        resolve_subject(&mut tx, organization_id, input.subject_type, input.subject_id).await?;

        let query = format!(
            "INSERT INTO photos \
                (organization_id, subject_type, subject_id, storage_ref, caption) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {PHOTO_COLUMNS}"
        );
        let photo = sqlx::query_as::<_, Photo>(&query)
            .bind(organization_id)
            .bind(input.subject_type.as_str())
            .bind(input.subject_id)
            .bind(&input.storage_ref)
            .bind(&input.caption)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(photo)
    }

    /// List photos for a subject, newest first.
    pub async fn list_photos(
        pool: &PgPool,
        organization_id: DbId,
        subject_type: SubjectKind,
        subject_id: DbId,
    ) -> Result<Vec<Photo>, sqlx::Error> {
        let query = format!(
            "SELECT {PHOTO_COLUMNS} FROM photos \
             WHERE organization_id = $1 AND subject_type = $2 AND subject_id = $3 \
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Photo>(&query)
            .bind(organization_id)
            .bind(subject_type.as_str())
            .bind(subject_id)
            .fetch_all(pool)
            .await
    }
}

/// Verify the subject row exists within the tenant for the given kind.
async fn resolve_subject(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    organization_id: DbId,
    subject_type: SubjectKind,
    subject_id: DbId,
) -> DbResult<()> {
    let query = format!(
        "SELECT COUNT(*) FROM {} WHERE id = $1 AND organization_id = $2",
        subject_type.table()
    );
    let count: i64 = sqlx::query_scalar(&query)
        .bind(subject_id)
        .bind(organization_id)
        .fetch_one(&mut **tx)
        .await?;

    if count == 0 {
        return Err(CoreError::NotFound {
            entity: subject_type.entity_name(),
            id: subject_id,
        }
        .into());
    }
    Ok(())
}
