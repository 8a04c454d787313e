//! Repository for the `applications` table.

use sqlx::{PgPool, Postgres, Transaction};

use pawhaven_core::application::{validate_kind, validate_transition};
use pawhaven_core::audit::{actions, change_snapshot, creation_snapshot, entity_types};
use pawhaven_core::error::CoreError;
use pawhaven_core::types::DbId;

use crate::error::DbResult;
use crate::models::application::{Application, CreateApplication, TransitionApplication};
use crate::models::audit::CreateAuditEntry;
use crate::repositories::AuditLogRepo;

/// Column list for applications queries.
const COLUMNS: &str = "\
    id, organization_id, animal_id, person_id, kind, status, form_json, \
    decision_notes, version, created_at, updated_at";

/// Provides submission and pipeline transitions for applications.
pub struct ApplicationRepo;

impl ApplicationRepo {
    /// Submit an application in status `received`. The animal and person
    /// must both resolve within the tenant. Audited.
    pub async fn submit(
        pool: &PgPool,
        organization_id: DbId,
        actor_id: DbId,
        input: &CreateApplication,
    ) -> DbResult<Application> {
        validate_kind(&input.kind)?;

        let mut tx = pool.begin().await?;

        let animal_exists: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM animals WHERE id = $1 AND organization_id = $2",
        )
        .bind(input.animal_id)
        .bind(organization_id)
        .fetch_one(&mut *tx)
        .await?;
        if animal_exists == 0 {
            return Err(CoreError::NotFound {
                entity: "Animal",
                id: input.animal_id,
            }
            .into());
        }

        let person_exists: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM people WHERE id = $1 AND organization_id = $2",
        )
        .bind(input.person_id)
        .bind(organization_id)
        .fetch_one(&mut *tx)
        .await?;
        if person_exists == 0 {
            return Err(CoreError::NotFound {
                entity: "Person",
                id: input.person_id,
            }
            .into());
        }

        let query = format!(
            "INSERT INTO applications \
                (organization_id, animal_id, person_id, kind, form_json) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        let application = sqlx::query_as::<_, Application>(&query)
            .bind(organization_id)
            .bind(input.animal_id)
            .bind(input.person_id)
            .bind(&input.kind)
            .bind(
                input
                    .form_json
                    .clone()
                    .unwrap_or_else(|| serde_json::json!({})),
            )
            .fetch_one(&mut *tx)
            .await?;

        AuditLogRepo::append_tx(
            &mut tx,
            &CreateAuditEntry {
                organization_id,
                actor_id: Some(actor_id),
                action: actions::APPLICATION_SUBMIT.to_string(),
                entity_type: entity_types::APPLICATION.to_string(),
                entity_id: application.id,
                details_json: creation_snapshot(&serde_json::json!({
                    "animal_id": application.animal_id,
                    "person_id": application.person_id,
                    "kind": application.kind,
                    "status": application.status,
                })),
            },
        )
        .await?;

        tx.commit().await?;
        Ok(application)
    }

    /// Find an application by id within a tenant.
    pub async fn find_by_id(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
    ) -> Result<Option<Application>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM applications WHERE id = $1 AND organization_id = $2");
        sqlx::query_as::<_, Application>(&query)
            .bind(id)
            .bind(organization_id)
            .fetch_optional(pool)
            .await
    }

    /// List a tenant's applications, optionally filtered by status, newest
    /// first. This backs the pipeline board.
    pub async fn list(
        pool: &PgPool,
        organization_id: DbId,
        status: Option<&str>,
    ) -> Result<Vec<Application>, sqlx::Error> {
        match status {
            Some(status) => {
                let query = format!(
                    "SELECT {COLUMNS} FROM applications \
                     WHERE organization_id = $1 AND status = $2 \
                     ORDER BY created_at DESC, id DESC"
                );
                sqlx::query_as::<_, Application>(&query)
                    .bind(organization_id)
                    .bind(status)
                    .fetch_all(pool)
                    .await
            }
            None => {
                let query = format!(
                    "SELECT {COLUMNS} FROM applications \
                     WHERE organization_id = $1 \
                     ORDER BY created_at DESC, id DESC"
                );
                sqlx::query_as::<_, Application>(&query)
                    .bind(organization_id)
                    .fetch_all(pool)
                    .await
            }
        }
    }

    /// Move an application along the pipeline.
    ///
    /// One transaction: lock the row, check the optional expected version,
    /// validate the edge, write the new status (capturing decision notes),
    /// audit, commit. Out-of-order calls fail `InvalidTransition`.
    pub async fn transition(
        pool: &PgPool,
        organization_id: DbId,
        actor_id: DbId,
        application_id: DbId,
        new_status: &str,
        input: &TransitionApplication,
    ) -> DbResult<Application> {
        let mut tx = pool.begin().await?;

        let application = Self::lock_row(&mut tx, organization_id, application_id).await?;

        if let Some(expected) = input.expected_version {
            if expected != application.version {
                return Err(CoreError::ConcurrentModification {
                    entity: "Application",
                    id: application_id,
                }
                .into());
            }
        }

        validate_transition(&application.status, new_status)?;

        let query = format!(
            "UPDATE applications \
             SET status = $1, \
                 decision_notes = COALESCE($2, decision_notes), \
                 version = version + 1, \
                 updated_at = now() \
             WHERE id = $3 \
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Application>(&query)
            .bind(new_status)
            .bind(&input.notes)
            .bind(application_id)
            .fetch_one(&mut *tx)
            .await?;

        AuditLogRepo::append_tx(
            &mut tx,
            &CreateAuditEntry {
                organization_id,
                actor_id: Some(actor_id),
                action: actions::APPLICATION_STATUS_CHANGE.to_string(),
                entity_type: entity_types::APPLICATION.to_string(),
                entity_id: application_id,
                details_json: change_snapshot(
                    &serde_json::json!({ "status": application.status }),
                    &serde_json::json!({ "status": updated.status }),
                ),
            },
        )
        .await?;

        tx.commit().await?;
        tracing::info!(
            application_id,
            from = %application.status,
            to = %updated.status,
            "Application stage changed"
        );
        Ok(updated)
    }

    /// Lock an application row for update, scoped to the tenant.
    pub(crate) async fn lock_row(
        tx: &mut Transaction<'_, Postgres>,
        organization_id: DbId,
        application_id: DbId,
    ) -> DbResult<Application> {
        let query = format!(
            "SELECT {COLUMNS} FROM applications \
             WHERE id = $1 AND organization_id = $2 FOR UPDATE"
        );
        sqlx::query_as::<_, Application>(&query)
            .bind(application_id)
            .bind(organization_id)
            .fetch_optional(&mut **tx)
            .await?
            .ok_or_else(|| {
                CoreError::NotFound {
                    entity: "Application",
                    id: application_id,
                }
                .into()
            })
    }
}
