//! Repository for the `foster_assignments` and `adoptions` tables:
//! finalization of approved applications into placements and terminal
//! outcomes.

use sqlx::{PgPool, Postgres, Transaction};

use pawhaven_core::animal::{validate_transition, STATUS_ADOPTED, STATUS_AVAILABLE, STATUS_FOSTERED, STATUS_HOLD};
use pawhaven_core::application::{APP_APPROVED, KIND_ADOPTION, KIND_FOSTER};
use pawhaven_core::audit::{actions, change_snapshot, creation_snapshot, entity_types};
use pawhaven_core::error::CoreError;
use pawhaven_core::placement::{validate_close_status, ASSIGNMENT_ACTIVE, ASSIGNMENT_COMPLETED};
use pawhaven_core::types::DbId;

use crate::error::DbResult;
use crate::models::animal::Animal;
use crate::models::audit::CreateAuditEntry;
use crate::models::placement::{Adoption, EndFoster, FinalizeAdoption, FosterAssignment, PlaceFoster};
use crate::repositories::{AnimalRepo, ApplicationRepo, AuditLogRepo};

/// Column list for foster_assignments queries.
const ASSIGNMENT_COLUMNS: &str = "\
    id, organization_id, animal_id, person_id, application_id, status, \
    start_date, end_date, created_at, updated_at";

/// Column list for adoptions queries.
const ADOPTION_COLUMNS: &str = "\
    id, organization_id, animal_id, adopter_id, application_id, adoption_date, \
    fee_cents, donation_cents, contract_ref, payment_ref, created_at";

/// Provides finalization operations that cross-reference animal and
/// application state.
pub struct PlacementRepo;

impl PlacementRepo {
    /// Finalize an approved adoption application.
    ///
    /// One transaction: lock the application (must be kind `adoption` and
    /// status `approved`), lock the animal, refuse adopters flagged
    /// do-not-adopt, close an active foster assignment if the animal was
    /// fostered, move the animal to `adopted`, record the adoption outcome,
    /// insert the adoption row, audit each mutation, commit.
    pub async fn finalize_adoption(
        pool: &PgPool,
        organization_id: DbId,
        actor_id: DbId,
        application_id: DbId,
        input: &FinalizeAdoption,
    ) -> DbResult<Adoption> {
        if input.fee_cents < 0 || input.donation_cents < 0 {
            return Err(
                CoreError::Validation("Fee and donation must be non-negative".into()).into(),
            );
        }

        let mut tx = pool.begin().await?;

        let application = ApplicationRepo::lock_row(&mut tx, organization_id, application_id).await?;
        if application.kind != KIND_ADOPTION || application.status != APP_APPROVED {
            return Err(CoreError::ApplicationNotApproved {
                application_id,
                expected_kind: KIND_ADOPTION,
            }
            .into());
        }

        let animal = AnimalRepo::lock_row(&mut tx, organization_id, application.animal_id).await?;
        validate_transition(animal.id, &animal.status, STATUS_ADOPTED)?;

        let flagged: Option<bool> = sqlx::query_scalar(
            "SELECT (flags_json->>'do_not_adopt')::BOOLEAN FROM people \
             WHERE id = $1 AND organization_id = $2",
        )
        .bind(application.person_id)
        .bind(organization_id)
        .fetch_optional(&mut *tx)
        .await?
        .flatten();
        if flagged == Some(true) {
            return Err(CoreError::Validation(
                "Adopter is flagged do-not-adopt".into(),
            )
            .into());
        }

        if animal.status == STATUS_FOSTERED {
            AnimalRepo::close_active_assignment(
                &mut tx,
                organization_id,
                actor_id,
                animal.id,
                ASSIGNMENT_COMPLETED,
            )
            .await?;
        }

        let updated = Self::set_animal_status(
            &mut tx,
            organization_id,
            actor_id,
            &animal,
            STATUS_ADOPTED,
        )
        .await?;

        AnimalRepo::record_outcome(
            &mut tx,
            organization_id,
            actor_id,
            updated.id,
            STATUS_ADOPTED,
            input.adoption_date,
            None,
        )
        .await?;

        let query = format!(
            "INSERT INTO adoptions \
                (organization_id, animal_id, adopter_id, application_id, adoption_date, \
                 fee_cents, donation_cents, contract_ref, payment_ref) \
             VALUES ($1, $2, $3, $4, COALESCE($5, CURRENT_DATE), $6, $7, $8, $9) \
             RETURNING {ADOPTION_COLUMNS}"
        );
        let adoption = sqlx::query_as::<_, Adoption>(&query)
            .bind(organization_id)
            .bind(updated.id)
            .bind(application.person_id)
            .bind(application_id)
            .bind(input.adoption_date)
            .bind(input.fee_cents)
            .bind(input.donation_cents)
            .bind(&input.contract_ref)
            .bind(&input.payment_ref)
            .fetch_one(&mut *tx)
            .await?;

        AuditLogRepo::append_tx(
            &mut tx,
            &CreateAuditEntry {
                organization_id,
                actor_id: Some(actor_id),
                action: actions::ADOPTION_FINALIZE.to_string(),
                entity_type: entity_types::ADOPTION.to_string(),
                entity_id: adoption.id,
                details_json: creation_snapshot(&serde_json::json!({
                    "animal_id": adoption.animal_id,
                    "adopter_id": adoption.adopter_id,
                    "application_id": application_id,
                    "fee_cents": adoption.fee_cents,
                    "donation_cents": adoption.donation_cents,
                })),
            },
        )
        .await?;

        tx.commit().await?;
        tracing::info!(
            adoption_id = adoption.id,
            animal_id = adoption.animal_id,
            "Adoption finalized"
        );
        Ok(adoption)
    }

    /// Place a foster from an approved foster application.
    ///
    /// One transaction: lock the application (kind `foster`, status
    /// `approved`), lock the animal, refuse when an active assignment
    /// already exists, open the assignment, move the animal to `fostered`,
    /// audit, commit.
    pub async fn place_foster(
        pool: &PgPool,
        organization_id: DbId,
        actor_id: DbId,
        application_id: DbId,
        input: &PlaceFoster,
    ) -> DbResult<FosterAssignment> {
        let mut tx = pool.begin().await?;

        let application = ApplicationRepo::lock_row(&mut tx, organization_id, application_id).await?;
        if application.kind != KIND_FOSTER || application.status != APP_APPROVED {
            return Err(CoreError::ApplicationNotApproved {
                application_id,
                expected_kind: KIND_FOSTER,
            }
            .into());
        }

        let animal = AnimalRepo::lock_row(&mut tx, organization_id, application.animal_id).await?;

        let active: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM foster_assignments WHERE animal_id = $1 AND status = $2",
        )
        .bind(animal.id)
        .bind(ASSIGNMENT_ACTIVE)
        .fetch_one(&mut *tx)
        .await?;
        if active > 0 {
            return Err(CoreError::AnimalAlreadyFostered {
                animal_id: animal.id,
            }
            .into());
        }

        validate_transition(animal.id, &animal.status, STATUS_FOSTERED)?;

        let query = format!(
            "INSERT INTO foster_assignments \
                (organization_id, animal_id, person_id, application_id, start_date) \
             VALUES ($1, $2, $3, $4, COALESCE($5, CURRENT_DATE)) \
             RETURNING {ASSIGNMENT_COLUMNS}"
        );
        let assignment = sqlx::query_as::<_, FosterAssignment>(&query)
            .bind(organization_id)
            .bind(animal.id)
            .bind(application.person_id)
            .bind(application_id)
            .bind(input.start_date)
            .fetch_one(&mut *tx)
            .await?;

        Self::set_animal_status(&mut tx, organization_id, actor_id, &animal, STATUS_FOSTERED)
            .await?;

        AuditLogRepo::append_tx(
            &mut tx,
            &CreateAuditEntry {
                organization_id,
                actor_id: Some(actor_id),
                action: actions::FOSTER_PLACE.to_string(),
                entity_type: entity_types::FOSTER_ASSIGNMENT.to_string(),
                entity_id: assignment.id,
                details_json: creation_snapshot(&serde_json::json!({
                    "animal_id": assignment.animal_id,
                    "person_id": assignment.person_id,
                    "application_id": application_id,
                    "start_date": assignment.start_date,
                })),
            },
        )
        .await?;

        tx.commit().await?;
        tracing::info!(
            assignment_id = assignment.id,
            animal_id = assignment.animal_id,
            "Foster placed"
        );
        Ok(assignment)
    }

    /// End an active foster assignment and return the animal to shelter
    /// care (`available` or `hold`).
    pub async fn end_foster(
        pool: &PgPool,
        organization_id: DbId,
        actor_id: DbId,
        assignment_id: DbId,
        input: &EndFoster,
    ) -> DbResult<(FosterAssignment, Animal)> {
        let close_status = input
            .close_status
            .as_deref()
            .unwrap_or(ASSIGNMENT_COMPLETED);
        validate_close_status(close_status)?;

        let return_status = input.return_status.as_deref().unwrap_or(STATUS_AVAILABLE);
        if return_status != STATUS_AVAILABLE && return_status != STATUS_HOLD {
            return Err(CoreError::Validation(format!(
                "Invalid return status '{return_status}'. Must be one of: {STATUS_AVAILABLE}, {STATUS_HOLD}"
            ))
            .into());
        }

        let mut tx = pool.begin().await?;

        let query = format!(
            "SELECT {ASSIGNMENT_COLUMNS} FROM foster_assignments \
             WHERE id = $1 AND organization_id = $2 FOR UPDATE"
        );
        let assignment = sqlx::query_as::<_, FosterAssignment>(&query)
            .bind(assignment_id)
            .bind(organization_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "FosterAssignment",
                id: assignment_id,
            })?;

        if assignment.status != ASSIGNMENT_ACTIVE {
            return Err(CoreError::AlreadyTerminal {
                entity: "FosterAssignment",
                id: assignment_id,
            }
            .into());
        }

        let animal = AnimalRepo::lock_row(&mut tx, organization_id, assignment.animal_id).await?;
        validate_transition(animal.id, &animal.status, return_status)?;

        let query = format!(
            "UPDATE foster_assignments \
             SET status = $1, end_date = COALESCE($2, CURRENT_DATE), updated_at = now() \
             WHERE id = $3 \
             RETURNING {ASSIGNMENT_COLUMNS}"
        );
        let closed = sqlx::query_as::<_, FosterAssignment>(&query)
            .bind(close_status)
            .bind(input.end_date)
            .bind(assignment_id)
            .fetch_one(&mut *tx)
            .await?;

        let updated_animal =
            Self::set_animal_status(&mut tx, organization_id, actor_id, &animal, return_status)
                .await?;

        AuditLogRepo::append_tx(
            &mut tx,
            &CreateAuditEntry {
                organization_id,
                actor_id: Some(actor_id),
                action: actions::FOSTER_END.to_string(),
                entity_type: entity_types::FOSTER_ASSIGNMENT.to_string(),
                entity_id: assignment_id,
                details_json: change_snapshot(
                    &serde_json::json!({ "status": assignment.status, "end_date": assignment.end_date }),
                    &serde_json::json!({ "status": closed.status, "end_date": closed.end_date }),
                ),
            },
        )
        .await?;

        tx.commit().await?;
        Ok((closed, updated_animal))
    }

    /// Find an assignment by id within a tenant.
    pub async fn find_assignment(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
    ) -> Result<Option<FosterAssignment>, sqlx::Error> {
        let query = format!(
            "SELECT {ASSIGNMENT_COLUMNS} FROM foster_assignments \
             WHERE id = $1 AND organization_id = $2"
        );
        sqlx::query_as::<_, FosterAssignment>(&query)
            .bind(id)
            .bind(organization_id)
            .fetch_optional(pool)
            .await
    }

    /// List a tenant's foster assignments, newest first.
    pub async fn list_assignments(
        pool: &PgPool,
        organization_id: DbId,
        status: Option<&str>,
    ) -> Result<Vec<FosterAssignment>, sqlx::Error> {
        match status {
            Some(status) => {
                let query = format!(
                    "SELECT {ASSIGNMENT_COLUMNS} FROM foster_assignments \
                     WHERE organization_id = $1 AND status = $2 \
                     ORDER BY start_date DESC, id DESC"
                );
                sqlx::query_as::<_, FosterAssignment>(&query)
                    .bind(organization_id)
                    .bind(status)
                    .fetch_all(pool)
                    .await
            }
            None => {
                let query = format!(
                    "SELECT {ASSIGNMENT_COLUMNS} FROM foster_assignments \
                     WHERE organization_id = $1 \
                     ORDER BY start_date DESC, id DESC"
                );
                sqlx::query_as::<_, FosterAssignment>(&query)
                    .bind(organization_id)
                    .fetch_all(pool)
                    .await
            }
        }
    }

    /// Find the adoption record for an animal.
    pub async fn find_adoption_for_animal(
        pool: &PgPool,
        organization_id: DbId,
        animal_id: DbId,
    ) -> Result<Option<Adoption>, sqlx::Error> {
        let query = format!(
            "SELECT {ADOPTION_COLUMNS} FROM adoptions \
             WHERE animal_id = $1 AND organization_id = $2"
        );
        sqlx::query_as::<_, Adoption>(&query)
            .bind(animal_id)
            .bind(organization_id)
            .fetch_optional(pool)
            .await
    }

    /// Update the animal's status with version bump and audit entry.
    /// Caller owns the transaction and has already validated the edge.
    async fn set_animal_status(
        tx: &mut Transaction<'_, Postgres>,
        organization_id: DbId,
        actor_id: DbId,
        animal: &Animal,
        new_status: &str,
    ) -> DbResult<Animal> {
        let updated = sqlx::query_as::<_, Animal>(
            "UPDATE animals \
             SET status = $1, version = version + 1, updated_at = now() \
             WHERE id = $2 \
             RETURNING id, organization_id, name, species, status, intake_date, kennel, \
                       microchip, attributes_json, version, created_at, updated_at",
        )
        .bind(new_status)
        .bind(animal.id)
        .fetch_one(&mut **tx)
        .await?;

        AuditLogRepo::append_tx(
            tx,
            &CreateAuditEntry {
                organization_id,
                actor_id: Some(actor_id),
                action: actions::ANIMAL_STATUS_CHANGE.to_string(),
                entity_type: entity_types::ANIMAL.to_string(),
                entity_id: animal.id,
                details_json: change_snapshot(
                    &serde_json::json!({ "status": animal.status }),
                    &serde_json::json!({ "status": updated.status }),
                ),
            },
        )
        .await?;

        Ok(updated)
    }
}
