//! Repository for the `animals`, `intakes`, and `outcomes` tables.
//!
//! Status changes go through [`AnimalRepo::transition`], which validates the
//! lifecycle state machine and performs all dependent writes (outcome
//! creation, foster closure, audit append) in one transaction.

use sqlx::{PgPool, Postgres, Transaction};

use pawhaven_core::animal::{
    initial_status, is_terminal, outcome_type_for, validate_transition, STATUS_FOSTERED,
};
use pawhaven_core::audit::{actions, change_snapshot, creation_snapshot, entity_types};
use pawhaven_core::error::CoreError;
use pawhaven_core::placement::{validate_close_status, ASSIGNMENT_COMPLETED};
use pawhaven_core::types::{DateOnly, DbId};

use crate::error::DbResult;
use crate::models::animal::{
    Animal, CreateIntake, Intake, Outcome, TransitionAnimal, TransitionResult,
};
use crate::models::audit::CreateAuditEntry;
use crate::repositories::AuditLogRepo;

/// Column list for animals queries.
const COLUMNS: &str = "\
    id, organization_id, name, species, status, intake_date, kennel, \
    microchip, attributes_json, version, created_at, updated_at";

/// Column list for intakes queries.
const INTAKE_COLUMNS: &str = "\
    id, organization_id, animal_id, intake_type, intake_date, medical_hold, \
    notes, created_at";

/// Column list for outcomes queries.
const OUTCOME_COLUMNS: &str = "\
    id, organization_id, animal_id, outcome_type, outcome_date, notes, created_at";

/// Provides intake, lookup, and guarded status transitions for animals.
pub struct AnimalRepo;

impl AnimalRepo {
    /// Intake a new animal: insert the animal and its immutable intake
    /// record, and audit, in one transaction.
    ///
    /// Initial status is `hold` when the intake specifies a medical hold,
    /// `available` otherwise.
    pub async fn intake(
        pool: &PgPool,
        organization_id: DbId,
        actor_id: DbId,
        input: &CreateIntake,
    ) -> DbResult<(Animal, Intake)> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO animals \
                (organization_id, name, species, status, intake_date, kennel, \
                 microchip, attributes_json) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {COLUMNS}"
        );
        let animal = sqlx::query_as::<_, Animal>(&query)
            .bind(organization_id)
            .bind(&input.name)
            .bind(&input.species)
            .bind(initial_status(input.medical_hold))
            .bind(input.intake_date)
            .bind(&input.kennel)
            .bind(&input.microchip)
            .bind(
                input
                    .attributes_json
                    .clone()
                    .unwrap_or_else(|| serde_json::json!({})),
            )
            .fetch_one(&mut *tx)
            .await?;

        let query = format!(
            "INSERT INTO intakes \
                (organization_id, animal_id, intake_type, intake_date, medical_hold, notes) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {INTAKE_COLUMNS}"
        );
        let intake = sqlx::query_as::<_, Intake>(&query)
            .bind(organization_id)
            .bind(animal.id)
            .bind(&input.intake_type)
            .bind(input.intake_date)
            .bind(input.medical_hold)
            .bind(&input.notes)
            .fetch_one(&mut *tx)
            .await?;

        AuditLogRepo::append_tx(
            &mut tx,
            &CreateAuditEntry {
                organization_id,
                actor_id: Some(actor_id),
                action: actions::ANIMAL_INTAKE.to_string(),
                entity_type: entity_types::ANIMAL.to_string(),
                entity_id: animal.id,
                details_json: creation_snapshot(&serde_json::json!({
                    "name": animal.name,
                    "species": animal.species,
                    "status": animal.status,
                    "intake_type": intake.intake_type,
                })),
            },
        )
        .await?;

        tx.commit().await?;
        tracing::info!(animal_id = animal.id, organization_id, "Animal intaken");
        Ok((animal, intake))
    }

    /// Find an animal by id within a tenant.
    pub async fn find_by_id(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
    ) -> Result<Option<Animal>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM animals WHERE id = $1 AND organization_id = $2");
        sqlx::query_as::<_, Animal>(&query)
            .bind(id)
            .bind(organization_id)
            .fetch_optional(pool)
            .await
    }

    /// List a tenant's animals, optionally filtered by status.
    pub async fn list(
        pool: &PgPool,
        organization_id: DbId,
        status: Option<&str>,
    ) -> Result<Vec<Animal>, sqlx::Error> {
        match status {
            Some(status) => {
                let query = format!(
                    "SELECT {COLUMNS} FROM animals \
                     WHERE organization_id = $1 AND status = $2 \
                     ORDER BY intake_date DESC, id DESC"
                );
                sqlx::query_as::<_, Animal>(&query)
                    .bind(organization_id)
                    .bind(status)
                    .fetch_all(pool)
                    .await
            }
            None => {
                let query = format!(
                    "SELECT {COLUMNS} FROM animals \
                     WHERE organization_id = $1 \
                     ORDER BY intake_date DESC, id DESC"
                );
                sqlx::query_as::<_, Animal>(&query)
                    .bind(organization_id)
                    .fetch_all(pool)
                    .await
            }
        }
    }

    /// Fetch the intake record for an animal.
    pub async fn find_intake(
        pool: &PgPool,
        organization_id: DbId,
        animal_id: DbId,
    ) -> Result<Option<Intake>, sqlx::Error> {
        let query = format!(
            "SELECT {INTAKE_COLUMNS} FROM intakes \
             WHERE animal_id = $1 AND organization_id = $2"
        );
        sqlx::query_as::<_, Intake>(&query)
            .bind(animal_id)
            .bind(organization_id)
            .fetch_optional(pool)
            .await
    }

    /// Fetch the outcome record for an animal, if it has reached one.
    pub async fn find_outcome(
        pool: &PgPool,
        organization_id: DbId,
        animal_id: DbId,
    ) -> Result<Option<Outcome>, sqlx::Error> {
        let query = format!(
            "SELECT {OUTCOME_COLUMNS} FROM outcomes \
             WHERE animal_id = $1 AND organization_id = $2"
        );
        sqlx::query_as::<_, Outcome>(&query)
            .bind(animal_id)
            .bind(organization_id)
            .fetch_optional(pool)
            .await
    }

    /// Perform a guarded status transition.
    ///
    /// One transaction: lock the row, validate the edge, close the active
    /// foster assignment when leaving `fostered`, create exactly one outcome
    /// when entering a terminal status, bump the version, audit, commit.
    ///
    /// Transitioning directly *into* `fostered` requires an active
    /// assignment to already exist; placement is the operation that creates
    /// one.
    pub async fn transition(
        pool: &PgPool,
        organization_id: DbId,
        actor_id: DbId,
        animal_id: DbId,
        input: &TransitionAnimal,
    ) -> DbResult<TransitionResult> {
        let mut tx = pool.begin().await?;

        let animal = Self::lock_row(&mut tx, organization_id, animal_id).await?;

        if let Some(expected) = input.expected_version {
            if expected != animal.version {
                return Err(CoreError::ConcurrentModification {
                    entity: "Animal",
                    id: animal_id,
                }
                .into());
            }
        }

        validate_transition(animal_id, &animal.status, &input.new_status)?;

        if input.new_status == STATUS_FOSTERED {
            let active: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM foster_assignments \
                 WHERE animal_id = $1 AND status = 'active'",
            )
            .bind(animal_id)
            .fetch_one(&mut *tx)
            .await?;
            if active == 0 {
                return Err(CoreError::Validation(
                    "Animal has no active foster assignment; use foster placement".into(),
                )
                .into());
            }
        }

        if animal.status == STATUS_FOSTERED {
            let close_status = input
                .foster_close_status
                .as_deref()
                .unwrap_or(ASSIGNMENT_COMPLETED);
            validate_close_status(close_status)?;
            Self::close_active_assignment(&mut tx, organization_id, actor_id, animal_id, close_status)
                .await?;
        }

        let outcome = if is_terminal(&input.new_status) {
            Some(
                Self::record_outcome(
                    &mut tx,
                    organization_id,
                    actor_id,
                    animal_id,
                    &input.new_status,
                    input.outcome_date,
                    input.outcome_notes.as_deref(),
                )
                .await?,
            )
        } else {
            None
        };

        let query = format!(
            "UPDATE animals \
             SET status = $1, version = version + 1, updated_at = now() \
             WHERE id = $2 \
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Animal>(&query)
            .bind(&input.new_status)
            .bind(animal_id)
            .fetch_one(&mut *tx)
            .await?;

        AuditLogRepo::append_tx(
            &mut tx,
            &CreateAuditEntry {
                organization_id,
                actor_id: Some(actor_id),
                action: actions::ANIMAL_STATUS_CHANGE.to_string(),
                entity_type: entity_types::ANIMAL.to_string(),
                entity_id: animal_id,
                details_json: change_snapshot(
                    &serde_json::json!({ "status": animal.status }),
                    &serde_json::json!({ "status": updated.status }),
                ),
            },
        )
        .await?;

        tx.commit().await?;
        tracing::info!(
            animal_id,
            from = %animal.status,
            to = %updated.status,
            "Animal status changed"
        );
        Ok(TransitionResult {
            animal: updated,
            outcome,
        })
    }

    /// Lock an animal row for update, scoped to the tenant.
    pub(crate) async fn lock_row(
        tx: &mut Transaction<'_, Postgres>,
        organization_id: DbId,
        animal_id: DbId,
    ) -> DbResult<Animal> {
        let query = format!(
            "SELECT {COLUMNS} FROM animals \
             WHERE id = $1 AND organization_id = $2 FOR UPDATE"
        );
        sqlx::query_as::<_, Animal>(&query)
            .bind(animal_id)
            .bind(organization_id)
            .fetch_optional(&mut **tx)
            .await?
            .ok_or_else(|| {
                CoreError::NotFound {
                    entity: "Animal",
                    id: animal_id,
                }
                .into()
            })
    }

    /// Insert the single outcome row for an animal entering a terminal
    /// status, with its own audit entry. Caller owns the transaction.
    pub(crate) async fn record_outcome(
        tx: &mut Transaction<'_, Postgres>,
        organization_id: DbId,
        actor_id: DbId,
        animal_id: DbId,
        terminal_status: &str,
        outcome_date: Option<DateOnly>,
        notes: Option<&str>,
    ) -> DbResult<Outcome> {
        let outcome_type = outcome_type_for(terminal_status).ok_or_else(|| {
            CoreError::Internal(format!("No outcome type for status '{terminal_status}'"))
        })?;

        let query = format!(
            "INSERT INTO outcomes \
                (organization_id, animal_id, outcome_type, outcome_date, notes) \
             VALUES ($1, $2, $3, COALESCE($4, CURRENT_DATE), $5) \
             RETURNING {OUTCOME_COLUMNS}"
        );
        let outcome = sqlx::query_as::<_, Outcome>(&query)
            .bind(organization_id)
            .bind(animal_id)
            .bind(outcome_type)
            .bind(outcome_date)
            .bind(notes)
            .fetch_one(&mut **tx)
            .await?;

        AuditLogRepo::append_tx(
            tx,
            &CreateAuditEntry {
                organization_id,
                actor_id: Some(actor_id),
                action: actions::OUTCOME_RECORD.to_string(),
                entity_type: entity_types::OUTCOME.to_string(),
                entity_id: outcome.id,
                details_json: creation_snapshot(&serde_json::json!({
                    "animal_id": animal_id,
                    "outcome_type": outcome.outcome_type,
                    "outcome_date": outcome.outcome_date,
                })),
            },
        )
        .await?;

        Ok(outcome)
    }

    /// Close the active foster assignment for an animal, with its own audit
    /// entry. Caller owns the transaction.
    pub(crate) async fn close_active_assignment(
        tx: &mut Transaction<'_, Postgres>,
        organization_id: DbId,
        actor_id: DbId,
        animal_id: DbId,
        close_status: &str,
    ) -> DbResult<()> {
        let closed: Option<(DbId,)> = sqlx::query_as(
            "UPDATE foster_assignments \
             SET status = $1, end_date = CURRENT_DATE, updated_at = now() \
             WHERE animal_id = $2 AND organization_id = $3 AND status = 'active' \
             RETURNING id",
        )
        .bind(close_status)
        .bind(animal_id)
        .bind(organization_id)
        .fetch_optional(&mut **tx)
        .await?;

        if let Some((assignment_id,)) = closed {
            AuditLogRepo::append_tx(
                tx,
                &CreateAuditEntry {
                    organization_id,
                    actor_id: Some(actor_id),
                    action: actions::FOSTER_END.to_string(),
                    entity_type: entity_types::FOSTER_ASSIGNMENT.to_string(),
                    entity_id: assignment_id,
                    details_json: change_snapshot(
                        &serde_json::json!({ "status": "active" }),
                        &serde_json::json!({ "status": close_status }),
                    ),
                },
            )
            .await?;
        }

        Ok(())
    }
}
