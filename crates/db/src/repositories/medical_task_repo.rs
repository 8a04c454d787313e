//! Repository for the `medical_tasks` and `medical_records` tables.
//!
//! Completion and cancellation are dedicated operations so their side
//! effects (record snapshot, recurrence follow-up) cannot be skipped by a
//! generic update. `batch_complete` is the one deliberately non-atomic
//! operation in this crate.

use sqlx::{PgPool, Postgres, Transaction};

use pawhaven_core::audit::{actions, change_snapshot, creation_snapshot, entity_types};
use pawhaven_core::error::CoreError;
use pawhaven_core::medical::{
    classify, is_terminal_task_status, validate_working_status, RecurrencePolicy,
    TaskClassification, VALID_TASK_TYPES,
};
use pawhaven_core::types::{DateOnly, DbId};

use crate::error::DbResult;
use crate::models::audit::CreateAuditEntry;
use crate::models::medical::{
    BatchCompleteResult, BatchFailure, ClassifiedTask, CompleteTaskResult, CreateMedicalTask,
    MedicalRecord, MedicalTask, UpdateMedicalTask,
};
use crate::repositories::AuditLogRepo;

/// Column list for medical_tasks queries.
const COLUMNS: &str = "\
    id, organization_id, animal_id, task_type, status, due_date, assigned_to, \
    notes, version, created_at, updated_at";

/// Column list for medical_records queries.
const RECORD_COLUMNS: &str = "\
    id, organization_id, animal_id, task_id, record_type, performed_on, \
    performed_by, details_json, created_at";

/// Provides scheduling, completion, and due-listing for medical tasks.
pub struct MedicalTaskRepo;

impl MedicalTaskRepo {
    /// Schedule a task for an animal. The animal must resolve within the
    /// tenant. Audited.
    pub async fn create(
        pool: &PgPool,
        organization_id: DbId,
        actor_id: DbId,
        animal_id: DbId,
        input: &CreateMedicalTask,
    ) -> DbResult<MedicalTask> {
        if !VALID_TASK_TYPES.contains(&input.task_type.as_str()) {
            return Err(CoreError::Validation(format!(
                "Invalid task type '{}'. Must be one of: {}",
                input.task_type,
                VALID_TASK_TYPES.join(", ")
            ))
            .into());
        }

        let mut tx = pool.begin().await?;

        let animal_exists: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM animals WHERE id = $1 AND organization_id = $2",
        )
        .bind(animal_id)
        .bind(organization_id)
        .fetch_one(&mut *tx)
        .await?;
        if animal_exists == 0 {
            return Err(CoreError::NotFound {
                entity: "Animal",
                id: animal_id,
            }
            .into());
        }

        let task = Self::insert_task(
            &mut tx,
            organization_id,
            animal_id,
            &input.task_type,
            input.due_date,
            input.assigned_to,
            input.notes.as_deref(),
        )
        .await?;

        AuditLogRepo::append_tx(
            &mut tx,
            &CreateAuditEntry {
                organization_id,
                actor_id: Some(actor_id),
                action: actions::TASK_CREATE.to_string(),
                entity_type: entity_types::MEDICAL_TASK.to_string(),
                entity_id: task.id,
                details_json: creation_snapshot(&serde_json::json!({
                    "animal_id": animal_id,
                    "task_type": task.task_type,
                    "due_date": task.due_date,
                })),
            },
        )
        .await?;

        tx.commit().await?;
        Ok(task)
    }

    /// Find a task by id within a tenant.
    pub async fn find_by_id(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
    ) -> Result<Option<MedicalTask>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM medical_tasks WHERE id = $1 AND organization_id = $2");
        sqlx::query_as::<_, MedicalTask>(&query)
            .bind(id)
            .bind(organization_id)
            .fetch_optional(pool)
            .await
    }

    /// Complete a task: set `completed`, snapshot a medical record, and
    /// spawn the recurrence follow-up, in one transaction.
    ///
    /// Fails `AlreadyTerminal` when the task is already completed or
    /// cancelled; the first completion's side effects are untouched by
    /// later attempts.
    pub async fn complete(
        pool: &PgPool,
        organization_id: DbId,
        actor_id: DbId,
        task_id: DbId,
        completed_on: DateOnly,
        policy: &RecurrencePolicy,
    ) -> DbResult<CompleteTaskResult> {
        let mut tx = pool.begin().await?;

        let task = Self::lock_row(&mut tx, organization_id, task_id).await?;
        if is_terminal_task_status(&task.status) {
            return Err(CoreError::AlreadyTerminal {
                entity: "MedicalTask",
                id: task_id,
            }
            .into());
        }

        let query = format!(
            "UPDATE medical_tasks \
             SET status = 'completed', version = version + 1, updated_at = now() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let completed = sqlx::query_as::<_, MedicalTask>(&query)
            .bind(task_id)
            .fetch_one(&mut *tx)
            .await?;

        let query = format!(
            "INSERT INTO medical_records \
                (organization_id, animal_id, task_id, record_type, performed_on, \
                 performed_by, details_json) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {RECORD_COLUMNS}"
        );
        let record = sqlx::query_as::<_, MedicalRecord>(&query)
            .bind(organization_id)
            .bind(completed.animal_id)
            .bind(task_id)
            .bind(&completed.task_type)
            .bind(completed_on)
            .bind(actor_id)
            .bind(serde_json::json!({
                "task_type": completed.task_type,
                "due_date": completed.due_date,
                "notes": completed.notes,
            }))
            .fetch_one(&mut *tx)
            .await?;

        let follow_up = Self::insert_task(
            &mut tx,
            organization_id,
            completed.animal_id,
            &completed.task_type,
            policy.follow_up_due(&completed.task_type, completed_on),
            completed.assigned_to,
            None,
        )
        .await?;

        AuditLogRepo::append_tx(
            &mut tx,
            &CreateAuditEntry {
                organization_id,
                actor_id: Some(actor_id),
                action: actions::TASK_COMPLETE.to_string(),
                entity_type: entity_types::MEDICAL_TASK.to_string(),
                entity_id: task_id,
                details_json: serde_json::json!({
                    "before": { "status": task.status },
                    "after": {
                        "status": completed.status,
                        "record_id": record.id,
                        "follow_up_id": follow_up.id,
                    },
                }),
            },
        )
        .await?;

        tx.commit().await?;
        tracing::info!(task_id, follow_up_id = follow_up.id, "Medical task completed");
        Ok(CompleteTaskResult {
            task: completed,
            record,
            follow_up,
        })
    }

    /// Cancel a task. Same terminal guard as completion, but no record
    /// snapshot and no follow-up.
    pub async fn cancel(
        pool: &PgPool,
        organization_id: DbId,
        actor_id: DbId,
        task_id: DbId,
    ) -> DbResult<MedicalTask> {
        let mut tx = pool.begin().await?;

        let task = Self::lock_row(&mut tx, organization_id, task_id).await?;
        if is_terminal_task_status(&task.status) {
            return Err(CoreError::AlreadyTerminal {
                entity: "MedicalTask",
                id: task_id,
            }
            .into());
        }

        let query = format!(
            "UPDATE medical_tasks \
             SET status = 'cancelled', version = version + 1, updated_at = now() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let cancelled = sqlx::query_as::<_, MedicalTask>(&query)
            .bind(task_id)
            .fetch_one(&mut *tx)
            .await?;

        AuditLogRepo::append_tx(
            &mut tx,
            &CreateAuditEntry {
                organization_id,
                actor_id: Some(actor_id),
                action: actions::TASK_CANCEL.to_string(),
                entity_type: entity_types::MEDICAL_TASK.to_string(),
                entity_id: task_id,
                details_json: change_snapshot(
                    &serde_json::json!({ "status": task.status }),
                    &serde_json::json!({ "status": cancelled.status }),
                ),
            },
        )
        .await?;

        tx.commit().await?;
        Ok(cancelled)
    }

    /// Reschedule, reassign, or move a task among non-terminal statuses.
    pub async fn update(
        pool: &PgPool,
        organization_id: DbId,
        actor_id: DbId,
        task_id: DbId,
        input: &UpdateMedicalTask,
    ) -> DbResult<MedicalTask> {
        if let Some(ref status) = input.status {
            validate_working_status(status)?;
        }

        let mut tx = pool.begin().await?;

        let task = Self::lock_row(&mut tx, organization_id, task_id).await?;
        if is_terminal_task_status(&task.status) {
            return Err(CoreError::AlreadyTerminal {
                entity: "MedicalTask",
                id: task_id,
            }
            .into());
        }
        if let Some(expected) = input.expected_version {
            if expected != task.version {
                return Err(CoreError::ConcurrentModification {
                    entity: "MedicalTask",
                    id: task_id,
                }
                .into());
            }
        }

        let query = format!(
            "UPDATE medical_tasks SET \
                status = COALESCE($1, status), \
                due_date = COALESCE($2, due_date), \
                assigned_to = COALESCE($3, assigned_to), \
                notes = COALESCE($4, notes), \
                version = version + 1, \
                updated_at = now() \
             WHERE id = $5 \
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, MedicalTask>(&query)
            .bind(&input.status)
            .bind(input.due_date)
            .bind(input.assigned_to)
            .bind(&input.notes)
            .bind(task_id)
            .fetch_one(&mut *tx)
            .await?;

        AuditLogRepo::append_tx(
            &mut tx,
            &CreateAuditEntry {
                organization_id,
                actor_id: Some(actor_id),
                action: actions::TASK_UPDATE.to_string(),
                entity_type: entity_types::MEDICAL_TASK.to_string(),
                entity_id: task_id,
                details_json: change_snapshot(
                    &serde_json::json!({
                        "status": task.status,
                        "due_date": task.due_date,
                        "assigned_to": task.assigned_to,
                    }),
                    &serde_json::json!({
                        "status": updated.status,
                        "due_date": updated.due_date,
                        "assigned_to": updated.assigned_to,
                    }),
                ),
            },
        )
        .await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Complete several tasks independently. Non-atomic by design: each
    /// task runs in its own transaction and a failure is collected, not
    /// propagated, so one `AlreadyTerminal` does not roll back siblings.
    pub async fn batch_complete(
        pool: &PgPool,
        organization_id: DbId,
        actor_id: DbId,
        task_ids: &[DbId],
        completed_on: DateOnly,
        policy: &RecurrencePolicy,
    ) -> DbResult<BatchCompleteResult> {
        let mut updated = 0usize;
        let mut failures = Vec::new();

        for &task_id in task_ids {
            match Self::complete(pool, organization_id, actor_id, task_id, completed_on, policy)
                .await
            {
                Ok(_) => updated += 1,
                Err(err) => failures.push(BatchFailure {
                    task_id,
                    reason: err.code().to_string(),
                }),
            }
        }

        Ok(BatchCompleteResult { updated, failures })
    }

    /// List an animal's tasks with their read-time classification.
    pub async fn list_for_animal(
        pool: &PgPool,
        organization_id: DbId,
        animal_id: DbId,
        as_of: DateOnly,
    ) -> Result<Vec<ClassifiedTask>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM medical_tasks \
             WHERE animal_id = $1 AND organization_id = $2 \
             ORDER BY due_date ASC, id ASC"
        );
        let tasks = sqlx::query_as::<_, MedicalTask>(&query)
            .bind(animal_id)
            .bind(organization_id)
            .fetch_all(pool)
            .await?;

        Ok(tasks.into_iter().map(|t| classify_task(t, as_of)).collect())
    }

    /// List tasks due or overdue as of the given date: non-terminal tasks
    /// with `due_date <= as_of`, classified at query time.
    pub async fn list_due(
        pool: &PgPool,
        organization_id: DbId,
        as_of: DateOnly,
    ) -> Result<Vec<ClassifiedTask>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM medical_tasks \
             WHERE organization_id = $1 \
               AND status NOT IN ('completed', 'cancelled') \
               AND due_date <= $2 \
             ORDER BY due_date ASC, id ASC"
        );
        let tasks = sqlx::query_as::<_, MedicalTask>(&query)
            .bind(organization_id)
            .bind(as_of)
            .fetch_all(pool)
            .await?;

        Ok(tasks.into_iter().map(|t| classify_task(t, as_of)).collect())
    }

    /// Lock a task row for update, scoped to the tenant.
    async fn lock_row(
        tx: &mut Transaction<'_, Postgres>,
        organization_id: DbId,
        task_id: DbId,
    ) -> DbResult<MedicalTask> {
        let query = format!(
            "SELECT {COLUMNS} FROM medical_tasks \
             WHERE id = $1 AND organization_id = $2 FOR UPDATE"
        );
        sqlx::query_as::<_, MedicalTask>(&query)
            .bind(task_id)
            .bind(organization_id)
            .fetch_optional(&mut **tx)
            .await?
            .ok_or_else(|| {
                CoreError::NotFound {
                    entity: "MedicalTask",
                    id: task_id,
                }
                .into()
            })
    }

    /// Insert a `scheduled` task row. Caller owns the transaction.
    async fn insert_task(
        tx: &mut Transaction<'_, Postgres>,
        organization_id: DbId,
        animal_id: DbId,
        task_type: &str,
        due_date: DateOnly,
        assigned_to: Option<DbId>,
        notes: Option<&str>,
    ) -> Result<MedicalTask, sqlx::Error> {
        let query = format!(
            "INSERT INTO medical_tasks \
                (organization_id, animal_id, task_type, due_date, assigned_to, notes) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MedicalTask>(&query)
            .bind(organization_id)
            .bind(animal_id)
            .bind(task_type)
            .bind(due_date)
            .bind(assigned_to)
            .bind(notes)
            .fetch_one(&mut **tx)
            .await
    }
}

fn classify_task(task: MedicalTask, as_of: DateOnly) -> ClassifiedTask {
    let classification: TaskClassification = classify(&task.status, task.due_date, as_of);
    ClassifiedTask {
        task,
        classification,
    }
}
