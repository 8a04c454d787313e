//! Integration tests for the medical compliance engine: scheduling,
//! completion side effects, recurrence, batch partial failure, and
//! due listings.

mod common;

use assert_matches::assert_matches;
use sqlx::PgPool;

use common::{date, seed_animal, seed_tenant};
use pawhaven_core::error::CoreError;
use pawhaven_core::medical::{RecurrencePolicy, TaskClassification};
use pawhaven_db::error::DbError;
use pawhaven_db::models::medical::{CreateMedicalTask, UpdateMedicalTask};
use pawhaven_db::repositories::MedicalTaskRepo;

fn new_task(task_type: &str, due: chrono::NaiveDate) -> CreateMedicalTask {
    CreateMedicalTask {
        task_type: task_type.to_string(),
        due_date: due,
        assigned_to: None,
        notes: None,
    }
}

async fn record_count(pool: &PgPool, animal_id: i64) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM medical_records WHERE animal_id = $1")
        .bind(animal_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

// ---------------------------------------------------------------------------
// Scheduling
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn create_schedules_a_task(pool: PgPool) {
    let tenant = seed_tenant(&pool, "shelter").await;
    let animal = seed_animal(&pool, &tenant, "Biscuit").await;

    let task = MedicalTaskRepo::create(
        &pool,
        tenant.org_id,
        tenant.admin_id,
        animal.id,
        &new_task("vaccine", date(2024, 1, 10)),
    )
    .await
    .unwrap();

    assert_eq!(task.status, "scheduled");
    assert_eq!(task.due_date, date(2024, 1, 10));
}

#[sqlx::test(migrations = "./migrations")]
async fn create_for_unknown_animal_fails_not_found(pool: PgPool) {
    let tenant = seed_tenant(&pool, "shelter").await;

    let err = MedicalTaskRepo::create(
        &pool,
        tenant.org_id,
        tenant.admin_id,
        9999,
        &new_task("vaccine", date(2024, 1, 10)),
    )
    .await
    .unwrap_err();
    assert_matches!(err, DbError::Core(CoreError::NotFound { entity: "Animal", .. }));
}

#[sqlx::test(migrations = "./migrations")]
async fn create_rejects_unknown_task_type(pool: PgPool) {
    let tenant = seed_tenant(&pool, "shelter").await;
    let animal = seed_animal(&pool, &tenant, "Biscuit").await;

    let err = MedicalTaskRepo::create(
        &pool,
        tenant.org_id,
        tenant.admin_id,
        animal.id,
        &new_task("grooming", date(2024, 1, 10)),
    )
    .await
    .unwrap_err();
    assert_matches!(err, DbError::Core(CoreError::Validation(_)));
}

// ---------------------------------------------------------------------------
// Completion and recurrence
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn completing_a_vaccine_spawns_a_follow_up_in_twelve_months(pool: PgPool) {
    let tenant = seed_tenant(&pool, "shelter").await;
    let animal = seed_animal(&pool, &tenant, "Biscuit").await;
    let policy = RecurrencePolicy::default();

    let task = MedicalTaskRepo::create(
        &pool,
        tenant.org_id,
        tenant.admin_id,
        animal.id,
        &new_task("vaccine", date(2024, 1, 10)),
    )
    .await
    .unwrap();

    let result = MedicalTaskRepo::complete(
        &pool,
        tenant.org_id,
        tenant.admin_id,
        task.id,
        date(2024, 1, 10),
        &policy,
    )
    .await
    .unwrap();

    assert_eq!(result.task.status, "completed");
    assert_eq!(result.record.task_id, Some(task.id));
    assert_eq!(result.record.performed_on, date(2024, 1, 10));
    assert_eq!(result.follow_up.status, "scheduled");
    assert_eq!(result.follow_up.due_date, date(2025, 1, 10));
    assert_eq!(result.follow_up.task_type, "vaccine");
}

#[sqlx::test(migrations = "./migrations")]
async fn double_complete_fails_and_leaves_first_side_effects_untouched(pool: PgPool) {
    let tenant = seed_tenant(&pool, "shelter").await;
    let animal = seed_animal(&pool, &tenant, "Biscuit").await;
    let policy = RecurrencePolicy::default();

    let task = MedicalTaskRepo::create(
        &pool,
        tenant.org_id,
        tenant.admin_id,
        animal.id,
        &new_task("exam", date(2024, 2, 1)),
    )
    .await
    .unwrap();

    MedicalTaskRepo::complete(
        &pool,
        tenant.org_id,
        tenant.admin_id,
        task.id,
        date(2024, 2, 1),
        &policy,
    )
    .await
    .unwrap();
    let records_after_first = record_count(&pool, animal.id).await;

    let err = MedicalTaskRepo::complete(
        &pool,
        tenant.org_id,
        tenant.admin_id,
        task.id,
        date(2024, 2, 2),
        &policy,
    )
    .await
    .unwrap_err();
    assert_matches!(err, DbError::Core(CoreError::AlreadyTerminal { .. }));

    // No extra record, no extra follow-up.
    assert_eq!(record_count(&pool, animal.id).await, records_after_first);
    let task_total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM medical_tasks WHERE animal_id = $1")
        .bind(animal.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(task_total, 2, "original plus one follow-up");
}

#[sqlx::test(migrations = "./migrations")]
async fn cancel_spawns_nothing(pool: PgPool) {
    let tenant = seed_tenant(&pool, "shelter").await;
    let animal = seed_animal(&pool, &tenant, "Biscuit").await;

    let task = MedicalTaskRepo::create(
        &pool,
        tenant.org_id,
        tenant.admin_id,
        animal.id,
        &new_task("checkup", date(2024, 2, 1)),
    )
    .await
    .unwrap();

    let cancelled = MedicalTaskRepo::cancel(&pool, tenant.org_id, tenant.admin_id, task.id)
        .await
        .unwrap();
    assert_eq!(cancelled.status, "cancelled");

    assert_eq!(record_count(&pool, animal.id).await, 0);
    let task_total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM medical_tasks WHERE animal_id = $1")
        .bind(animal.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(task_total, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn update_cannot_touch_a_terminal_task(pool: PgPool) {
    let tenant = seed_tenant(&pool, "shelter").await;
    let animal = seed_animal(&pool, &tenant, "Biscuit").await;

    let task = MedicalTaskRepo::create(
        &pool,
        tenant.org_id,
        tenant.admin_id,
        animal.id,
        &new_task("other", date(2024, 2, 1)),
    )
    .await
    .unwrap();
    MedicalTaskRepo::cancel(&pool, tenant.org_id, tenant.admin_id, task.id)
        .await
        .unwrap();

    let err = MedicalTaskRepo::update(
        &pool,
        tenant.org_id,
        tenant.admin_id,
        task.id,
        &UpdateMedicalTask {
            status: None,
            due_date: Some(date(2024, 3, 1)),
            assigned_to: None,
            notes: None,
            expected_version: None,
        },
    )
    .await
    .unwrap_err();
    assert_matches!(err, DbError::Core(CoreError::AlreadyTerminal { .. }));
}

#[sqlx::test(migrations = "./migrations")]
async fn update_cannot_set_a_terminal_status_directly(pool: PgPool) {
    let tenant = seed_tenant(&pool, "shelter").await;
    let animal = seed_animal(&pool, &tenant, "Biscuit").await;

    let task = MedicalTaskRepo::create(
        &pool,
        tenant.org_id,
        tenant.admin_id,
        animal.id,
        &new_task("treatment", date(2024, 2, 1)),
    )
    .await
    .unwrap();

    let err = MedicalTaskRepo::update(
        &pool,
        tenant.org_id,
        tenant.admin_id,
        task.id,
        &UpdateMedicalTask {
            status: Some("completed".to_string()),
            due_date: None,
            assigned_to: None,
            notes: None,
            expected_version: None,
        },
    )
    .await
    .unwrap_err();
    assert_matches!(err, DbError::Core(CoreError::Validation(_)));
}

// ---------------------------------------------------------------------------
// Batch completion: partial failure, no rollback of siblings
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn batch_complete_reports_partial_failure(pool: PgPool) {
    let tenant = seed_tenant(&pool, "shelter").await;
    let animal = seed_animal(&pool, &tenant, "Biscuit").await;
    let policy = RecurrencePolicy::default();

    let a = MedicalTaskRepo::create(
        &pool,
        tenant.org_id,
        tenant.admin_id,
        animal.id,
        &new_task("vaccine", date(2024, 1, 10)),
    )
    .await
    .unwrap();
    let b = MedicalTaskRepo::create(
        &pool,
        tenant.org_id,
        tenant.admin_id,
        animal.id,
        &new_task("exam", date(2024, 1, 10)),
    )
    .await
    .unwrap();

    // B is already completed before the batch runs.
    MedicalTaskRepo::complete(
        &pool,
        tenant.org_id,
        tenant.admin_id,
        b.id,
        date(2024, 1, 10),
        &policy,
    )
    .await
    .unwrap();

    let result = MedicalTaskRepo::batch_complete(
        &pool,
        tenant.org_id,
        tenant.admin_id,
        &[a.id, b.id],
        date(2024, 1, 11),
        &policy,
    )
    .await
    .unwrap();

    assert_eq!(result.updated, 1);
    assert_eq!(result.failures.len(), 1);
    assert_eq!(result.failures[0].task_id, b.id);
    assert_eq!(result.failures[0].reason, "ALREADY_TERMINAL");

    // A's completion survived B's failure.
    let a_after = MedicalTaskRepo::find_by_id(&pool, tenant.org_id, a.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(a_after.status, "completed");
}

// ---------------------------------------------------------------------------
// Due listings
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn list_due_classifies_at_query_time(pool: PgPool) {
    let tenant = seed_tenant(&pool, "shelter").await;
    let animal = seed_animal(&pool, &tenant, "Biscuit").await;

    MedicalTaskRepo::create(
        &pool,
        tenant.org_id,
        tenant.admin_id,
        animal.id,
        &new_task("vaccine", date(2024, 1, 9)),
    )
    .await
    .unwrap();
    MedicalTaskRepo::create(
        &pool,
        tenant.org_id,
        tenant.admin_id,
        animal.id,
        &new_task("exam", date(2024, 1, 10)),
    )
    .await
    .unwrap();
    MedicalTaskRepo::create(
        &pool,
        tenant.org_id,
        tenant.admin_id,
        animal.id,
        &new_task("checkup", date(2024, 1, 20)),
    )
    .await
    .unwrap();

    let due = MedicalTaskRepo::list_due(&pool, tenant.org_id, date(2024, 1, 10))
        .await
        .unwrap();

    // The upcoming task is not in the due listing.
    assert_eq!(due.len(), 2);
    assert_eq!(due[0].classification, TaskClassification::Overdue);
    assert_eq!(due[1].classification, TaskClassification::DueToday);
}

#[sqlx::test(migrations = "./migrations")]
async fn list_for_animal_includes_all_classifications(pool: PgPool) {
    let tenant = seed_tenant(&pool, "shelter").await;
    let animal = seed_animal(&pool, &tenant, "Biscuit").await;
    let policy = RecurrencePolicy::default();

    let task = MedicalTaskRepo::create(
        &pool,
        tenant.org_id,
        tenant.admin_id,
        animal.id,
        &new_task("treatment", date(2024, 1, 5)),
    )
    .await
    .unwrap();
    MedicalTaskRepo::complete(
        &pool,
        tenant.org_id,
        tenant.admin_id,
        task.id,
        date(2024, 1, 5),
        &policy,
    )
    .await
    .unwrap();

    let tasks = MedicalTaskRepo::list_for_animal(&pool, tenant.org_id, animal.id, date(2024, 1, 6))
        .await
        .unwrap();

    // Completed original plus its scheduled follow-up (due Jan 12).
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].classification, TaskClassification::Completed);
    assert_eq!(tasks[1].classification, TaskClassification::Upcoming);
}
