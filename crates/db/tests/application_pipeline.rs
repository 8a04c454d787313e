//! Integration tests for the application pipeline state machine.

mod common;

use assert_matches::assert_matches;
use sqlx::PgPool;

use common::{seed_animal, seed_person, seed_tenant, Tenant};
use pawhaven_core::error::CoreError;
use pawhaven_db::error::DbError;
use pawhaven_db::models::application::{Application, CreateApplication, TransitionApplication};
use pawhaven_db::repositories::ApplicationRepo;

async fn submit(pool: &PgPool, tenant: &Tenant, kind: &str) -> Application {
    let animal = seed_animal(pool, tenant, "Biscuit").await;
    let person = seed_person(pool, tenant, "Jordan Reyes", "adopter").await;
    ApplicationRepo::submit(
        pool,
        tenant.org_id,
        tenant.admin_id,
        &CreateApplication {
            animal_id: animal.id,
            person_id: person.id,
            kind: kind.to_string(),
            form_json: None,
        },
    )
    .await
    .unwrap()
}

async fn move_to(
    pool: &PgPool,
    tenant: &Tenant,
    application_id: i64,
    status: &str,
) -> Result<Application, DbError> {
    ApplicationRepo::transition(
        pool,
        tenant.org_id,
        tenant.admin_id,
        application_id,
        status,
        &TransitionApplication::default(),
    )
    .await
}

#[sqlx::test(migrations = "./migrations")]
async fn submit_starts_in_received(pool: PgPool) {
    let tenant = seed_tenant(&pool, "shelter").await;
    let app = submit(&pool, &tenant, "adoption").await;
    assert_eq!(app.status, "received");
    assert_eq!(app.version, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn submit_rejects_unknown_animal(pool: PgPool) {
    let tenant = seed_tenant(&pool, "shelter").await;
    let person = seed_person(&pool, &tenant, "Jordan Reyes", "adopter").await;

    let err = ApplicationRepo::submit(
        &pool,
        tenant.org_id,
        tenant.admin_id,
        &CreateApplication {
            animal_id: 9999,
            person_id: person.id,
            kind: "adoption".to_string(),
            form_json: None,
        },
    )
    .await
    .unwrap_err();
    assert_matches!(err, DbError::Core(CoreError::NotFound { entity: "Animal", .. }));
}

#[sqlx::test(migrations = "./migrations")]
async fn approve_requires_review_first(pool: PgPool) {
    let tenant = seed_tenant(&pool, "shelter").await;
    let app = submit(&pool, &tenant, "adoption").await;

    let err = move_to(&pool, &tenant, app.id, "approved").await.unwrap_err();
    assert_matches!(err, DbError::Core(CoreError::InvalidTransition { .. }));

    // The failed call must not have advanced the application.
    let after = ApplicationRepo::find_by_id(&pool, tenant.org_id, app.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(after.status, "received");
    assert_eq!(after.version, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn full_path_to_approval(pool: PgPool) {
    let tenant = seed_tenant(&pool, "shelter").await;
    let app = submit(&pool, &tenant, "adoption").await;

    let app = move_to(&pool, &tenant, app.id, "review").await.unwrap();
    assert_eq!(app.status, "review");

    let app = ApplicationRepo::transition(
        &pool,
        tenant.org_id,
        tenant.admin_id,
        app.id,
        "approved",
        &TransitionApplication {
            notes: Some("Home visit passed".to_string()),
            expected_version: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(app.status, "approved");
    assert_eq!(app.decision_notes.as_deref(), Some("Home visit passed"));
}

#[sqlx::test(migrations = "./migrations")]
async fn withdraw_is_reachable_from_both_pre_decision_stages(pool: PgPool) {
    let tenant = seed_tenant(&pool, "shelter").await;

    let from_received = submit(&pool, &tenant, "foster").await;
    let app = move_to(&pool, &tenant, from_received.id, "withdrawn")
        .await
        .unwrap();
    assert_eq!(app.status, "withdrawn");

    let from_review = submit(&pool, &tenant, "foster").await;
    move_to(&pool, &tenant, from_review.id, "review").await.unwrap();
    let app = move_to(&pool, &tenant, from_review.id, "withdrawn")
        .await
        .unwrap();
    assert_eq!(app.status, "withdrawn");
}

#[sqlx::test(migrations = "./migrations")]
async fn terminal_application_never_reverts(pool: PgPool) {
    let tenant = seed_tenant(&pool, "shelter").await;
    let app = submit(&pool, &tenant, "adoption").await;
    move_to(&pool, &tenant, app.id, "review").await.unwrap();
    move_to(&pool, &tenant, app.id, "denied").await.unwrap();

    for target in ["received", "review", "approved"] {
        let err = move_to(&pool, &tenant, app.id, target).await.unwrap_err();
        assert_matches!(err, DbError::Core(CoreError::InvalidTransition { .. }));
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn stale_version_fails_concurrent_modification(pool: PgPool) {
    let tenant = seed_tenant(&pool, "shelter").await;
    let app = submit(&pool, &tenant, "adoption").await;
    move_to(&pool, &tenant, app.id, "review").await.unwrap();

    let err = ApplicationRepo::transition(
        &pool,
        tenant.org_id,
        tenant.admin_id,
        app.id,
        "approved",
        &TransitionApplication {
            notes: None,
            expected_version: Some(1),
        },
    )
    .await
    .unwrap_err();
    assert_matches!(err, DbError::Core(CoreError::ConcurrentModification { .. }));
}

#[sqlx::test(migrations = "./migrations")]
async fn board_lists_by_status(pool: PgPool) {
    let tenant = seed_tenant(&pool, "shelter").await;
    let a = submit(&pool, &tenant, "adoption").await;
    let _b = submit(&pool, &tenant, "foster").await;
    move_to(&pool, &tenant, a.id, "review").await.unwrap();

    let received = ApplicationRepo::list(&pool, tenant.org_id, Some("received"))
        .await
        .unwrap();
    let review = ApplicationRepo::list(&pool, tenant.org_id, Some("review"))
        .await
        .unwrap();
    assert_eq!(received.len(), 1);
    assert_eq!(review.len(), 1);
    assert_eq!(review[0].id, a.id);
}
