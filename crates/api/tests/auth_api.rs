//! Integration tests for registration, login, and request authentication.

mod common;

use axum::http::StatusCode;
use sqlx::PgPool;

use common::{body_json, get, post, register, register_with_org};

#[sqlx::test(migrations = "../db/migrations")]
async fn register_returns_a_working_token(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = register(&app, "staff@example.org").await;

    // The token authenticates a protected route.
    let response = get(&app, "/api/v1/orgs", Some(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"], serde_json::json!([]));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn duplicate_email_conflicts(pool: PgPool) {
    let app = common::build_test_app(pool);
    register(&app, "staff@example.org").await;

    let response = post(
        &app,
        "/api/v1/auth/register",
        None,
        Some(serde_json::json!({
            "email": "staff@example.org",
            "password": "correct-horse-battery-staple",
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn weak_password_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post(
        &app,
        "/api/v1/auth/register",
        None,
        Some(serde_json::json!({
            "email": "staff@example.org",
            "password": "short",
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn login_with_wrong_password_is_unauthorized(pool: PgPool) {
    let app = common::build_test_app(pool);
    register(&app, "staff@example.org").await;

    let response = post(
        &app,
        "/api/v1/auth/login",
        None,
        Some(serde_json::json!({
            "email": "staff@example.org",
            "password": "not-the-password",
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn login_returns_a_fresh_token(pool: PgPool) {
    let app = common::build_test_app(pool);
    register(&app, "staff@example.org").await;

    let response = post(
        &app,
        "/api/v1/auth/login",
        None,
        Some(serde_json::json!({
            "email": "staff@example.org",
            "password": "correct-horse-battery-staple",
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["access_token"].is_string());
    assert_eq!(json["user"]["email"], "staff@example.org");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn protected_route_requires_a_token(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get(&app, "/api/v1/orgs", None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn garbage_token_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get(&app, "/api/v1/orgs", Some("not-a-jwt")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn non_member_cannot_see_another_organization(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (_token_a, org_a) = register_with_org(&app, "a@example.org", "Shelter A").await;
    let token_b = register(&app, "b@example.org").await;

    let response = get(&app, &format!("/api/v1/orgs/{org_a}"), Some(&token_b)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_A_MEMBER");
}
