//! Handlers for the application pipeline: submission and the four staged
//! review transitions backing the Kanban board.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use pawhaven_core::application::{APP_APPROVED, APP_DENIED, APP_REVIEW, APP_WITHDRAWN};
use pawhaven_core::error::CoreError;
use pawhaven_core::roles::{ROLE_READONLY, ROLE_STAFF};
use pawhaven_core::types::DbId;
use pawhaven_db::models::application::{Application, CreateApplication, TransitionApplication};
use pawhaven_db::repositories::ApplicationRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::handlers::authorize;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for the application listing.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub status: Option<String>,
}

/// POST /api/v1/orgs/{org_id}/applications
pub async fn submit(
    State(state): State<AppState>,
    user: AuthUser,
    Path(org_id): Path<DbId>,
    Json(input): Json<CreateApplication>,
) -> AppResult<(StatusCode, Json<DataResponse<Application>>)> {
    authorize(&state, &user, org_id, ROLE_STAFF).await?;
    let application =
        ApplicationRepo::submit(&state.pool, org_id, user.user_id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: application })))
}

/// GET /api/v1/orgs/{org_id}/applications
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Path(org_id): Path<DbId>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<DataResponse<Vec<Application>>>> {
    authorize(&state, &user, org_id, ROLE_READONLY).await?;
    let applications =
        ApplicationRepo::list(&state.pool, org_id, params.status.as_deref()).await?;
    Ok(Json(DataResponse { data: applications }))
}

/// GET /api/v1/orgs/{org_id}/applications/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path((org_id, id)): Path<(DbId, DbId)>,
) -> AppResult<Json<DataResponse<Application>>> {
    authorize(&state, &user, org_id, ROLE_READONLY).await?;
    let application = ApplicationRepo::find_by_id(&state.pool, org_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Application",
            id,
        }))?;
    Ok(Json(DataResponse { data: application }))
}

/// POST /api/v1/orgs/{org_id}/applications/{id}/move-to-review
pub async fn move_to_review(
    state: State<AppState>,
    user: AuthUser,
    path: Path<(DbId, DbId)>,
    input: Option<Json<TransitionApplication>>,
) -> AppResult<Json<DataResponse<Application>>> {
    transition(state, user, path, APP_REVIEW, input).await
}

/// POST /api/v1/orgs/{org_id}/applications/{id}/approve
pub async fn approve(
    state: State<AppState>,
    user: AuthUser,
    path: Path<(DbId, DbId)>,
    input: Option<Json<TransitionApplication>>,
) -> AppResult<Json<DataResponse<Application>>> {
    transition(state, user, path, APP_APPROVED, input).await
}

/// POST /api/v1/orgs/{org_id}/applications/{id}/deny
pub async fn deny(
    state: State<AppState>,
    user: AuthUser,
    path: Path<(DbId, DbId)>,
    input: Option<Json<TransitionApplication>>,
) -> AppResult<Json<DataResponse<Application>>> {
    transition(state, user, path, APP_DENIED, input).await
}

/// POST /api/v1/orgs/{org_id}/applications/{id}/withdraw
pub async fn withdraw(
    state: State<AppState>,
    user: AuthUser,
    path: Path<(DbId, DbId)>,
    input: Option<Json<TransitionApplication>>,
) -> AppResult<Json<DataResponse<Application>>> {
    transition(state, user, path, APP_WITHDRAWN, input).await
}

async fn transition(
    State(state): State<AppState>,
    user: AuthUser,
    Path((org_id, id)): Path<(DbId, DbId)>,
    new_status: &str,
    input: Option<Json<TransitionApplication>>,
) -> AppResult<Json<DataResponse<Application>>> {
    authorize(&state, &user, org_id, ROLE_STAFF).await?;
    let input = input.map(|Json(i)| i).unwrap_or_default();
    let application = ApplicationRepo::transition(
        &state.pool,
        org_id,
        user.user_id,
        id,
        new_status,
        &input,
    )
    .await?;
    Ok(Json(DataResponse { data: application }))
}
