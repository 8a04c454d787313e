//! Handlers for the medical compliance engine: scheduling, completion,
//! batch completion, and due listings.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use pawhaven_core::roles::{ROLE_READONLY, ROLE_STAFF};
use pawhaven_core::types::{DateOnly, DbId};
use pawhaven_db::models::medical::{
    BatchCompleteResult, ClassifiedTask, CompleteTaskResult, CreateMedicalTask, MedicalTask,
    UpdateMedicalTask,
};
use pawhaven_db::repositories::MedicalTaskRepo;
use serde::Deserialize;

use crate::error::AppResult;
use crate::handlers::authorize;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters carrying a reference date for classification.
/// Defaults to today (the caller's clock is authoritative in production;
/// the server clock is the fallback).
#[derive(Debug, Deserialize)]
pub struct AsOfParams {
    pub as_of: Option<DateOnly>,
}

/// Request body for task completion.
#[derive(Debug, Default, Deserialize)]
pub struct CompleteRequest {
    /// Defaults to today.
    pub completed_on: Option<DateOnly>,
}

/// Request body for batch completion.
#[derive(Debug, Deserialize)]
pub struct BatchCompleteRequest {
    pub task_ids: Vec<DbId>,
    /// Defaults to today.
    pub completed_on: Option<DateOnly>,
}

fn today() -> DateOnly {
    Utc::now().date_naive()
}

/// POST /api/v1/orgs/{org_id}/animals/{animal_id}/tasks
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Path((org_id, animal_id)): Path<(DbId, DbId)>,
    Json(input): Json<CreateMedicalTask>,
) -> AppResult<(StatusCode, Json<DataResponse<MedicalTask>>)> {
    authorize(&state, &user, org_id, ROLE_STAFF).await?;
    let task =
        MedicalTaskRepo::create(&state.pool, org_id, user.user_id, animal_id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: task })))
}

/// GET /api/v1/orgs/{org_id}/animals/{animal_id}/tasks
pub async fn list_for_animal(
    State(state): State<AppState>,
    user: AuthUser,
    Path((org_id, animal_id)): Path<(DbId, DbId)>,
    Query(params): Query<AsOfParams>,
) -> AppResult<Json<DataResponse<Vec<ClassifiedTask>>>> {
    authorize(&state, &user, org_id, ROLE_READONLY).await?;
    let tasks = MedicalTaskRepo::list_for_animal(
        &state.pool,
        org_id,
        animal_id,
        params.as_of.unwrap_or_else(today),
    )
    .await?;
    Ok(Json(DataResponse { data: tasks }))
}

/// GET /api/v1/orgs/{org_id}/tasks/due
pub async fn list_due(
    State(state): State<AppState>,
    user: AuthUser,
    Path(org_id): Path<DbId>,
    Query(params): Query<AsOfParams>,
) -> AppResult<Json<DataResponse<Vec<ClassifiedTask>>>> {
    authorize(&state, &user, org_id, ROLE_READONLY).await?;
    let tasks =
        MedicalTaskRepo::list_due(&state.pool, org_id, params.as_of.unwrap_or_else(today)).await?;
    Ok(Json(DataResponse { data: tasks }))
}

/// POST /api/v1/orgs/{org_id}/tasks/{id}/complete
pub async fn complete(
    State(state): State<AppState>,
    user: AuthUser,
    Path((org_id, id)): Path<(DbId, DbId)>,
    Json(input): Json<CompleteRequest>,
) -> AppResult<Json<DataResponse<CompleteTaskResult>>> {
    authorize(&state, &user, org_id, ROLE_STAFF).await?;
    let result = MedicalTaskRepo::complete(
        &state.pool,
        org_id,
        user.user_id,
        id,
        input.completed_on.unwrap_or_else(today),
        &state.config.recurrence,
    )
    .await?;
    Ok(Json(DataResponse { data: result }))
}

/// POST /api/v1/orgs/{org_id}/tasks/{id}/cancel
pub async fn cancel(
    State(state): State<AppState>,
    user: AuthUser,
    Path((org_id, id)): Path<(DbId, DbId)>,
) -> AppResult<Json<DataResponse<MedicalTask>>> {
    authorize(&state, &user, org_id, ROLE_STAFF).await?;
    let task = MedicalTaskRepo::cancel(&state.pool, org_id, user.user_id, id).await?;
    Ok(Json(DataResponse { data: task }))
}

/// PATCH /api/v1/orgs/{org_id}/tasks/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path((org_id, id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateMedicalTask>,
) -> AppResult<Json<DataResponse<MedicalTask>>> {
    authorize(&state, &user, org_id, ROLE_STAFF).await?;
    let task = MedicalTaskRepo::update(&state.pool, org_id, user.user_id, id, &input).await?;
    Ok(Json(DataResponse { data: task }))
}

/// POST /api/v1/orgs/{org_id}/tasks/batch-complete
///
/// Partial-failure semantics: each task is processed independently; one
/// failure does not abort the batch.
pub async fn batch_complete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(org_id): Path<DbId>,
    Json(input): Json<BatchCompleteRequest>,
) -> AppResult<Json<DataResponse<BatchCompleteResult>>> {
    authorize(&state, &user, org_id, ROLE_STAFF).await?;
    let result = MedicalTaskRepo::batch_complete(
        &state.pool,
        org_id,
        user.user_id,
        &input.task_ids,
        input.completed_on.unwrap_or_else(today),
        &state.config.recurrence,
    )
    .await?;
    Ok(Json(DataResponse { data: result }))
}
