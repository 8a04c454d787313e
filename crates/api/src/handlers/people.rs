//! Handlers for the `/people` resource (external contacts).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use pawhaven_core::error::CoreError;
use pawhaven_core::roles::{ROLE_READONLY, ROLE_STAFF};
use pawhaven_core::types::DbId;
use pawhaven_db::models::person::{CreatePerson, Person, UpdatePerson};
use pawhaven_db::repositories::PersonRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::handlers::authorize;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for the people listing.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub person_type: Option<String>,
}

/// POST /api/v1/orgs/{org_id}/people
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Path(org_id): Path<DbId>,
    Json(input): Json<CreatePerson>,
) -> AppResult<(StatusCode, Json<DataResponse<Person>>)> {
    authorize(&state, &user, org_id, ROLE_STAFF).await?;
    if input.full_name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Person name must not be empty".into(),
        )));
    }
    let person = PersonRepo::create(&state.pool, org_id, user.user_id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: person })))
}

/// GET /api/v1/orgs/{org_id}/people
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Path(org_id): Path<DbId>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<DataResponse<Vec<Person>>>> {
    authorize(&state, &user, org_id, ROLE_READONLY).await?;
    let people = PersonRepo::list(&state.pool, org_id, params.person_type.as_deref()).await?;
    Ok(Json(DataResponse { data: people }))
}

/// GET /api/v1/orgs/{org_id}/people/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path((org_id, id)): Path<(DbId, DbId)>,
) -> AppResult<Json<DataResponse<Person>>> {
    authorize(&state, &user, org_id, ROLE_READONLY).await?;
    let person = PersonRepo::find_by_id(&state.pool, org_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Person",
            id,
        }))?;
    Ok(Json(DataResponse { data: person }))
}

/// PATCH /api/v1/orgs/{org_id}/people/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path((org_id, id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdatePerson>,
) -> AppResult<Json<DataResponse<Person>>> {
    authorize(&state, &user, org_id, ROLE_STAFF).await?;
    let person = PersonRepo::update(&state.pool, org_id, user.user_id, id, &input).await?;
    Ok(Json(DataResponse { data: person }))
}
