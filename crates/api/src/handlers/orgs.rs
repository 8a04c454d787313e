//! Handlers for the `/orgs` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use pawhaven_core::error::CoreError;
use pawhaven_core::roles::ROLE_READONLY;
use pawhaven_core::types::DbId;
use pawhaven_db::models::organization::{CreateOrganization, Organization};
use pawhaven_db::repositories::OrganizationRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::authorize;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/orgs
///
/// Create an organization; the caller becomes its first admin member.
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateOrganization>,
) -> AppResult<(StatusCode, Json<DataResponse<Organization>>)> {
    if input.name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Organization name must not be empty".into(),
        )));
    }
    let org = OrganizationRepo::create(&state.pool, user.user_id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: org })))
}

/// GET /api/v1/orgs
///
/// List organizations the caller belongs to.
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Organization>>>> {
    let orgs = OrganizationRepo::list_for_user(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: orgs }))
}

/// GET /api/v1/orgs/{org_id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(org_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Organization>>> {
    authorize(&state, &user, org_id, ROLE_READONLY).await?;
    let org = OrganizationRepo::find_by_id(&state.pool, org_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Organization",
            id: org_id,
        }))?;
    Ok(Json(DataResponse { data: org }))
}
