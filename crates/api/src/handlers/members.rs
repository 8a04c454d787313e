//! Handlers for organization member management. Admin only.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use pawhaven_core::roles::{ROLE_ADMIN, ROLE_READONLY};
use pawhaven_core::types::DbId;
use pawhaven_db::models::membership::{CreateMembership, MemberWithEmail, Membership};
use pawhaven_db::repositories::MembershipRepo;

use crate::error::AppResult;
use crate::handlers::authorize;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/orgs/{org_id}/members
pub async fn add(
    State(state): State<AppState>,
    user: AuthUser,
    Path(org_id): Path<DbId>,
    Json(input): Json<CreateMembership>,
) -> AppResult<(StatusCode, Json<DataResponse<Membership>>)> {
    authorize(&state, &user, org_id, ROLE_ADMIN).await?;
    let membership =
        MembershipRepo::add_member(&state.pool, org_id, user.user_id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: membership })))
}

/// GET /api/v1/orgs/{org_id}/members
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Path(org_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<MemberWithEmail>>>> {
    authorize(&state, &user, org_id, ROLE_READONLY).await?;
    let members = MembershipRepo::list_members(&state.pool, org_id).await?;
    Ok(Json(DataResponse { data: members }))
}

/// DELETE /api/v1/orgs/{org_id}/members/{user_id}
pub async fn remove(
    State(state): State<AppState>,
    user: AuthUser,
    Path((org_id, member_user_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    authorize(&state, &user, org_id, ROLE_ADMIN).await?;
    MembershipRepo::remove_member(&state.pool, org_id, user.user_id, member_user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
