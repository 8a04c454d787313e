//! Handlers for finalization: converting approved applications into
//! adoptions and foster placements, and ending fosters.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use pawhaven_core::roles::{ROLE_READONLY, ROLE_STAFF};
use pawhaven_core::types::DbId;
use pawhaven_db::models::animal::Animal;
use pawhaven_db::models::placement::{
    Adoption, EndFoster, FinalizeAdoption, FosterAssignment, PlaceFoster,
};
use pawhaven_db::repositories::PlacementRepo;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::handlers::authorize;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for the foster assignment listing.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub status: Option<String>,
}

/// Response for ending a foster: the closed assignment and the animal's
/// post-return state.
#[derive(Debug, Serialize)]
pub struct EndFosterResult {
    pub assignment: FosterAssignment,
    pub animal: Animal,
}

/// POST /api/v1/orgs/{org_id}/applications/{id}/finalize-adoption
pub async fn finalize_adoption(
    State(state): State<AppState>,
    user: AuthUser,
    Path((org_id, application_id)): Path<(DbId, DbId)>,
    Json(input): Json<FinalizeAdoption>,
) -> AppResult<(StatusCode, Json<DataResponse<Adoption>>)> {
    authorize(&state, &user, org_id, ROLE_STAFF).await?;
    let adoption = PlacementRepo::finalize_adoption(
        &state.pool,
        org_id,
        user.user_id,
        application_id,
        &input,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: adoption })))
}

/// POST /api/v1/orgs/{org_id}/applications/{id}/place-foster
pub async fn place_foster(
    State(state): State<AppState>,
    user: AuthUser,
    Path((org_id, application_id)): Path<(DbId, DbId)>,
    input: Option<Json<PlaceFoster>>,
) -> AppResult<(StatusCode, Json<DataResponse<FosterAssignment>>)> {
    authorize(&state, &user, org_id, ROLE_STAFF).await?;
    let input = input
        .map(|Json(i)| i)
        .unwrap_or(PlaceFoster { start_date: None });
    let assignment =
        PlacementRepo::place_foster(&state.pool, org_id, user.user_id, application_id, &input)
            .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: assignment })))
}

/// POST /api/v1/orgs/{org_id}/fosters/{id}/end
pub async fn end_foster(
    State(state): State<AppState>,
    user: AuthUser,
    Path((org_id, assignment_id)): Path<(DbId, DbId)>,
    input: Option<Json<EndFoster>>,
) -> AppResult<Json<DataResponse<EndFosterResult>>> {
    authorize(&state, &user, org_id, ROLE_STAFF).await?;
    let input = input.map(|Json(i)| i).unwrap_or(EndFoster {
        close_status: None,
        return_status: None,
        end_date: None,
    });
    let (assignment, animal) =
        PlacementRepo::end_foster(&state.pool, org_id, user.user_id, assignment_id, &input)
            .await?;
    Ok(Json(DataResponse {
        data: EndFosterResult { assignment, animal },
    }))
}

/// GET /api/v1/orgs/{org_id}/fosters
pub async fn list_fosters(
    State(state): State<AppState>,
    user: AuthUser,
    Path(org_id): Path<DbId>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<DataResponse<Vec<FosterAssignment>>>> {
    authorize(&state, &user, org_id, ROLE_READONLY).await?;
    let assignments =
        PlacementRepo::list_assignments(&state.pool, org_id, params.status.as_deref()).await?;
    Ok(Json(DataResponse { data: assignments }))
}
