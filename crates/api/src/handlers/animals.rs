//! Handlers for the animal lifecycle: intake, listing, and guarded status
//! transitions.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use pawhaven_core::error::CoreError;
use pawhaven_core::roles::{ROLE_READONLY, ROLE_STAFF};
use pawhaven_core::types::DbId;
use pawhaven_db::models::animal::{
    Animal, CreateIntake, Intake, Outcome, TransitionAnimal, TransitionResult,
};
use pawhaven_db::repositories::AnimalRepo;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::handlers::authorize;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for the animal listing.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub status: Option<String>,
}

/// Animal detail: the animal plus its intake and (if terminal) outcome.
#[derive(Debug, Serialize)]
pub struct AnimalDetail {
    pub animal: Animal,
    pub intake: Option<Intake>,
    pub outcome: Option<Outcome>,
}

/// POST /api/v1/orgs/{org_id}/animals
///
/// Intake a new animal.
pub async fn intake(
    State(state): State<AppState>,
    user: AuthUser,
    Path(org_id): Path<DbId>,
    Json(input): Json<CreateIntake>,
) -> AppResult<(StatusCode, Json<DataResponse<AnimalDetail>>)> {
    authorize(&state, &user, org_id, ROLE_STAFF).await?;
    if input.name.trim().is_empty() || input.species.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Animal name and species must not be empty".into(),
        )));
    }
    let (animal, intake) = AnimalRepo::intake(&state.pool, org_id, user.user_id, &input).await?;
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: AnimalDetail {
                animal,
                intake: Some(intake),
                outcome: None,
            },
        }),
    ))
}

/// GET /api/v1/orgs/{org_id}/animals
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Path(org_id): Path<DbId>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<DataResponse<Vec<Animal>>>> {
    authorize(&state, &user, org_id, ROLE_READONLY).await?;
    let animals = AnimalRepo::list(&state.pool, org_id, params.status.as_deref()).await?;
    Ok(Json(DataResponse { data: animals }))
}

/// GET /api/v1/orgs/{org_id}/animals/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path((org_id, id)): Path<(DbId, DbId)>,
) -> AppResult<Json<DataResponse<AnimalDetail>>> {
    authorize(&state, &user, org_id, ROLE_READONLY).await?;
    let animal = AnimalRepo::find_by_id(&state.pool, org_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Animal",
            id,
        }))?;
    let intake = AnimalRepo::find_intake(&state.pool, org_id, id).await?;
    let outcome = AnimalRepo::find_outcome(&state.pool, org_id, id).await?;
    Ok(Json(DataResponse {
        data: AnimalDetail {
            animal,
            intake,
            outcome,
        },
    }))
}

/// POST /api/v1/orgs/{org_id}/animals/{id}/transition
pub async fn transition(
    State(state): State<AppState>,
    user: AuthUser,
    Path((org_id, id)): Path<(DbId, DbId)>,
    Json(input): Json<TransitionAnimal>,
) -> AppResult<Json<DataResponse<TransitionResult>>> {
    authorize(&state, &user, org_id, ROLE_STAFF).await?;
    let result = AnimalRepo::transition(&state.pool, org_id, user.user_id, id, &input).await?;
    Ok(Json(DataResponse { data: result }))
}
