//! Handlers for notes and photos attached to animals, people, and
//! applications.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use pawhaven_core::annotations::SubjectKind;
use pawhaven_core::roles::{ROLE_READONLY, ROLE_STAFF};
use pawhaven_core::types::DbId;
use pawhaven_db::models::annotation::{CreateNote, CreatePhoto, Note, Photo};
use pawhaven_db::repositories::NoteRepo;
use serde::Deserialize;

use crate::error::AppResult;
use crate::handlers::authorize;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters selecting an annotation subject.
#[derive(Debug, Deserialize)]
pub struct SubjectParams {
    pub subject_type: SubjectKind,
    pub subject_id: DbId,
}

/// POST /api/v1/orgs/{org_id}/notes
pub async fn create_note(
    State(state): State<AppState>,
    user: AuthUser,
    Path(org_id): Path<DbId>,
    Json(input): Json<CreateNote>,
) -> AppResult<(StatusCode, Json<DataResponse<Note>>)> {
    authorize(&state, &user, org_id, ROLE_STAFF).await?;
    let note = NoteRepo::create_note(&state.pool, org_id, user.user_id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: note })))
}

/// GET /api/v1/orgs/{org_id}/notes?subject_type=animal&subject_id=1
pub async fn list_notes(
    State(state): State<AppState>,
    user: AuthUser,
    Path(org_id): Path<DbId>,
    Query(params): Query<SubjectParams>,
) -> AppResult<Json<DataResponse<Vec<Note>>>> {
    authorize(&state, &user, org_id, ROLE_READONLY).await?;
    let notes = NoteRepo::list_notes(
        &state.pool,
        org_id,
        params.subject_type,
        params.subject_id,
    )
    .await?;
    Ok(Json(DataResponse { data: notes }))
}

/// POST /api/v1/orgs/{org_id}/photos
pub async fn create_photo(
    State(state): State<AppState>,
    user: AuthUser,
    Path(org_id): Path<DbId>,
    Json(input): Json<CreatePhoto>,
) -> AppResult<(StatusCode, Json<DataResponse<Photo>>)> {
    authorize(&state, &user, org_id, ROLE_STAFF).await?;
    let photo = NoteRepo::create_photo(&state.pool, org_id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: photo })))
}

/// GET /api/v1/orgs/{org_id}/photos?subject_type=animal&subject_id=1
pub async fn list_photos(
    State(state): State<AppState>,
    user: AuthUser,
    Path(org_id): Path<DbId>,
    Query(params): Query<SubjectParams>,
) -> AppResult<Json<DataResponse<Vec<Photo>>>> {
    authorize(&state, &user, org_id, ROLE_READONLY).await?;
    let photos = NoteRepo::list_photos(
        &state.pool,
        org_id,
        params.subject_type,
        params.subject_id,
    )
    .await?;
    Ok(Json(DataResponse { data: photos }))
}
