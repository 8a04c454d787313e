//! Handlers for dashboard metrics. All read-side aggregations, recomputed
//! on demand; nothing here is persisted.

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{Duration, Utc};
use pawhaven_core::roles::ROLE_READONLY;
use pawhaven_core::types::{DateOnly, DbId};
use pawhaven_db::models::metrics::{
    ComplianceSummary, MonthlyIntake, OutcomeSummary, PipelineStageCounts, ShelterCounts,
    SpeciesCount,
};
use pawhaven_db::repositories::MetricsRepo;
use serde::Deserialize;

use crate::error::AppResult;
use crate::handlers::authorize;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for windowed metrics.
#[derive(Debug, Deserialize)]
pub struct WindowParams {
    /// Reference date; defaults to today.
    pub as_of: Option<DateOnly>,
    /// Trailing window length in days; defaults to 30.
    pub days: Option<i64>,
}

/// Query parameters for the intake trend.
#[derive(Debug, Deserialize)]
pub struct TrendParams {
    /// Trailing window length in months; defaults to 12.
    pub months: Option<i32>,
}

fn today() -> DateOnly {
    Utc::now().date_naive()
}

fn window(params: &WindowParams) -> (DateOnly, DateOnly) {
    let as_of = params.as_of.unwrap_or_else(today);
    let days = params.days.unwrap_or(30).clamp(1, 3650);
    (as_of - Duration::days(days), as_of)
}

/// GET /api/v1/orgs/{org_id}/dashboard/counts
pub async fn counts(
    State(state): State<AppState>,
    user: AuthUser,
    Path(org_id): Path<DbId>,
    Query(params): Query<WindowParams>,
) -> AppResult<Json<DataResponse<ShelterCounts>>> {
    authorize(&state, &user, org_id, ROLE_READONLY).await?;
    let as_of = params.as_of.unwrap_or_else(today);
    let counts = MetricsRepo::shelter_counts(&state.pool, org_id, as_of).await?;
    Ok(Json(DataResponse { data: counts }))
}

/// GET /api/v1/orgs/{org_id}/dashboard/species
pub async fn species(
    State(state): State<AppState>,
    user: AuthUser,
    Path(org_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<SpeciesCount>>>> {
    authorize(&state, &user, org_id, ROLE_READONLY).await?;
    let distribution = MetricsRepo::species_distribution(&state.pool, org_id).await?;
    Ok(Json(DataResponse { data: distribution }))
}

/// GET /api/v1/orgs/{org_id}/dashboard/intake-trend
pub async fn intake_trend(
    State(state): State<AppState>,
    user: AuthUser,
    Path(org_id): Path<DbId>,
    Query(params): Query<TrendParams>,
) -> AppResult<Json<DataResponse<Vec<MonthlyIntake>>>> {
    authorize(&state, &user, org_id, ROLE_READONLY).await?;
    let months = params.months.unwrap_or(12).clamp(1, 120);
    let trend = MetricsRepo::intake_trend(&state.pool, org_id, months).await?;
    Ok(Json(DataResponse { data: trend }))
}

/// GET /api/v1/orgs/{org_id}/dashboard/pipeline
pub async fn pipeline(
    State(state): State<AppState>,
    user: AuthUser,
    Path(org_id): Path<DbId>,
) -> AppResult<Json<DataResponse<PipelineStageCounts>>> {
    authorize(&state, &user, org_id, ROLE_READONLY).await?;
    let counts = MetricsRepo::pipeline_stage_counts(&state.pool, org_id).await?;
    Ok(Json(DataResponse { data: counts }))
}

/// GET /api/v1/orgs/{org_id}/dashboard/compliance
pub async fn compliance(
    State(state): State<AppState>,
    user: AuthUser,
    Path(org_id): Path<DbId>,
    Query(params): Query<WindowParams>,
) -> AppResult<Json<DataResponse<ComplianceSummary>>> {
    authorize(&state, &user, org_id, ROLE_READONLY).await?;
    let (start, as_of) = window(&params);
    let summary = MetricsRepo::compliance_summary(&state.pool, org_id, start, as_of).await?;
    Ok(Json(DataResponse { data: summary }))
}

/// GET /api/v1/orgs/{org_id}/dashboard/live-release
pub async fn live_release(
    State(state): State<AppState>,
    user: AuthUser,
    Path(org_id): Path<DbId>,
    Query(params): Query<WindowParams>,
) -> AppResult<Json<DataResponse<OutcomeSummary>>> {
    authorize(&state, &user, org_id, ROLE_READONLY).await?;
    let (start, end) = window(&params);
    let summary = MetricsRepo::outcome_summary(&state.pool, org_id, start, end).await?;
    Ok(Json(DataResponse { data: summary }))
}
