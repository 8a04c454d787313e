//! Handlers for the audit log. Read-only; the log has no mutation surface.

use axum::extract::{Path, Query, State};
use axum::Json;
use pawhaven_core::roles::ROLE_STAFF;
use pawhaven_core::types::DbId;
use pawhaven_db::models::audit::{AuditLogPage, AuditQuery};
use pawhaven_db::repositories::AuditLogRepo;

use crate::error::AppResult;
use crate::handlers::authorize;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/orgs/{org_id}/audit-log
///
/// Query the organization's audit trail with filters and pagination.
pub async fn query(
    State(state): State<AppState>,
    user: AuthUser,
    Path(org_id): Path<DbId>,
    Query(params): Query<AuditQuery>,
) -> AppResult<Json<DataResponse<AuditLogPage>>> {
    authorize(&state, &user, org_id, ROLE_STAFF).await?;
    let items = AuditLogRepo::query(&state.pool, org_id, &params).await?;
    let total = AuditLogRepo::count(&state.pool, org_id, &params).await?;
    Ok(Json(DataResponse {
        data: AuditLogPage { items, total },
    }))
}
