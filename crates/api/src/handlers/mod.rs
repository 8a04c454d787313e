//! HTTP handlers: thin wrappers that authorize the caller via a membership
//! lookup and delegate to the repository layer.

pub mod animals;
pub mod applications;
pub mod audit;
pub mod auth;
pub mod dashboard;
pub mod members;
pub mod notes;
pub mod orgs;
pub mod people;
pub mod placements;
pub mod tasks;

use pawhaven_core::types::DbId;
use pawhaven_db::models::membership::Membership;
use pawhaven_db::repositories::MembershipRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Resolve the caller's membership in the organization and require at least
/// the given role. Role always comes from the membership row, never from
/// the token.
pub(crate) async fn authorize(
    state: &AppState,
    user: &AuthUser,
    organization_id: DbId,
    required_role: &str,
) -> AppResult<Membership> {
    let membership =
        MembershipRepo::authorize(&state.pool, user.user_id, organization_id, required_role)
            .await?;
    Ok(membership)
}
