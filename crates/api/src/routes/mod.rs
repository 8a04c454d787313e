pub mod health;

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                                   register (public)
/// /auth/login                                      login (public)
///
/// /orgs                                            list, create
/// /orgs/{org_id}                                   get
/// /orgs/{org_id}/members                           list, add (admin)
/// /orgs/{org_id}/members/{user_id}                 remove (admin)
///
/// /orgs/{org_id}/animals                           list, intake
/// /orgs/{org_id}/animals/{id}                      get
/// /orgs/{org_id}/animals/{id}/transition           status transition (POST)
/// /orgs/{org_id}/animals/{id}/tasks                list, schedule
///
/// /orgs/{org_id}/tasks/due                         due/overdue listing
/// /orgs/{org_id}/tasks/batch-complete              batch completion (POST)
/// /orgs/{org_id}/tasks/{id}                        update (PATCH)
/// /orgs/{org_id}/tasks/{id}/complete               complete (POST)
/// /orgs/{org_id}/tasks/{id}/cancel                 cancel (POST)
///
/// /orgs/{org_id}/people                            list, create
/// /orgs/{org_id}/people/{id}                       get, update
///
/// /orgs/{org_id}/applications                      list, submit
/// /orgs/{org_id}/applications/{id}                 get
/// /orgs/{org_id}/applications/{id}/move-to-review  pipeline transition (POST)
/// /orgs/{org_id}/applications/{id}/approve         pipeline transition (POST)
/// /orgs/{org_id}/applications/{id}/deny            pipeline transition (POST)
/// /orgs/{org_id}/applications/{id}/withdraw        pipeline transition (POST)
/// /orgs/{org_id}/applications/{id}/finalize-adoption   finalization (POST)
/// /orgs/{org_id}/applications/{id}/place-foster        finalization (POST)
///
/// /orgs/{org_id}/fosters                           list assignments
/// /orgs/{org_id}/fosters/{id}/end                  end assignment (POST)
///
/// /orgs/{org_id}/notes                             list by subject, create
/// /orgs/{org_id}/photos                            list by subject, create
///
/// /orgs/{org_id}/audit-log                         query (staff)
///
/// /orgs/{org_id}/dashboard/counts                  shelter counts
/// /orgs/{org_id}/dashboard/species                 species distribution
/// /orgs/{org_id}/dashboard/intake-trend            monthly intake trend
/// /orgs/{org_id}/dashboard/pipeline                board stage counts
/// /orgs/{org_id}/dashboard/compliance              medical compliance
/// /orgs/{org_id}/dashboard/live-release            outcome counts + rate
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes())
        .route("/orgs", get(handlers::orgs::list).post(handlers::orgs::create))
        .nest("/orgs/{org_id}", org_routes())
}

/// Public authentication routes.
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
}

/// Tenant-scoped routes. Every handler authorizes the caller against the
/// organization in the path before touching data.
fn org_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::orgs::get_by_id))
        .route(
            "/members",
            get(handlers::members::list).post(handlers::members::add),
        )
        .route("/members/{user_id}", axum::routing::delete(handlers::members::remove))
        .route(
            "/animals",
            get(handlers::animals::list).post(handlers::animals::intake),
        )
        .route("/animals/{id}", get(handlers::animals::get_by_id))
        .route("/animals/{id}/transition", post(handlers::animals::transition))
        .route(
            "/animals/{id}/tasks",
            get(handlers::tasks::list_for_animal).post(handlers::tasks::create),
        )
        .route("/tasks/due", get(handlers::tasks::list_due))
        .route("/tasks/batch-complete", post(handlers::tasks::batch_complete))
        .route("/tasks/{id}", patch(handlers::tasks::update))
        .route("/tasks/{id}/complete", post(handlers::tasks::complete))
        .route("/tasks/{id}/cancel", post(handlers::tasks::cancel))
        .route(
            "/people",
            get(handlers::people::list).post(handlers::people::create),
        )
        .route(
            "/people/{id}",
            get(handlers::people::get_by_id).patch(handlers::people::update),
        )
        .route(
            "/applications",
            get(handlers::applications::list).post(handlers::applications::submit),
        )
        .route("/applications/{id}", get(handlers::applications::get_by_id))
        .route(
            "/applications/{id}/move-to-review",
            post(handlers::applications::move_to_review),
        )
        .route("/applications/{id}/approve", post(handlers::applications::approve))
        .route("/applications/{id}/deny", post(handlers::applications::deny))
        .route("/applications/{id}/withdraw", post(handlers::applications::withdraw))
        .route(
            "/applications/{id}/finalize-adoption",
            post(handlers::placements::finalize_adoption),
        )
        .route(
            "/applications/{id}/place-foster",
            post(handlers::placements::place_foster),
        )
        .route("/fosters", get(handlers::placements::list_fosters))
        .route("/fosters/{id}/end", post(handlers::placements::end_foster))
        .route(
            "/notes",
            get(handlers::notes::list_notes).post(handlers::notes::create_note),
        )
        .route(
            "/photos",
            get(handlers::notes::list_photos).post(handlers::notes::create_photo),
        )
        .route("/audit-log", get(handlers::audit::query))
        .route("/dashboard/counts", get(handlers::dashboard::counts))
        .route("/dashboard/species", get(handlers::dashboard::species))
        .route("/dashboard/intake-trend", get(handlers::dashboard::intake_trend))
        .route("/dashboard/pipeline", get(handlers::dashboard::pipeline))
        .route("/dashboard/compliance", get(handlers::dashboard::compliance))
        .route("/dashboard/live-release", get(handlers::dashboard::live_release))
}
