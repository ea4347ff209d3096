use crate::{AppState, auth::Role, handlers, storage::StorageState};
use axum::{Router, routing::get};

use super::guarded;

/// Admin Router Module
///
/// Moderation and oversight views. Only the `admin` role passes the guard; the admin home is
/// `/admin/dashboard`.
pub fn admin_routes(storage: &StorageState) -> Router<AppState> {
    let router = Router::new()
        .route("/admin/dashboard", get(handlers::view_descriptor))
        // GET /admin/employer-requests?search=&sort=&direction=&page=
        // Employer registration requests awaiting approval.
        .route(
            "/admin/employer-requests",
            get(handlers::list_employer_requests),
        )
        .route("/admin/employers", get(handlers::view_descriptor))
        .route("/admin/graduates", get(handlers::view_descriptor))
        .route("/admin/analytics", get(handlers::view_descriptor))
        .route("/admin/settings", get(handlers::view_descriptor));

    guarded(router, storage, [Role::Admin])
}
