use crate::{AppState, auth::Role, handlers, storage::StorageState};
use axum::{Router, routing::get};

use super::guarded;

/// Graduate Router Module
///
/// Views for users the backend calls `jobseeker`. Other roles are sent to their own home.
pub fn graduate_routes(storage: &StorageState) -> Router<AppState> {
    let router = Router::new()
        // GET /graduate
        // Graduate home (dashboard).
        .route("/graduate", get(handlers::view_descriptor))
        .route("/graduate/profile", get(handlers::view_descriptor))
        .route("/graduate/education", get(handlers::view_descriptor))
        .route("/graduate/certificates", get(handlers::view_descriptor))
        // GET /graduate/jobs?search=&sort=&direction=&page=
        // Job search listing.
        .route("/graduate/jobs", get(handlers::list_jobs));

    guarded(router, storage, [Role::Graduate])
}
