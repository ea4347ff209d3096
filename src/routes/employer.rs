use crate::{AppState, auth::Role, handlers, storage::StorageState};
use axum::{Router, routing::get};

use super::guarded;

/// Employer Router Module
pub fn employer_routes(storage: &StorageState) -> Router<AppState> {
    let router = Router::new()
        // GET /employer
        // Employer home (dashboard).
        .route("/employer", get(handlers::view_descriptor))
        // GET /employer/search?search=&sort=&direction=&page=
        // Graduate search listing.
        .route("/employer/search", get(handlers::search_graduates));

    guarded(router, storage, [Role::Employer])
}
