use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Endpoints reachable without a session. The auth API still resolves the caller's scope,
/// so login and logout act on that client's session only.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Liveness probe for monitoring and load balancers.
        .route("/health", get(|| async { "ok" }))
        // GET /auth/login
        // The login view; every `RedirectToLogin` decision lands here.
        .route("/auth/login", get(handlers::login_view))
        // POST /api/v1/auth/login
        // Backend credential exchange. Stores the session and returns the role's home view.
        .route("/api/v1/auth/login", post(handlers::login))
        // POST /api/v1/auth/register
        .route("/api/v1/auth/register", post(handlers::register))
        // POST /api/v1/auth/register/employer
        .route(
            "/api/v1/auth/register/employer",
            post(handlers::register_employer),
        )
        // POST /api/v1/auth/logout
        // Best-effort backend logout, then the local session is cleared.
        .route("/api/v1/auth/logout", post(handlers::logout))
        // GET /api/v1/auth/current-user
        .route("/api/v1/auth/current-user", get(handlers::current_user))
}
