use axum::{Router, extract::FromRef, http::HeaderName, middleware};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Access control: roles, the session gate and its decisions.
pub mod auth;
// Login/registration collaborator (REST client and local stand-in).
pub mod backend;
pub mod config;
pub mod error;
// HTTP glue: client scope cookie and route guards.
pub mod guard;
pub mod handlers;
// Listing collections and their column sets.
pub mod listings;
pub mod models;
pub mod storage;
// Generic search/sort/paginate table.
pub mod table;

// Routing segregated by access tier (public, graduate, employer, admin).
pub mod routes;
use routes::{admin, employer, graduate, public};

// --- Public Re-exports ---

pub use auth::{AuthGate, Decision, Role, RoleRequirement};
pub use backend::{BackendState, LocalAuthBackend, RestAuthBackend};
pub use config::AppConfig;
pub use storage::{FileStorage, MemoryStorage, StorageState};
pub use table::TabularView;

/// ApiDoc
///
/// OpenAPI document for the auth API and the listing views, served at
/// `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::login, handlers::register, handlers::register_employer, handlers::logout,
        handlers::current_user, handlers::list_employer_requests, handlers::list_jobs,
        handlers::search_graduates
    ),
    components(
        schemas(
            models::Session, models::LoginRequest, models::RegisterRequest,
            models::RegisterEmployerRequest, models::LoginResult, models::ErrorBody,
            models::ViewDescriptor, auth::Role, table::TablePage, table::ColumnHeader,
            table::RenderedRow, table::SortDirection,
        )
    ),
    tags(
        (name = "eujim-portal", description = "Job portal access control and listings")
    )
)]
struct ApiDoc;

/// AppState
///
/// The shared container of services and configuration, cloned into every request.
#[derive(Clone)]
pub struct AppState {
    /// Session storage shared by all client scopes.
    pub storage: StorageState,
    /// Backend owning user accounts.
    pub backend: BackendState,
    /// The loaded, immutable environment configuration.
    pub config: AppConfig,
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for StorageState {
    fn from_ref(app_state: &AppState) -> StorageState {
        app_state.storage.clone()
    }
}

impl FromRef<AppState> for BackendState {
    fn from_ref(app_state: &AppState) -> BackendState {
        app_state.backend.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// create_router
///
/// Assembles the routing structure, applies the guards and the global middleware, and
/// registers the application state.
pub fn create_router(state: AppState) -> Router {
    // 1. CORS Configuration
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    // 2. Base Router Assembly
    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public::public_routes())
        // Guarded tiers: each router carries its own role requirement.
        .merge(graduate::graduate_routes(&state.storage))
        .merge(employer::employer_routes(&state.storage))
        .merge(admin::admin_routes(&state.storage))
        // Every route sees the caller's scope; the guards and the auth API depend on it.
        .layer(middleware::from_fn(guard::scope_middleware))
        .with_state(state);

    // 3. Observability and Correlation Layers
    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        // 4. CORS Layer
        .layer(cors)
}

/// trace_span_logger
///
/// Span factory for `TraceLayer`: method, URI and the `x-request-id` set by
/// `SetRequestIdLayer`, so every log line of a request is correlated.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
