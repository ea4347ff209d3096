use eujim_portal::{
    AppState,
    backend::{BackendState, LocalAuthBackend, RestAuthBackend},
    config::{AppConfig, Env},
    create_router,
    storage::{FileStorage, MemoryStorage, StorageState},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// Entry point: configuration, logging, session storage, auth backend and the HTTP server.
#[tokio::main]
async fn main() {
    // 1. Configuration & Environment Loading (Fail-Fast)
    dotenv::dotenv().ok();
    let config = AppConfig::load();

    // 2. Logging Filter Setup
    // RUST_LOG wins; otherwise debug for the portal and info for the HTTP layer.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "eujim_portal=debug,tower_http=info".into());

    // 3. Log format per environment: pretty locally, JSON for aggregators in production.
    match config.env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Application starting in {:?} mode", config.env);

    // 4. Session Storage
    // File-backed when PORTAL_SESSION_DIR is set, so sessions survive a restart.
    let storage: StorageState = match &config.session_dir {
        Some(dir) => {
            let files = FileStorage::open(dir)
                .expect("FATAL: PORTAL_SESSION_DIR could not be created or opened.");
            tracing::info!(dir = %files.root().display(), "sessions persisted to disk");
            Arc::new(files)
        }
        None => {
            tracing::info!("sessions kept in memory");
            Arc::new(MemoryStorage::new())
        }
    };

    // 5. Auth Backend
    let backend: BackendState = match config.env {
        Env::Local => {
            tracing::warn!("using the in-process auth backend; any non-empty credentials log in");
            Arc::new(LocalAuthBackend::new(
                config.jwt_secret.clone(),
                config.session_ttl,
            ))
        }
        Env::Production => Arc::new(RestAuthBackend::new(config.api_url.clone())),
    };

    // 6. Unified State Assembly
    let bind_addr = config.bind_addr.clone();
    let app_state = AppState {
        storage,
        backend,
        config,
    };

    // 7. Router and Server Startup
    let app = create_router(app_state);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .expect("FATAL: could not bind PORTAL_BIND_ADDR.");

    tracing::info!("Listening on {}", bind_addr);
    tracing::info!("API Documentation (Swagger UI) available at: http://{}/swagger-ui", bind_addr);

    axum::serve(listener, app)
        .await
        .expect("FATAL: HTTP server terminated unexpectedly.");
}
