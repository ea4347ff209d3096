use chrono::Duration;
use std::{env, path::PathBuf};

use crate::table::DEFAULT_PAGE_SIZE;

const LOCAL_JWT_SECRET: &str = "portal-local-development-secret";
const DEFAULT_SESSION_TTL_HOURS: i64 = 24;

/// AppConfig
///
/// Holds the portal's configuration. Loaded once at startup and shared through the
/// application state via FromRef.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Runtime environment marker. Selects the auth backend and the log format.
    pub env: Env,
    // Address the HTTP server binds to.
    pub bind_addr: String,
    // Base URL of the backend owning user accounts (RestAuthBackend).
    pub api_url: String,
    // Secret used by the local backend to sign credential tokens.
    pub jwt_secret: String,
    // Directory for file-backed sessions. Sessions stay in memory when unset.
    pub session_dir: Option<PathBuf>,
    // Lifetime given to a session at login.
    pub session_ttl: Duration,
    // Rows per page for every listing view.
    pub page_size: usize,
}

/// Env
///
/// Runtime context. `Local` runs against the in-process auth backend with pretty logs,
/// `Production` against the real backend with JSON logs.
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

impl Default for AppConfig {
    /// default
    ///
    /// Non-panicking configuration for test setup.
    fn default() -> Self {
        Self {
            env: Env::Local,
            bind_addr: "0.0.0.0:3000".to_string(),
            api_url: "http://localhost:8000".to_string(),
            jwt_secret: LOCAL_JWT_SECRET.to_string(),
            session_dir: None,
            session_ttl: Duration::hours(DEFAULT_SESSION_TTL_HOURS),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// Reads the configuration from environment variables.
    ///
    /// # Panics
    /// Panics in production when `PORTAL_API_URL` or `PORTAL_JWT_SECRET` is missing, and in
    /// any environment when a numeric variable is set but unparseable. A session TTL must be
    /// positive and representable as a duration.
    pub fn load() -> Self {
        let env = match env::var("APP_ENV").as_deref() {
            Ok("production") => Env::Production,
            _ => Env::Local,
        };

        let (api_url, jwt_secret) = match env {
            Env::Production => (
                env::var("PORTAL_API_URL")
                    .expect("FATAL: PORTAL_API_URL must be set in production."),
                env::var("PORTAL_JWT_SECRET")
                    .expect("FATAL: PORTAL_JWT_SECRET must be set in production."),
            ),
            Env::Local => (
                env::var("PORTAL_API_URL").unwrap_or_else(|_| "http://localhost:8000".to_string()),
                env::var("PORTAL_JWT_SECRET").unwrap_or_else(|_| LOCAL_JWT_SECRET.to_string()),
            ),
        };

        let session_ttl = env::var("PORTAL_SESSION_TTL_HOURS")
            .ok()
            .map(|raw| {
                raw.parse::<i64>()
                    .ok()
                    .filter(|hours| *hours > 0)
                    .and_then(Duration::try_hours)
                    .expect("FATAL: PORTAL_SESSION_TTL_HOURS must be a positive number of hours.")
            })
            .unwrap_or_else(|| Duration::hours(DEFAULT_SESSION_TTL_HOURS));

        let page_size = env::var("PORTAL_PAGE_SIZE")
            .ok()
            .map(|raw| {
                raw.parse::<usize>()
                    .expect("FATAL: PORTAL_PAGE_SIZE must be a positive integer.")
            })
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .max(1);

        Self {
            env,
            bind_addr: env::var("PORTAL_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            api_url,
            jwt_secret,
            session_dir: env::var("PORTAL_SESSION_DIR")
                .ok()
                .filter(|dir| !dir.trim().is_empty())
                .map(PathBuf::from),
            session_ttl,
            page_size,
        }
    }
}
