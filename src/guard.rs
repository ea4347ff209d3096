use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{
    CookieJar,
    cookie::{Cookie, SameSite},
};
use std::sync::Arc;
use time::Duration;
use uuid::Uuid;

use crate::{
    auth::{AuthGate, RoleRequirement, decide},
    error::PortalError,
    storage::{ScopedStorage, StorageState},
};

/// Name of the cookie identifying one browser's session scope.
pub const SCOPE_COOKIE: &str = "portal_scope";

const SCOPE_COOKIE_DAYS: i64 = 30;

/// ClientScope
///
/// The storage namespace of the calling client, resolved by `scope_middleware` and stored in
/// the request extensions. Each scope holds at most one live session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientScope(pub String);

fn scope_cookie(scope: &str) -> Cookie<'static> {
    Cookie::build((SCOPE_COOKIE, scope.to_string()))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(Duration::days(SCOPE_COOKIE_DAYS))
        .build()
}

/// scope_middleware
///
/// Resolves the client scope from the `portal_scope` cookie, issuing a fresh one when the
/// cookie is absent or not a UUID.
pub async fn scope_middleware(jar: CookieJar, mut request: Request, next: Next) -> Response {
    let existing = jar
        .get(SCOPE_COOKIE)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok());

    let (jar, scope) = match existing {
        Some(scope) => (jar, scope.to_string()),
        None => {
            let scope = Uuid::new_v4().to_string();
            tracing::debug!(scope = %scope, "issuing new client scope");
            (jar.add(scope_cookie(&scope)), scope)
        }
    };

    request.extensions_mut().insert(ClientScope(scope));
    let response = next.run(request).await;
    (jar, response).into_response()
}

/// AuthGate Extractor
///
/// Builds the gate for the caller's scope. Requires `scope_middleware` to have run.
impl<S> FromRequestParts<S> for AuthGate
where
    S: Send + Sync,
    StorageState: FromRef<S>,
{
    type Rejection = PortalError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let scope = parts
            .extensions
            .get::<ClientScope>()
            .cloned()
            .ok_or(PortalError::MissingScope)?;
        let storage = StorageState::from_ref(state);
        Ok(AuthGate::new(Arc::new(ScopedStorage::new(storage, scope.0))))
    }
}

/// GuardState
///
/// State of one route guard: the shared storage and the roles the guarded views accept.
#[derive(Clone)]
pub struct GuardState {
    pub storage: StorageState,
    pub requirement: RoleRequirement,
}

impl GuardState {
    pub fn new(storage: StorageState, requirement: RoleRequirement) -> Self {
        Self {
            storage,
            requirement,
        }
    }
}

impl FromRef<GuardState> for StorageState {
    fn from_ref(guard: &GuardState) -> StorageState {
        guard.storage.clone()
    }
}

/// require_role
///
/// Route guard for protected views. Applies the gate's decision: the request proceeds with
/// the resolved `Session` in its extensions, or the client is redirected (303) to the login
/// view or to its own role's home view.
pub async fn require_role(
    State(guard): State<GuardState>,
    gate: AuthGate,
    mut request: Request,
    next: Next,
) -> Response {
    let session = gate.get_session();
    let decision = decide(&session, &guard.requirement);

    match decision.redirect_target() {
        None => {
            request.extensions_mut().insert(session);
            next.run(request).await
        }
        Some(target) => {
            tracing::info!(
                path = %request.uri().path(),
                decision = ?decision,
                redirect_to = target,
                "redirecting guarded request"
            );
            Redirect::to(target).into_response()
        }
    }
}
