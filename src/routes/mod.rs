//! Router Module Index
//!
//! Splits the portal's routes by access tier. Every tier except `public` is wrapped in a
//! `require_role` guard carrying the roles its views accept, so a view cannot be mounted
//! without its requirement.

/// Routes reachable without a session: health, the login view and the auth API.
pub mod public;

/// Graduate views (backend role `jobseeker`).
pub mod graduate;

/// Employer views.
pub mod employer;

/// Admin views.
pub mod admin;

use crate::{
    auth::{Role, RoleRequirement},
    guard::{GuardState, require_role},
    storage::StorageState,
    AppState,
};
use axum::{Router, middleware};

/// Wraps `router` in a guard accepting only `roles`.
pub(crate) fn guarded(
    router: Router<AppState>,
    storage: &StorageState,
    roles: impl IntoIterator<Item = Role>,
) -> Router<AppState> {
    let guard = GuardState::new(storage.clone(), RoleRequirement::of(roles));
    router.route_layer(middleware::from_fn_with_state(guard, require_role))
}
