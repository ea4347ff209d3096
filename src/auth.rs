use chrono::Utc;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{collections::BTreeSet, fmt};
use ts_rs::TS;
use utoipa::ToSchema;

use crate::{
    models::Session,
    storage::{StorageError, StorageState},
};

/// Storage key under which the single live session is persisted.
pub const SESSION_KEY: &str = "auth";

/// Redirect target for callers without a usable session.
pub const LOGIN_PATH: &str = "/auth/login";

/// Role
///
/// The view category a session belongs to. Serialized with the internal names
/// (`graduate`, `employer`, `admin`); the backend speaks a different vocabulary which is
/// translated exclusively through `ROLE_TABLE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, TS, ToSchema)]
#[ts(export, rename_all = "lowercase")]
#[schema(rename_all = "lowercase")]
pub enum Role {
    Graduate,
    Employer,
    Admin,
}

struct RoleEntry {
    role: Role,
    view_name: &'static str,
    backend_name: &'static str,
    home_path: &'static str,
}

// Indexed by the `Role` discriminant.
const ROLE_TABLE: [RoleEntry; 3] = [
    RoleEntry {
        role: Role::Graduate,
        view_name: "graduate",
        backend_name: "jobseeker",
        home_path: "/graduate",
    },
    RoleEntry {
        role: Role::Employer,
        view_name: "employer",
        backend_name: "employer",
        home_path: "/employer",
    },
    RoleEntry {
        role: Role::Admin,
        view_name: "admin",
        backend_name: "admin",
        home_path: "/admin/dashboard",
    },
];

impl Role {
    pub const ALL: [Role; 3] = [Role::Graduate, Role::Employer, Role::Admin];

    fn entry(self) -> &'static RoleEntry {
        &ROLE_TABLE[self as usize]
    }

    /// Internal view-category name (`graduate`).
    pub fn as_str(self) -> &'static str {
        self.entry().view_name
    }

    /// Identifier the backend uses for this role (`jobseeker`).
    pub fn backend_name(self) -> &'static str {
        self.entry().backend_name
    }

    /// Canonical landing view for this role.
    pub fn home_path(self) -> &'static str {
        self.entry().home_path
    }

    pub fn from_backend(name: &str) -> Option<Role> {
        let name = name.trim();
        ROLE_TABLE
            .iter()
            .find(|e| e.backend_name.eq_ignore_ascii_case(name))
            .map(|e| e.role)
    }

    pub fn from_view_name(name: &str) -> Option<Role> {
        let name = name.trim();
        ROLE_TABLE
            .iter()
            .find(|e| e.view_name.eq_ignore_ascii_case(name))
            .map(|e| e.role)
    }

    /// Accepts either vocabulary. Used when interpreting a stored session, which may have been
    /// written by a caller that kept the backend name.
    pub fn parse(name: &str) -> Option<Role> {
        Self::from_view_name(name).or_else(|| Self::from_backend(name))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Role::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unrecognized role `{}`", raw)))
    }
}

/// Reads an optional role, mapping unknown names to `None` instead of failing the whole
/// session. The gate then treats the session as lacking a recognized role.
pub(crate) fn deserialize_role_lenient<'de, D>(deserializer: D) -> Result<Option<Role>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|name| {
        let role = Role::parse(&name);
        if role.is_none() {
            tracing::warn!(role = %name, "stored session carries an unrecognized role");
        }
        role
    }))
}

/// RoleRequirement
///
/// The set of roles a protected view accepts. The empty set accepts any authenticated role.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleRequirement(BTreeSet<Role>);

impl RoleRequirement {
    /// Any authenticated role.
    pub fn any() -> Self {
        Self::default()
    }

    pub fn of(roles: impl IntoIterator<Item = Role>) -> Self {
        Self(roles.into_iter().collect())
    }

    /// Builds a requirement from backend role identifiers (`jobseeker`, ...).
    ///
    /// Returns `None` if any name is unknown: dropping it would silently widen the
    /// requirement, and an all-unknown list would become "any role".
    pub fn from_backend_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Option<Self> {
        names
            .into_iter()
            .map(Role::from_backend)
            .collect::<Option<BTreeSet<_>>>()
            .map(Self)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn accepts(&self, role: Role) -> bool {
        self.is_empty() || self.0.contains(&role)
    }

    pub fn roles(&self) -> impl Iterator<Item = Role> + '_ {
        self.0.iter().copied()
    }
}

/// Decision
///
/// Outcome of an authorization check. Performing the navigation is the caller's job; see
/// `Decision::redirect_target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    RedirectToLogin,
    RedirectToRoleHome(Role),
}

impl Decision {
    /// Path the caller should navigate to, or `None` for `Allow`.
    pub fn redirect_target(&self) -> Option<&'static str> {
        match self {
            Decision::Allow => None,
            Decision::RedirectToLogin => Some(LOGIN_PATH),
            Decision::RedirectToRoleHome(role) => Some(role.home_path()),
        }
    }
}

/// decide
///
/// Pure authorization rule over an already-resolved session.
pub fn decide(session: &Session, requirement: &RoleRequirement) -> Decision {
    if !session.is_authenticated {
        return Decision::RedirectToLogin;
    }
    let Some(role) = session.role else {
        tracing::warn!(
            subject_id = ?session.subject_id,
            "authenticated session without a recognized role, falling back to login"
        );
        return Decision::RedirectToLogin;
    };
    if requirement.accepts(role) {
        Decision::Allow
    } else {
        Decision::RedirectToRoleHome(role)
    }
}

/// States of the access-control machine. None is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Unauthenticated,
    AuthenticatedAsGraduate,
    AuthenticatedAsEmployer,
    AuthenticatedAsAdmin,
}

impl From<&Session> for GateState {
    fn from(session: &Session) -> Self {
        match (session.is_authenticated, session.role) {
            (true, Some(Role::Graduate)) => GateState::AuthenticatedAsGraduate,
            (true, Some(Role::Employer)) => GateState::AuthenticatedAsEmployer,
            (true, Some(Role::Admin)) => GateState::AuthenticatedAsAdmin,
            _ => GateState::Unauthenticated,
        }
    }
}

/// AuthGate
///
/// Sole owner of the persisted session for one storage scope. Everything else reads the
/// session through `get_session`.
///
/// Reads never fail: a missing, unreadable, corrupt or expired session resolves to the
/// unauthenticated default, and an expired one is purged on the spot.
#[derive(Clone)]
pub struct AuthGate {
    storage: StorageState,
}

impl AuthGate {
    pub fn new(storage: StorageState) -> Self {
        Self { storage }
    }

    pub fn get_session(&self) -> Session {
        self.get_session_at(Utc::now().timestamp_millis())
    }

    /// `get_session` against an explicit clock reading.
    pub fn get_session_at(&self, now_millis: i64) -> Session {
        let raw = match self.storage.get(SESSION_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Session::default(),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "session storage read failed, treating as unauthenticated"
                );
                return Session::default();
            }
        };

        let session: Session = match serde_json::from_str(&raw) {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(error = %e, "discarding unparseable stored session");
                return Session::default();
            }
        };

        if session.is_expired_at(now_millis) {
            tracing::debug!(
                expires_at = ?session.expires_at_epoch_millis,
                "purging expired session"
            );
            if let Err(e) = self.storage.remove(SESSION_KEY) {
                tracing::warn!(error = %e, "failed to purge expired session");
            }
            return Session::default();
        }

        if session.is_authenticated && session.role.is_none() {
            tracing::warn!("stored session is authenticated but has no recognized role");
            return Session::default();
        }

        session
    }

    /// Persists `session` verbatim, replacing the live one.
    pub fn set_session(&self, session: &Session) -> Result<(), StorageError> {
        let raw = serde_json::to_string(session)?;
        self.storage.set(SESSION_KEY, &raw)?;
        tracing::debug!(role = ?session.role, "session stored");
        Ok(())
    }

    /// Removes the live session. Clearing an absent session succeeds.
    pub fn clear_session(&self) -> Result<(), StorageError> {
        self.storage.remove(SESSION_KEY)
    }

    pub fn authorize(&self, requirement: &RoleRequirement) -> Decision {
        decide(&self.get_session(), requirement)
    }

    /// Current machine state as resolved from storage.
    pub fn state(&self) -> GateState {
        GateState::from(&self.get_session())
    }
}
