use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

use crate::auth::{self, Role};

// --- Persisted Session ---

/// Session
///
/// The identity record persisted under the `"auth"` storage key, serialized with camelCase
/// field names. `Session::default()` is the unauthenticated session.
///
/// The credential token is opaque: it is stored and forwarded, never parsed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Session {
    pub is_authenticated: bool,
    #[serde(default, deserialize_with = "auth::deserialize_role_lenient")]
    pub role: Option<Role>,
    #[serde(default)]
    pub subject_id: Option<String>,
    #[serde(default)]
    pub credential_token: Option<String>,
    #[serde(default)]
    #[ts(type = "number | null")]
    pub expires_at_epoch_millis: Option<i64>,
}

impl Session {
    /// An authenticated session for `role`.
    pub fn authenticated(
        role: Role,
        subject_id: impl Into<String>,
        credential_token: Option<String>,
        expires_at_epoch_millis: Option<i64>,
    ) -> Self {
        Self {
            is_authenticated: true,
            role: Some(role),
            subject_id: Some(subject_id.into()),
            credential_token,
            expires_at_epoch_millis,
        }
    }

    /// True once the expiry instant has been reached. Sessions without an expiry never expire.
    pub fn is_expired_at(&self, now_millis: i64) -> bool {
        matches!(self.expires_at_epoch_millis, Some(expires_at) if expires_at <= now_millis)
    }
}

// --- Request Payloads (Input Schemas) ---

/// LoginRequest
///
/// Credentials for POST /api/v1/auth/login. Forwarded to the backend as-is.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// RegisterRequest
///
/// Input payload for POST /api/v1/auth/register. `role` uses the backend vocabulary
/// (`jobseeker`, `employer`, `admin`); the backend defaults it when absent.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// RegisterEmployerRequest
///
/// Input payload for POST /api/v1/auth/register/employer.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct RegisterEmployerRequest {
    #[serde(flatten)]
    pub user: RegisterRequest,
    pub company_name: String,
    pub company_description: String,
    pub industry: String,
}

// --- Backend Exchange ---

/// BackendUser
///
/// The user record returned by the backend's login endpoint. `role` is a backend identifier.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
pub struct BackendUser {
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub role: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_verified: bool,
}

fn default_true() -> bool {
    true
}

/// LoginResponse
///
/// Backend answer to a successful login exchange.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
pub struct LoginResponse {
    pub user: BackendUser,
    #[serde(default)]
    pub token: Option<String>,
}

// --- Portal Responses (Output Schemas) ---

/// LoginResult
///
/// Output of POST /api/v1/auth/login: the stored session and the landing view for its role.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LoginResult {
    pub session: Session,
    pub redirect_to: String,
}

/// ViewDescriptor
///
/// Placeholder body for protected views whose layout lives outside this service.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ViewDescriptor {
    pub view: String,
    pub role: Option<Role>,
    pub subject_id: Option<String>,
}

/// ErrorBody
///
/// JSON body of every error response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}
