use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicI64, Ordering},
    },
};

use crate::{
    auth::Role,
    models::{
        BackendUser, LoginRequest, LoginResponse, RegisterEmployerRequest, RegisterRequest,
        Session,
    },
};

/// BackendError
///
/// Failures of the login/registration exchange with the backend.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("backend rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("backend transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("backend returned unrecognized role `{0}`")]
    UnrecognizedRole(String),
    #[error("credential token signing failed: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

// 1. AuthBackend Contract
/// AuthBackend
///
/// The external service that owns user accounts. The portal only needs the login exchange
/// (which yields the backend's role identifier and a credential token), logout and the two
/// registration flows.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    async fn login(&self, credentials: &LoginRequest) -> Result<LoginResponse, BackendError>;

    /// Invalidates the credential on the backend side. Callers treat failures as non-fatal.
    async fn logout(&self, credential_token: Option<&str>) -> Result<(), BackendError>;

    async fn register(&self, request: &RegisterRequest) -> Result<(), BackendError>;

    async fn register_employer(
        &self,
        request: &RegisterEmployerRequest,
    ) -> Result<(), BackendError>;
}

/// BackendState
///
/// The concrete type used to share the backend client across the application state.
pub type BackendState = Arc<dyn AuthBackend>;

/// session_from_login
///
/// Builds the session to persist after a successful login. The backend role is translated
/// through the role table; an unknown role yields no session at all.
pub fn session_from_login(
    response: &LoginResponse,
    now_millis: i64,
    ttl: Duration,
) -> Result<Session, BackendError> {
    let role = Role::from_backend(&response.user.role).ok_or_else(|| {
        tracing::warn!(
            role = %response.user.role,
            user_id = response.user.id,
            "backend returned a role outside the role table"
        );
        BackendError::UnrecognizedRole(response.user.role.clone())
    })?;

    Ok(Session::authenticated(
        role,
        response.user.id.to_string(),
        response.token.clone(),
        Some(now_millis.saturating_add(ttl.num_milliseconds())),
    ))
}

// 2. The REST Implementation
/// RestAuthBackend
///
/// Talks JSON to the backend's `/api/v1/auth/*` endpoints.
#[derive(Clone)]
pub struct RestAuthBackend {
    client: reqwest::Client,
    base_url: String,
}

impl RestAuthBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: Option<&B>,
        credential_token: Option<&str>,
    ) -> Result<reqwest::Response, BackendError> {
        let mut request = self.client.post(format!("{}{}", self.base_url, path));
        if let Some(body) = body {
            request = request.json(body);
        }
        if let Some(token) = credential_token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;
        check_status(response).await
    }
}

#[derive(Deserialize)]
struct BackendErrorBody {
    error: Option<String>,
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        return Err(BackendError::InvalidCredentials);
    }
    let message = response
        .json::<BackendErrorBody>()
        .await
        .ok()
        .and_then(|body| body.error)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_string());
    Err(BackendError::Rejected {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl AuthBackend for RestAuthBackend {
    async fn login(&self, credentials: &LoginRequest) -> Result<LoginResponse, BackendError> {
        let response = self
            .post("/api/v1/auth/login", Some(credentials), None)
            .await?;
        Ok(response.json::<LoginResponse>().await?)
    }

    async fn logout(&self, credential_token: Option<&str>) -> Result<(), BackendError> {
        self.post::<()>("/api/v1/auth/logout", None, credential_token)
            .await?;
        Ok(())
    }

    async fn register(&self, request: &RegisterRequest) -> Result<(), BackendError> {
        self.post("/api/v1/auth/register", Some(request), None)
            .await?;
        Ok(())
    }

    async fn register_employer(
        &self,
        request: &RegisterEmployerRequest,
    ) -> Result<(), BackendError> {
        self.post("/api/v1/auth/register/employer", Some(request), None)
            .await?;
        Ok(())
    }
}

// 3. The Local Implementation (development)
/// Claims
///
/// Payload of the credential tokens issued by `LocalAuthBackend`. The portal itself never
/// decodes them; they exist so downstream services see a realistic bearer token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Backend user id.
    pub sub: String,
    /// Backend role identifier.
    pub role: String,
    pub iat: usize,
    pub exp: usize,
}

/// LocalAuthBackend
///
/// In-process stand-in for the backend, used in `Env::Local`. Accounts live in memory.
/// Any non-empty email/password pair logs in; an unregistered email gets a role derived
/// from it (`employer` or `admin` substrings, otherwise `jobseeker`) and is remembered.
pub struct LocalAuthBackend {
    jwt_secret: String,
    token_ttl: Duration,
    users: RwLock<HashMap<String, BackendUser>>,
    next_id: AtomicI64,
}

impl LocalAuthBackend {
    pub fn new(jwt_secret: impl Into<String>, token_ttl: Duration) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            token_ttl,
            users: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    fn derive_role(email: &str) -> Role {
        if email.contains("employer") {
            Role::Employer
        } else if email.contains("admin") {
            Role::Admin
        } else {
            Role::Graduate
        }
    }

    fn insert_user(
        &self,
        email: &str,
        first_name: &str,
        last_name: &str,
        role: Role,
    ) -> BackendUser {
        let user = BackendUser {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            email: email.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            role: role.backend_name().to_string(),
            is_active: true,
            is_verified: false,
        };
        self.users.write().insert(email.to_string(), user.clone());
        user
    }

    fn issue_token(&self, user: &BackendUser) -> Result<String, BackendError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.to_string(),
            role: user.role.clone(),
            iat: now.timestamp() as usize,
            exp: now
                .checked_add_signed(self.token_ttl)
                .unwrap_or(DateTime::<Utc>::MAX_UTC)
                .timestamp() as usize,
        };
        let key = EncodingKey::from_secret(self.jwt_secret.as_bytes());
        Ok(encode(&Header::default(), &claims, &key)?)
    }

    fn register_with_role(
        &self,
        request: &RegisterRequest,
        role: Role,
    ) -> Result<(), BackendError> {
        let email = request.email.trim().to_lowercase();
        if email.is_empty() || request.password.is_empty() {
            return Err(BackendError::Rejected {
                status: 400,
                message: "email and password are required".to_string(),
            });
        }
        if self.users.read().contains_key(&email) {
            return Err(BackendError::Rejected {
                status: 409,
                message: "email already registered".to_string(),
            });
        }
        self.insert_user(&email, &request.first_name, &request.last_name, role);
        tracing::info!(email = %email, role = %role, "registered local account");
        Ok(())
    }
}

#[async_trait]
impl AuthBackend for LocalAuthBackend {
    async fn login(&self, credentials: &LoginRequest) -> Result<LoginResponse, BackendError> {
        let email = credentials.email.trim().to_lowercase();
        if email.is_empty() || credentials.password.is_empty() {
            return Err(BackendError::InvalidCredentials);
        }

        let existing = self.users.read().get(&email).cloned();
        let user = match existing {
            Some(user) => user,
            None => self.insert_user(&email, "", "", Self::derive_role(&email)),
        };
        let token = self.issue_token(&user)?;

        Ok(LoginResponse {
            user,
            token: Some(token),
        })
    }

    async fn logout(&self, _credential_token: Option<&str>) -> Result<(), BackendError> {
        Ok(())
    }

    async fn register(&self, request: &RegisterRequest) -> Result<(), BackendError> {
        let role = match request.role.as_deref() {
            None => Role::Graduate,
            Some(name) => Role::from_backend(name).ok_or_else(|| BackendError::Rejected {
                status: 400,
                message: format!("unknown role `{}`", name),
            })?,
        };
        self.register_with_role(request, role)
    }

    async fn register_employer(
        &self,
        request: &RegisterEmployerRequest,
    ) -> Result<(), BackendError> {
        if request.company_name.trim().is_empty() {
            return Err(BackendError::Rejected {
                status: 400,
                message: "company_name is required".to_string(),
            });
        }
        self.register_with_role(&request.user, Role::Employer)
    }
}
