use crate::{
    auth::{AuthGate, LOGIN_PATH, Role},
    backend::{BackendState, session_from_login},
    config::AppConfig,
    error::PortalError,
    listings,
    models::{
        ErrorBody, LoginRequest, LoginResult, RegisterEmployerRequest, RegisterRequest, Session,
        ViewDescriptor,
    },
    table::{Record, SortDirection, TablePage, TabularView},
};
use axum::{
    Extension, Json,
    extract::{Query, State},
    http::{StatusCode, Uri},
};
use chrono::Utc;
use serde::Deserialize;

// --- Query Structs ---

/// TableQuery
///
/// Query parameters accepted by every listing view. They are applied in order: search,
/// then sort, then page.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
pub struct TableQuery {
    /// Case-insensitive substring matched against every field of a row.
    pub search: Option<String>,
    /// Field key of the column to sort by. Unknown or unsortable keys are ignored.
    pub sort: Option<String>,
    /// `asc` (default) or `desc`.
    pub direction: Option<SortDirection>,
    /// 1-based page number, clamped to the available pages.
    pub page: Option<usize>,
}

fn apply_query<T: Record>(view: &mut TabularView<T>, query: &TableQuery) {
    if let Some(term) = &query.search {
        view.set_search_term(term.as_str());
    }
    if let Some(field) = &query.sort {
        view.toggle_sort(field);
        if query.direction == Some(SortDirection::Descending) {
            view.toggle_sort(field);
        }
    }
    if let Some(page) = query.page {
        view.set_page(page);
    }
}

fn require_credentials(email: &str, password: &str) -> Result<(), PortalError> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(PortalError::BadRequest(
            "email and password are required".to_string(),
        ));
    }
    Ok(())
}

// --- Auth API ---

/// login
///
/// [Public Route] Exchanges credentials with the backend and stores the resulting session
/// for the caller's scope. The backend role is translated to the portal role before storing.
///
/// Responds with the stored session and the landing view for its role. Nothing is stored
/// when the backend answers with a role outside the role table (502).
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session stored", body = LoginResult),
        (status = 400, description = "Missing credentials", body = ErrorBody),
        (status = 401, description = "Invalid credentials", body = ErrorBody),
        (status = 502, description = "Backend failure or unrecognized role", body = ErrorBody)
    )
)]
pub async fn login(
    gate: AuthGate,
    State(backend): State<BackendState>,
    State(config): State<AppConfig>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResult>, PortalError> {
    require_credentials(&payload.email, &payload.password)?;

    let response = backend.login(&payload).await?;
    let session = session_from_login(
        &response,
        Utc::now().timestamp_millis(),
        config.session_ttl,
    )?;
    gate.set_session(&session)?;

    let redirect_to = session
        .role
        .map(Role::home_path)
        .unwrap_or(LOGIN_PATH)
        .to_string();
    tracing::info!(
        subject_id = ?session.subject_id,
        role = ?session.role,
        "login succeeded"
    );

    Ok(Json(LoginResult {
        session,
        redirect_to,
    }))
}

/// register
///
/// [Public Route] Creates an account on the backend. Does not log the caller in.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created"),
        (status = 400, description = "Rejected by the backend", body = ErrorBody),
        (status = 502, description = "Backend unavailable", body = ErrorBody)
    )
)]
pub async fn register(
    State(backend): State<BackendState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<StatusCode, PortalError> {
    require_credentials(&payload.email, &payload.password)?;
    backend.register(&payload).await?;
    Ok(StatusCode::CREATED)
}

/// register_employer
///
/// [Public Route] Creates an employer account together with its company details.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register/employer",
    request_body = RegisterEmployerRequest,
    responses(
        (status = 201, description = "Employer account created"),
        (status = 400, description = "Rejected by the backend", body = ErrorBody),
        (status = 502, description = "Backend unavailable", body = ErrorBody)
    )
)]
pub async fn register_employer(
    State(backend): State<BackendState>,
    Json(payload): Json<RegisterEmployerRequest>,
) -> Result<StatusCode, PortalError> {
    require_credentials(&payload.user.email, &payload.user.password)?;
    backend.register_employer(&payload).await?;
    Ok(StatusCode::CREATED)
}

/// logout
///
/// [Public Route] Clears the caller's session. The backend is notified first; a failure
/// there is logged and does not keep the session alive.
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    responses(
        (status = 204, description = "Session cleared"),
        (status = 500, description = "Session storage failure", body = ErrorBody)
    )
)]
pub async fn logout(
    gate: AuthGate,
    State(backend): State<BackendState>,
) -> Result<StatusCode, PortalError> {
    let session = gate.get_session();
    if session.is_authenticated {
        if let Err(e) = backend.logout(session.credential_token.as_deref()).await {
            tracing::warn!(error = %e, "backend logout failed, clearing local session anyway");
        }
    }
    gate.clear_session()?;
    Ok(StatusCode::NO_CONTENT)
}

/// current_user
///
/// [Public Route] Returns the caller's session as resolved by the gate. Unauthenticated
/// callers receive the default (unauthenticated) session.
#[utoipa::path(
    get,
    path = "/api/v1/auth/current-user",
    responses((status = 200, description = "Current session", body = Session))
)]
pub async fn current_user(gate: AuthGate) -> Json<Session> {
    Json(gate.get_session())
}

// --- Views ---

/// login_view
///
/// [Public Route] Descriptor of the login view, the target of every login redirect.
pub async fn login_view() -> Json<ViewDescriptor> {
    Json(ViewDescriptor {
        view: "auth/login".to_string(),
        role: None,
        subject_id: None,
    })
}

/// view_descriptor
///
/// [Guarded Route] Descriptor of a protected view that has no server-side data. The view name
/// is the request path without its leading slash.
pub async fn view_descriptor(
    uri: Uri,
    Extension(session): Extension<Session>,
) -> Json<ViewDescriptor> {
    Json(ViewDescriptor {
        view: uri.path().trim_start_matches('/').to_string(),
        role: session.role,
        subject_id: session.subject_id,
    })
}

/// list_employer_requests
///
/// [Admin Route] Employer registration requests awaiting review.
#[utoipa::path(
    get,
    path = "/admin/employer-requests",
    params(TableQuery),
    responses(
        (status = 200, description = "Page of employer requests", body = TablePage),
        (status = 303, description = "Redirect to login or to the caller's home view")
    )
)]
pub async fn list_employer_requests(
    State(config): State<AppConfig>,
    Query(query): Query<TableQuery>,
) -> Json<TablePage> {
    let mut view = listings::employer_request_view(config.page_size);
    apply_query(&mut view, &query);
    Json(view.render_page())
}

/// list_jobs
///
/// [Graduate Route] Job postings open to graduates.
#[utoipa::path(
    get,
    path = "/graduate/jobs",
    params(TableQuery),
    responses(
        (status = 200, description = "Page of job postings", body = TablePage),
        (status = 303, description = "Redirect to login or to the caller's home view")
    )
)]
pub async fn list_jobs(
    State(config): State<AppConfig>,
    Query(query): Query<TableQuery>,
) -> Json<TablePage> {
    let mut view = listings::job_posting_view(config.page_size);
    apply_query(&mut view, &query);
    Json(view.render_page())
}

/// search_graduates
///
/// [Employer Route] Graduate profiles searchable by employers.
#[utoipa::path(
    get,
    path = "/employer/search",
    params(TableQuery),
    responses(
        (status = 200, description = "Page of graduate profiles", body = TablePage),
        (status = 303, description = "Redirect to login or to the caller's home view")
    )
)]
pub async fn search_graduates(
    State(config): State<AppConfig>,
    Query(query): Query<TableQuery>,
) -> Json<TablePage> {
    let mut view = listings::graduate_profile_view(config.page_size);
    apply_query(&mut view, &query);
    Json(view.render_page())
}
