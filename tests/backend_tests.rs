use chrono::Duration;
use eujim_portal::{
    auth::Role,
    backend::{AuthBackend, BackendError, Claims, LocalAuthBackend, session_from_login},
    models::{BackendUser, LoginRequest, LoginResponse, RegisterEmployerRequest, RegisterRequest},
};
use jsonwebtoken::{DecodingKey, Validation, decode};

const SECRET: &str = "backend-test-secret";

fn backend() -> LocalAuthBackend {
    LocalAuthBackend::new(SECRET, Duration::hours(1))
}

fn credentials(email: &str) -> LoginRequest {
    LoginRequest {
        email: email.to_string(),
        password: "pw".to_string(),
    }
}

fn register_request(email: &str) -> RegisterRequest {
    RegisterRequest {
        email: email.to_string(),
        password: "pw".to_string(),
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        role: None,
    }
}

// --- LocalAuthBackend ---

#[tokio::test]
async fn test_local_login_derives_role_from_email() {
    let backend = backend();

    let grad = backend.login(&credentials("jane@uni.ac.ke")).await.unwrap();
    assert_eq!(grad.user.role, "jobseeker");

    let employer = backend.login(&credentials("hr@employer.co")).await.unwrap();
    assert_eq!(employer.user.role, "employer");

    let admin = backend.login(&credentials("admin@eujim.org")).await.unwrap();
    assert_eq!(admin.user.role, "admin");
}

#[tokio::test]
async fn test_local_login_rejects_empty_credentials() {
    let backend = backend();
    let result = backend
        .login(&LoginRequest {
            email: "  ".to_string(),
            password: "pw".to_string(),
        })
        .await;
    assert!(matches!(result, Err(BackendError::InvalidCredentials)));

    let result = backend
        .login(&LoginRequest {
            email: "a@b.c".to_string(),
            password: String::new(),
        })
        .await;
    assert!(matches!(result, Err(BackendError::InvalidCredentials)));
}

#[tokio::test]
async fn test_local_login_is_stable_per_email() {
    let backend = backend();
    let first = backend.login(&credentials("Jane@Uni.ac.ke")).await.unwrap();
    let second = backend.login(&credentials("jane@uni.ac.ke ")).await.unwrap();
    assert_eq!(first.user.id, second.user.id);
}

#[tokio::test]
async fn test_local_token_carries_claims() {
    let backend = backend();
    let response = backend.login(&credentials("hr@employer.co")).await.unwrap();
    let token = response.token.expect("local backend always issues a token");

    let decoded = decode::<Claims>(
        &token,
        &DecodingKey::from_secret(SECRET.as_bytes()),
        &Validation::default(),
    )
    .unwrap();

    assert_eq!(decoded.claims.sub, response.user.id.to_string());
    assert_eq!(decoded.claims.role, "employer");
    assert_eq!(decoded.claims.exp - decoded.claims.iat, 3600);
}

#[tokio::test]
async fn test_local_register_assigns_requested_role() {
    let backend = backend();

    backend.register(&register_request("plain@mail.com")).await.unwrap();
    let graduate = backend.login(&credentials("plain@mail.com")).await.unwrap();
    assert_eq!(graduate.user.role, "jobseeker");
    assert_eq!(graduate.user.first_name, "Ada");

    let mut as_admin = register_request("ops@mail.com");
    as_admin.role = Some("admin".to_string());
    backend.register(&as_admin).await.unwrap();
    let admin = backend.login(&credentials("ops@mail.com")).await.unwrap();
    assert_eq!(admin.user.role, "admin");
}

#[tokio::test]
async fn test_local_register_rejects_duplicates_and_unknown_roles() {
    let backend = backend();
    backend.register(&register_request("dup@mail.com")).await.unwrap();

    let duplicate = backend.register(&register_request("dup@mail.com")).await;
    assert!(matches!(
        duplicate,
        Err(BackendError::Rejected { status: 409, .. })
    ));

    let mut unknown = register_request("who@mail.com");
    unknown.role = Some("graduate".to_string());
    let result = backend.register(&unknown).await;
    assert!(matches!(result, Err(BackendError::Rejected { status: 400, .. })));
}

#[tokio::test]
async fn test_local_register_employer() {
    let backend = backend();
    let request = RegisterEmployerRequest {
        user: register_request("talent@acme.com"),
        company_name: "Acme".to_string(),
        company_description: "Widgets".to_string(),
        industry: "Manufacturing".to_string(),
    };
    backend.register_employer(&request).await.unwrap();

    let employer = backend.login(&credentials("talent@acme.com")).await.unwrap();
    assert_eq!(employer.user.role, "employer");

    let missing_company = RegisterEmployerRequest {
        user: register_request("other@acme.com"),
        ..Default::default()
    };
    assert!(backend.register_employer(&missing_company).await.is_err());
}

// --- Session construction ---

fn login_response(role: &str) -> LoginResponse {
    LoginResponse {
        user: BackendUser {
            id: 12345,
            email: "user@example.com".to_string(),
            role: role.to_string(),
            ..Default::default()
        },
        token: Some("opaque".to_string()),
    }
}

#[test]
fn test_session_from_login_maps_jobseeker_to_graduate() {
    let session = session_from_login(&login_response("jobseeker"), 1_000, Duration::hours(24))
        .unwrap();

    assert!(session.is_authenticated);
    assert_eq!(session.role, Some(Role::Graduate));
    assert_eq!(session.subject_id.as_deref(), Some("12345"));
    assert_eq!(session.credential_token.as_deref(), Some("opaque"));
    assert_eq!(
        session.expires_at_epoch_millis,
        Some(1_000 + 24 * 60 * 60 * 1000)
    );
}

#[test]
fn test_session_from_login_saturates_far_expiry() {
    let session = session_from_login(&login_response("admin"), 1_000, Duration::MAX).unwrap();
    assert_eq!(session.expires_at_epoch_millis, Some(i64::MAX));
}

#[test]
fn test_session_from_login_rejects_unknown_role() {
    let result = session_from_login(&login_response("superuser"), 0, Duration::hours(1));
    assert!(matches!(result, Err(BackendError::UnrecognizedRole(role)) if role == "superuser"));
}

#[test]
fn test_login_response_parses_backend_json() {
    let raw = r#"{
        "user": {"id": 7, "email": "e@x.com", "first_name": "E", "last_name": "X", "role": "employer"},
        "token": "abc"
    }"#;
    let response: LoginResponse = serde_json::from_str(raw).unwrap();
    assert_eq!(response.user.role, "employer");
    assert!(response.user.is_active);
    assert!(!response.user.is_verified);
    assert_eq!(response.token.as_deref(), Some("abc"));
}
