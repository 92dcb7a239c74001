//! Authentication flow tests: login, registration, the superadmin bootstrap
//! path, and the bearer-token extractor, all exercised against the in-memory
//! repository.

mod common;

use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Json, State},
    http::{Method, Request, StatusCode, Uri, header, request::Parts},
};
use chrono::Duration;
use jsonwebtoken::{DecodingKey, Validation, decode};
use menu_portal::{
    ApiError,
    auth::{self, AuthUser, Claims},
    handlers,
    models::{LoginRequest, RegisterRequest, RegisterSuperadminRequest, Role},
    repository::Repository,
};
use uuid::Uuid;

use common::{InMemoryRepository, test_state};

fn request_parts(method: Method, uri: Uri) -> Parts {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap();
    let (parts, _) = request.into_parts();
    parts
}

// --- Login ---

#[tokio::test]
async fn login_returns_token_for_valid_credentials() {
    let repo = Arc::new(InMemoryRepository::new());
    let hash = auth::hash_password("hunter22").unwrap();
    let seeded = repo.seed_user("admin@resto.test", &hash, Role::Admin);
    let state = test_state(repo);
    let secret = state.config.jwt_secret.clone();

    let result = handlers::auth::login(
        State(state),
        Json(LoginRequest {
            email: "admin@resto.test".to_string(),
            password: "hunter22".to_string(),
        }),
    )
    .await;

    let Json(body) = result.expect("valid credentials must authenticate");
    assert_eq!(body.id, seeded.id);
    assert_eq!(body.role, Role::Admin);

    // The token must decode under the configured secret and carry the same
    // subject and role.
    let claims = decode::<Claims>(
        &body.token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .unwrap()
    .claims;
    assert_eq!(claims.sub, seeded.id);
    assert_eq!(claims.role, Role::Admin);
}

#[tokio::test]
async fn login_rejects_wrong_password_and_unknown_email_identically() {
    let repo = Arc::new(InMemoryRepository::new());
    let hash = auth::hash_password("correct").unwrap();
    repo.seed_user("admin@resto.test", &hash, Role::Admin);
    let state = test_state(repo);

    let wrong_password = handlers::auth::login(
        State(state.clone()),
        Json(LoginRequest {
            email: "admin@resto.test".to_string(),
            password: "incorrect".to_string(),
        }),
    )
    .await
    .unwrap_err();

    let unknown_email = handlers::auth::login(
        State(state),
        Json(LoginRequest {
            email: "nobody@resto.test".to_string(),
            password: "correct".to_string(),
        }),
    )
    .await
    .unwrap_err();

    // Same category, same message: the endpoint must not reveal which emails
    // exist.
    assert!(matches!(wrong_password, ApiError::Unauthorized(_)));
    assert!(matches!(unknown_email, ApiError::Unauthorized(_)));
    assert_eq!(wrong_password.to_string(), unknown_email.to_string());
}

// --- Registration ---

#[tokio::test]
async fn register_creates_account_and_issues_session_token() {
    let repo = Arc::new(InMemoryRepository::new());
    let state = test_state(repo.clone());
    let secret = state.config.jwt_secret.clone();

    let (status, Json(body)) = handlers::auth::register(
        State(state),
        Json(RegisterRequest {
            email: "new@resto.test".to_string(),
            password: "pa55word".to_string(),
            role: "admin".to_string(),
        }),
    )
    .await
    .unwrap();

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body.role, Role::Admin);

    // Session tokens last 3 hours.
    let claims = decode::<Claims>(
        &body.token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .unwrap()
    .claims;
    assert_eq!(claims.exp - claims.iat, 3 * 3600);

    // The stored password is a hash, never the plaintext.
    let stored = repo
        .find_user_by_email("new@resto.test")
        .await
        .unwrap()
        .unwrap();
    assert_ne!(stored.password_hash, "pa55word");
    assert!(auth::verify_password("pa55word", &stored.password_hash));
}

#[tokio::test]
async fn register_rejects_unknown_role_before_store_access() {
    let repo = Arc::new(InMemoryRepository::new());
    let state = test_state(repo.clone());

    let err = handlers::auth::register(
        State(state),
        Json(RegisterRequest {
            email: "new@resto.test".to_string(),
            password: "pa55word".to_string(),
            role: "owner".to_string(),
        }),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, ApiError::Validation(_)));
    assert!(repo.find_user_by_email("new@resto.test").await.unwrap().is_none());
}

#[tokio::test]
async fn register_rejects_duplicate_email() {
    let repo = Arc::new(InMemoryRepository::new());
    repo.seed_user("taken@resto.test", "x", Role::Admin);
    let state = test_state(repo);

    let err = handlers::auth::register(
        State(state),
        Json(RegisterRequest {
            email: "taken@resto.test".to_string(),
            password: "pa55word".to_string(),
            role: "admin".to_string(),
        }),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, ApiError::Conflict(_)));
}

#[tokio::test]
async fn register_rejects_blank_credentials() {
    let state = test_state(Arc::new(InMemoryRepository::new()));

    let err = handlers::auth::register(
        State(state),
        Json(RegisterRequest {
            email: "   ".to_string(),
            password: "pa55word".to_string(),
            role: "admin".to_string(),
        }),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, ApiError::Validation(_)));
}

#[tokio::test]
async fn bootstrap_registration_forces_superadmin_and_long_token() {
    let repo = Arc::new(InMemoryRepository::new());
    let state = test_state(repo.clone());
    let secret = state.config.jwt_secret.clone();

    let (status, Json(body)) = handlers::auth::register_superadmin(
        State(state),
        Json(RegisterSuperadminRequest {
            email: "boot@resto.test".to_string(),
            password: "pa55word".to_string(),
        }),
    )
    .await
    .unwrap();

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body.role, Role::Superadmin);
    assert_eq!(repo.superadmin_count(), 1);

    // The bootstrap token lasts 30 days, not the usual 3 hours.
    let claims = decode::<Claims>(
        &body.token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .unwrap()
    .claims;
    assert_eq!(claims.exp - claims.iat, 30 * 24 * 3600);
}

// --- Extractor ---

#[tokio::test]
async fn extractor_accepts_valid_bearer_token() {
    let state = test_state(Arc::new(InMemoryRepository::new()));
    let user_id = Uuid::new_v4();
    let token = auth::issue_token(
        user_id,
        Role::Superadmin,
        Duration::hours(1),
        &state.config.jwt_secret,
    )
    .unwrap();

    let mut parts = request_parts(Method::GET, "/users".parse().unwrap());
    parts.headers.insert(
        header::AUTHORIZATION,
        header::HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
    );

    let auth_user = AuthUser::from_request_parts(&mut parts, &state)
        .await
        .expect("valid token must authenticate");
    assert_eq!(auth_user.id, user_id);
    assert_eq!(auth_user.role, Role::Superadmin);
}

#[tokio::test]
async fn extractor_rejects_missing_header() {
    let state = test_state(Arc::new(InMemoryRepository::new()));
    let mut parts = request_parts(Method::GET, "/users".parse().unwrap());

    let err = AuthUser::from_request_parts(&mut parts, &state)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized(_)));
    assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn extractor_rejects_expired_token() {
    let state = test_state(Arc::new(InMemoryRepository::new()));
    // Negative TTL: already expired when issued.
    let token = auth::issue_token(
        Uuid::new_v4(),
        Role::Admin,
        Duration::hours(-1),
        &state.config.jwt_secret,
    )
    .unwrap();

    let mut parts = request_parts(Method::GET, "/menu/admin-menu".parse().unwrap());
    parts.headers.insert(
        header::AUTHORIZATION,
        header::HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
    );

    let err = AuthUser::from_request_parts(&mut parts, &state)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized(_)));
}

#[tokio::test]
async fn extractor_rejects_token_signed_with_other_secret() {
    let state = test_state(Arc::new(InMemoryRepository::new()));
    let token =
        auth::issue_token(Uuid::new_v4(), Role::Superadmin, Duration::hours(1), "other-secret")
            .unwrap();

    let mut parts = request_parts(Method::GET, "/users".parse().unwrap());
    parts.headers.insert(
        header::AUTHORIZATION,
        header::HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
    );

    let err = AuthUser::from_request_parts(&mut parts, &state)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized(_)));
}

// --- Role guard ---

#[test]
fn require_role_follows_the_role_order() {
    let admin = AuthUser {
        id: Uuid::new_v4(),
        role: Role::Admin,
    };
    let superadmin = AuthUser {
        id: Uuid::new_v4(),
        role: Role::Superadmin,
    };

    assert!(admin.require_role(Role::Admin).is_ok());
    assert!(admin.require_role(Role::Superadmin).is_err());
    assert!(superadmin.require_role(Role::Admin).is_ok());
    assert!(superadmin.require_role(Role::Superadmin).is_ok());
}
