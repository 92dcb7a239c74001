use axum::{Json, extract::State, http::StatusCode};
use chrono::Duration;
use std::str::FromStr;

use crate::{
    AppState,
    auth::{self, BOOTSTRAP_TTL_DAYS, SESSION_TTL_HOURS},
    error::ApiError,
    models::{AuthResponse, LoginRequest, RegisterRequest, RegisterSuperadminRequest, Role},
};

/// login
///
/// [Public Route] Exchanges credentials for a 3-hour bearer token.
///
/// *Security*: unknown email and wrong password produce the same message, so
/// the endpoint does not confirm which emails exist. No token is issued on
/// any failure path.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = AuthResponse),
        (status = 401, description = "Bad credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let user = state
        .repo
        .find_user_by_email(payload.email.trim())
        .await?
        .filter(|u| auth::verify_password(&payload.password, &u.password_hash))
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".to_string()))?;

    let token = auth::issue_token(
        user.id,
        user.role,
        Duration::hours(SESSION_TTL_HOURS),
        &state.config.jwt_secret,
    )?;

    Ok(Json(AuthResponse {
        id: user.id,
        email: user.email,
        role: user.role,
        token,
    }))
}

/// register
///
/// [Public Route] Creates an account with an explicit role and returns the
/// identity plus a 3-hour token. Role strings outside {admin, superadmin}
/// are rejected before any store access.
///
/// *Note*: the endpoint is unauthenticated, matching the deployed contract;
/// there is no rate limiting here.
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registered", body = AuthResponse),
        (status = 400, description = "Invalid role or duplicate email")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let role = Role::from_str(&payload.role)
        .map_err(|_| ApiError::Validation("Invalid user type".to_string()))?;

    create_account(&state, &payload.email, &payload.password, role, Duration::hours(SESSION_TTL_HOURS))
        .await
}

/// register_superadmin
///
/// [Public Route] Bootstrap path for standing up the first superadmin: the
/// role is forced and the issued token lasts 30 days instead of 3 hours, long
/// enough to finish initial setup from a fresh deployment.
#[utoipa::path(
    post,
    path = "/auth/register-superadmin",
    request_body = RegisterSuperadminRequest,
    responses(
        (status = 201, description = "Registered", body = AuthResponse),
        (status = 400, description = "Duplicate email")
    )
)]
pub async fn register_superadmin(
    State(state): State<AppState>,
    Json(payload): Json<RegisterSuperadminRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    create_account(
        &state,
        &payload.email,
        &payload.password,
        Role::Superadmin,
        Duration::days(BOOTSTRAP_TTL_DAYS),
    )
    .await
}

/// Shared registration flow: validate, check duplicates, hash, insert, sign.
async fn create_account(
    state: &AppState,
    email: &str,
    password: &str,
    role: Role,
    token_ttl: Duration,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err(ApiError::Validation(
            "Email and password are required".to_string(),
        ));
    }

    if state.repo.find_user_by_email(email).await?.is_some() {
        return Err(ApiError::Conflict("User already exists".to_string()));
    }

    let password_hash = auth::hash_password(password)?;
    let user = state.repo.create_user(email, &password_hash, role).await?;

    let token = auth::issue_token(user.id, user.role, token_ttl, &state.config.jwt_secret)?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            id: user.id,
            email: user.email,
            role: user.role,
            token,
        }),
    ))
}
