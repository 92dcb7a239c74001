use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::str::FromStr;
use uuid::Uuid;

use crate::{
    AppState,
    auth::{self, AuthUser},
    error::ApiError,
    models::{MessageResponse, RegisterRequest, Role, UpdateUserRequest, User, UserChanges},
};

/// get_users
///
/// [Superadmin Route] Lists every account. The password hash never appears in
/// this projection.
#[utoipa::path(
    get,
    path = "/users",
    responses(
        (status = 200, description = "All users", body = [User]),
        (status = 403, description = "Not a superadmin")
    )
)]
pub async fn get_users(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<User>>, ApiError> {
    auth.require_role(Role::Superadmin)?;
    Ok(Json(state.repo.list_users().await?))
}

/// create_user
///
/// [Superadmin Route] Creates an account on behalf of someone else. Unlike
/// registration this issues no token; the new user logs in themselves.
#[utoipa::path(
    post,
    path = "/users",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Created", body = User),
        (status = 400, description = "Invalid role or duplicate email")
    )
)]
pub async fn create_user(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    auth.require_role(Role::Superadmin)?;

    let role = Role::from_str(&payload.role)
        .map_err(|_| ApiError::Validation("Invalid user type".to_string()))?;

    let email = payload.email.trim();
    if email.is_empty() || payload.password.is_empty() {
        return Err(ApiError::Validation(
            "Email and password are required".to_string(),
        ));
    }

    if state.repo.find_user_by_email(email).await?.is_some() {
        return Err(ApiError::Conflict("User already exists".to_string()));
    }

    let password_hash = auth::hash_password(&payload.password)?;
    let user = state.repo.create_user(email, &password_hash, role).await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// update_user
///
/// [Superadmin Route] Partial update of email, password (re-hashed), or role.
///
/// *Invariant*: demoting the last remaining superadmin is rejected regardless
/// of who calls. The superadmin count is read immediately before the write,
/// so a concurrent-demotion race window exists and is accepted in this
/// single-process deployment.
#[utoipa::path(
    put,
    path = "/users/{id}",
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated", body = User),
        (status = 400, description = "Invalid role or last-superadmin demotion"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_user(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<User>, ApiError> {
    auth.require_role(Role::Superadmin)?;

    let target = state
        .repo
        .get_user(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let role = match payload.role.as_deref() {
        Some(raw) => Some(
            Role::from_str(raw)
                .map_err(|_| ApiError::Validation("Invalid user type".to_string()))?,
        ),
        None => None,
    };

    // Last-superadmin protection on the demotion path.
    if target.role == Role::Superadmin
        && role == Some(Role::Admin)
        && state.repo.count_superadmins().await? <= 1
    {
        return Err(ApiError::Conflict(
            "Cannot demote the last superadmin".to_string(),
        ));
    }

    let email = match payload.email.as_deref().map(str::trim) {
        Some("") => {
            return Err(ApiError::Validation("Email must not be empty".to_string()));
        }
        other => other.map(str::to_string),
    };

    let password_hash = match payload.password.as_deref() {
        Some("") => {
            return Err(ApiError::Validation(
                "Password must not be empty".to_string(),
            ));
        }
        Some(password) => Some(auth::hash_password(password)?),
        None => None,
    };

    let changes = UserChanges {
        email,
        password_hash,
        role,
    };

    state
        .repo
        .update_user(id, changes)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
}

/// delete_user
///
/// [Superadmin Route] Hard delete of an account.
///
/// *Invariants*: a caller may never delete its own token subject, and the
/// last remaining superadmin may never be deleted. Both surface as conflicts
/// with the count verifiably unchanged afterward.
#[utoipa::path(
    delete,
    path = "/users/{id}",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 400, description = "Self-delete or last superadmin"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_user(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    auth.require_role(Role::Superadmin)?;

    // Self-deletion guard, independent of any role counting.
    if auth.id == id {
        return Err(ApiError::Conflict(
            "You cannot delete your own account".to_string(),
        ));
    }

    let target = state
        .repo
        .get_user(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    if target.role == Role::Superadmin && state.repo.count_superadmins().await? <= 1 {
        return Err(ApiError::Conflict(
            "Cannot delete the last superadmin".to_string(),
        ));
    }

    if !state.repo.delete_user(id).await? {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    Ok(Json(MessageResponse::new("User deleted")))
}
