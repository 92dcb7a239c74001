use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, put},
};

/// Superadmin Router Module
///
/// Staff account management, restricted to the 'superadmin' role.
///
/// Access Control:
/// The router sits behind the same authentication middleware as the admin
/// routes; the stricter role floor is enforced inside each handler with
/// `require_role(Role::Superadmin)`, which also guards the last-superadmin
/// and self-deletion invariants.
pub fn superadmin_routes() -> Router<AppState> {
    Router::new()
        // GET /users
        // Lists all staff accounts (password hashes never serialized).
        // POST /users
        // Creates an account without issuing a token, unlike /auth/register.
        .route(
            "/users",
            get(handlers::users::get_users).post(handlers::users::create_user),
        )
        // PUT /users/{id}
        // Partial update of email, password, or role. Demoting the last
        // superadmin is rejected.
        // DELETE /users/{id}
        // Removes an account. Self-deletion and deleting the last
        // superadmin are rejected.
        .route(
            "/users/{id}",
            put(handlers::users::update_user).delete(handlers::users::delete_user),
        )
}
