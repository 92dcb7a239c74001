use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Defines endpoints that are **unauthenticated** and accessible to any client.
/// These cover the customer-facing read surface of the restaurant (menu,
/// categories, opening hours, social links) and the authentication gateway.
///
/// Security Mandate:
/// The menu listing here must only ever return items with
/// `show_on_main_page = true`; that filter is applied unconditionally in the
/// Repository query, not left to the handler.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Unauthenticated liveness probe for monitoring and load balancers.
        .route("/health", get(|| async { "ok" }))
        // POST /auth/login
        // Exchanges email + password for a 3-hour session token.
        .route("/auth/login", post(handlers::auth::login))
        // POST /auth/register
        // Creates a staff account with a caller-chosen role.
        .route("/auth/register", post(handlers::auth::register))
        // POST /auth/register-superadmin
        // Bootstrap endpoint: creates a superadmin and issues a long-lived
        // (30-day) token for initial system setup.
        .route(
            "/auth/register-superadmin",
            post(handlers::auth::register_superadmin),
        )
        // GET /menu?lang=...&category=...
        // The customer menu, collapsed to a single display language and
        // restricted to visible items.
        .route("/menu", get(handlers::menu::get_menu))
        // GET /categories
        // All categories with both language names.
        .route("/categories", get(handlers::categories::get_categories))
        // GET /working-times
        // The restaurant's opening schedule, with a built-in default when
        // nothing has been configured yet.
        .route(
            "/working-times",
            get(handlers::working_hours::get_working_hours),
        )
        // GET /social-media
        // Active social links only.
        .route("/social-media", get(handlers::social::get_social_links))
}
