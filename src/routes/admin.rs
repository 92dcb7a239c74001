use crate::{AppState, handlers};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, get, patch, post, put},
};

/// Menu item photos arrive inline in the multipart body, so the default
/// 2 MB axum limit is raised for the routes that accept them.
const UPLOAD_BODY_LIMIT: usize = 5 * 1024 * 1024;

/// Admin Router Module
///
/// Defines the content-management surface: menu items, categories, working
/// hours, and social links. Every endpoint here requires at least the
/// 'admin' role.
///
/// Access Control:
/// This router is wrapped in the authentication middleware layer (JWT
/// validation via the `AuthUser` extractor). The role comparison itself is
/// performed inside each handler with `require_role`, so a superadmin passes
/// everywhere an admin does.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // GET /menu/admin-menu
        // Lists ALL items in both languages, hidden ones included.
        .route("/menu/admin-menu", get(handlers::menu::get_admin_menu))
        // POST /menu
        // Creates a menu item from a multipart form with an inline image.
        .route(
            "/menu",
            post(handlers::menu::create_menu_item).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        // PUT/DELETE /menu/{id}
        // Partial multipart update, or hard delete.
        .route(
            "/menu/{id}",
            put(handlers::menu::update_menu_item)
                .delete(handlers::menu::delete_menu_item)
                .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        // PATCH /menu/{id}/toggle-visibility
        // Flips the item's public-menu flag.
        .route(
            "/menu/{id}/toggle-visibility",
            patch(handlers::menu::toggle_visibility),
        )
        // POST /categories, DELETE /categories/{id}
        .route("/categories", post(handlers::categories::create_category))
        .route(
            "/categories/{id}",
            delete(handlers::categories::delete_category),
        )
        // PATCH /working-times
        // Replaces the single stored schedule.
        .route(
            "/working-times",
            patch(handlers::working_hours::update_working_hours),
        )
        // GET /social-media/admin
        // Full link list, inactive entries included.
        .route(
            "/social-media/admin",
            get(handlers::social::get_admin_social_links),
        )
        // PUT/DELETE /social-media/{platform}
        // Upsert or remove the link for one platform.
        .route(
            "/social-media/{platform}",
            put(handlers::social::update_social_link)
                .delete(handlers::social::delete_social_link),
        )
}
