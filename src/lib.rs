use axum::{
    Router,
    extract::{FromRef, Request},
    http::HeaderName,
    middleware::{self, Next},
    response::Response,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Core application services and components.
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod uploader;

// Routing segregation (Public, Admin, Superadmin).
pub mod routes;
use auth::AuthUser;
use routes::{admin, public, superadmin};

// --- Public Re-exports ---

// Makes core state types easily accessible to the entry point (main.rs) and tests.
pub use config::AppConfig;
pub use error::ApiError;
pub use repository::{PostgresRepository, RepositoryState};
pub use uploader::{CloudinaryUploader, MockUploader, UploaderState};

/// ApiDoc
///
/// Auto-generates the OpenAPI documentation (Swagger JSON) from every handler
/// decorated with `#[utoipa::path]` and every `ToSchema` model. Served at
/// `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::login, handlers::auth::register, handlers::auth::register_superadmin,
        handlers::menu::get_menu, handlers::menu::get_admin_menu, handlers::menu::create_menu_item,
        handlers::menu::update_menu_item, handlers::menu::delete_menu_item,
        handlers::menu::toggle_visibility,
        handlers::categories::get_categories, handlers::categories::create_category,
        handlers::categories::delete_category,
        handlers::working_hours::get_working_hours, handlers::working_hours::update_working_hours,
        handlers::social::get_social_links, handlers::social::get_admin_social_links,
        handlers::social::update_social_link, handlers::social::delete_social_link,
        handlers::users::get_users, handlers::users::create_user,
        handlers::users::update_user, handlers::users::delete_user,
    ),
    components(
        schemas(
            models::Role, models::Platform, models::Lang,
            models::User, models::MenuItem, models::PublicMenuItem, models::Category,
            models::WorkingHours, models::SocialLink,
            models::LoginRequest, models::RegisterRequest, models::RegisterSuperadminRequest,
            models::AuthResponse, models::UpdateUserRequest,
            models::CreateCategoryRequest, models::UpdateWorkingHoursRequest,
            models::UpdateSocialLinkRequest, models::MessageResponse,
        )
    ),
    tags(
        (name = "menu-portal", description = "Bilingual restaurant menu management API")
    )
)]
struct ApiDoc;

/// AppState
///
/// The single, thread-safe, immutable container holding all application
/// services and configuration, shared across all incoming requests.
#[derive(Clone)]
pub struct AppState {
    /// Repository Layer: abstracts Postgres access behind a trait object.
    pub repo: RepositoryState,
    /// Uploader Layer: abstracts the external media host.
    pub uploader: UploaderState,
    /// Loaded, immutable environment configuration.
    pub config: AppConfig,
}

// --- Axum FromRef Extractor Implementations ---

// Allow handlers and extractors to pull individual components from the state.

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for UploaderState {
    fn from_ref(app_state: &AppState) -> UploaderState {
        app_state.uploader.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// auth_middleware
///
/// Enforces authentication for the protected route groups.
///
/// *Mechanism*: it extracts `AuthUser` from the request. Since `AuthUser`
/// implements `FromRequestParts`, a missing, expired, or forged token rejects
/// the request with 401 before the handler runs. The role floor (admin vs
/// superadmin) is checked inside each handler.
async fn auth_middleware(_auth_user: AuthUser, request: Request, next: Next) -> Response {
    next.run(request).await
}

/// create_router
///
/// Assembles the routing structure, applies global and scoped middleware,
/// and registers the application state.
pub fn create_router(state: AppState) -> Router {
    // CORS: the dashboard frontend and the public site are served from
    // separate origins, so all origins are accepted.
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    let base_router = Router::new()
        // Documentation: serve the auto-generated Swagger UI.
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Public routes: no middleware applied.
        .merge(public::public_routes())
        // Admin content-management routes, behind the JWT layer.
        .merge(
            admin::admin_routes()
                .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware)),
        )
        // Superadmin user-management routes, behind the same JWT layer. The
        // stricter role floor lives in the handlers.
        .merge(
            superadmin::superadmin_routes()
                .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware)),
        )
        .with_state(state);

    // Observability and correlation layers, outermost.
    base_router
        .layer(
            ServiceBuilder::new()
                // Unique UUID per incoming request.
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                // Wrap the request/response lifecycle in a tracing span
                // correlated by the request ID.
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                // Return the x-request-id header to the client.
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Customizes `TraceLayer` span creation: pulls the `x-request-id` header
/// into the structured logging metadata alongside the method and URI so
/// every log line for one request is correlated.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
