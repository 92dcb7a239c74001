use menu_portal::{
    AppState, create_router,
    config::{AppConfig, Env},
    repository::{PostgresRepository, RepositoryState},
    uploader::{CloudinaryUploader, UploaderState},
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// Asynchronous entry point: initializes configuration, logging, the
/// database pool (with migrations), the media uploader, and the HTTP server.
#[tokio::main]
async fn main() {
    // 1. Configuration & Environment Loading (Fail-Fast)
    dotenv::dotenv().ok();
    // AppConfig::load() panics on missing Production secrets at startup
    // rather than failing later mid-request.
    let config = AppConfig::load();

    // 2. Logging Filter Setup
    // RUST_LOG takes priority, with sensible local defaults otherwise.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "menu_portal=debug,tower_http=info,axum=trace".into());

    // 3. Logging format per environment: pretty for humans locally, JSON
    // for log aggregators in production.
    match config.env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Application starting in {:?} mode", config.env);

    // 4. Database Initialization (Postgres)
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.db_url)
        .await
        .expect("FATAL: Failed to connect to Postgres. Check DATABASE_URL.");

    // Apply pending schema migrations before serving traffic.
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("FATAL: Failed to run database migrations.");

    let repo = Arc::new(PostgresRepository::new(pool)) as RepositoryState;

    // 5. Media Uploader Initialization
    // Menu photos are pushed to the external media host; only the returned
    // URL is stored locally.
    let uploader = Arc::new(CloudinaryUploader::new(
        &config.media_upload_url,
        &config.media_upload_preset,
    )) as UploaderState;

    // 6. Unified State Assembly
    let port = config.port;
    let app_state = AppState {
        repo,
        uploader,
        config,
    };

    // 7. Router and Server Startup
    let app = create_router(app_state);

    let addr = format!("0.0.0.0:{port}");
    let listener = TcpListener::bind(&addr).await.unwrap();

    tracing::info!("HTTP server bound successfully.");
    tracing::info!("Listening on {addr}");
    tracing::info!("API Documentation (Swagger UI) available at: http://localhost:{port}/swagger-ui");

    axum::serve(listener, app).await.unwrap();
}
