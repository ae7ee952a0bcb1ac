//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors; request-level errors are rendered by
//! the auth crate through `kernel::error::AppError`.

mod config;

use auth::{
    AuthAppState, InMemoryUserRepository, ModeState, PgUserRepository, auth_router, ensure_admin,
    domain::UserRepository,
};
use axum::{
    http,
    http::{Method, header},
};
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,auth=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;

    tracing::info!(
        mode = %config.initial_mode,
        extraction_policy = %config.auth.extraction_policy,
        cookie_secure = config.auth.cookie_secure,
        token_ttl_secs = config.auth.token_ttl_secs(),
        "Auth configuration loaded"
    );

    match config.database_url.clone() {
        Some(database_url) => {
            let pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(&database_url)
                .await?;

            tracing::info!("Connected to database");

            // Run migrations
            sqlx::migrate!("../../../database/migrations")
                .run(&pool)
                .await?;

            tracing::info!("Migrations completed");

            serve(PgUserRepository::new(pool), config).await
        }
        None => {
            tracing::warn!("DATABASE_URL not set, accounts are kept in memory only");
            serve(InMemoryUserRepository::new(), config).await
        }
    }
}

async fn serve<R>(repo: R, config: ServerConfig) -> anyhow::Result<()>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    if let Some(admin) = &config.admin {
        ensure_admin(&repo, &config.auth, &admin.username, admin.password.clone()).await?;
    }

    let cors = cors_layer(&config.frontend_origins);
    let state = AuthAppState::new(repo, config.auth, ModeState::new(config.initial_mode));

    // Build router
    let app = auth_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    tracing::info!("Listening on {}", config.bind_addr);

    let listener = TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn cors_layer(frontend_origins: &[String]) -> CorsLayer {
    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true)
}
