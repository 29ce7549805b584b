//! HTTP JSON API for the racetrack records service.
//!
//! Routes, access tiers and response shapes:
//!
//! | Route | Tier |
//! |---|---|
//! | `GET /api/drivers`, `/api/drivers/all`, `/api/drivers/:id` | Authenticated |
//! | `POST /api/drivers`, `PUT`/`DELETE /api/drivers/:id` | Admin |
//! | `GET /api/races`, `/api/races/all`, `/api/races/:id` | Authenticated |
//! | `POST /api/races`, `PUT`/`DELETE /api/races/:id` | Admin |
//! | `GET /api/results`, `/api/results/:race_id/:driver_id` | open |
//! | `POST /api/results`, `PUT`/`DELETE /api/results/:race_id/:driver_id` | Admin |
//! | `/api/auth/register`, `login`, `logout`, `me` | open |
//! | `GET /api/health` | open |
//!
//! Requests admitted to either tier get the session cookie back with a
//! fresh `Max-Age`, matching the server-side sliding expiry.
//!
//! Every error is `{"error": "<message>"}`; see [`ApiError`].

pub mod config;
pub mod error;
pub mod handlers;
pub mod session;
pub mod state;

pub use config::{ConfigError, ServerConfig};
pub use error::{ApiError, ApiResult};
pub use state::AppState;

use axum::{Router, middleware};
use axum::routing::{get, post};
use handlers::{auth, drivers, health, races, results};
use racetrack_auth::Argon2Hasher;
use racetrack_storage::{Database, DatabaseConfig, seed};
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

const SESSION_PURGE_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Build the application router around a prepared state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(health::health))
        .route("/api/drivers", get(drivers::list).post(drivers::create))
        .route("/api/drivers/all", get(drivers::all))
        .route(
            "/api/drivers/:id",
            get(drivers::show)
                .put(drivers::update)
                .delete(drivers::remove),
        )
        .route("/api/races", get(races::list).post(races::create))
        .route("/api/races/all", get(races::all))
        .route(
            "/api/races/:id",
            get(races::show).put(races::update).delete(races::remove),
        )
        .route("/api/results", get(results::list).post(results::create))
        .route(
            "/api/results/:race_id/:driver_id",
            get(results::show)
                .put(results::update)
                .delete(results::remove),
        )
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/me", get(auth::me))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            session::refresh_cookie,
        ))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Open the database and run the startup chores: optional sample data,
/// optional admin account, and a sweep of expired sessions.
pub async fn build_state(config: &ServerConfig) -> anyhow::Result<AppState> {
    let db_config =
        DatabaseConfig::new(&config.database_path).max_connections(config.db_max_connections);
    let db = Database::new(db_config).await?;

    if config.seed_sample_data && seed::seed_sample_data(db.pool()).await? {
        info!("Sample data loaded");
    }

    let state = AppState::new(db, config, Argon2Hasher::default());

    if let Some(admin) = &config.admin
        && state.auth.ensure_admin(&admin.username, &admin.password).await?
    {
        info!(username = %admin.username, "Admin account created");
    }

    let purged = state.auth.purge_expired_sessions().await?;
    if purged > 0 {
        info!(purged, "Expired sessions removed");
    }

    Ok(state)
}

/// Run the server until Ctrl-C.
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let state = build_state(&config).await?;
    let db = state.db.clone();

    let auth = state.auth.clone();
    let purge = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(SESSION_PURGE_INTERVAL);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            if let Err(e) = auth.purge_expired_sessions().await {
                warn!(error = %e, "Session purge failed");
            }
        }
    });

    let listener = TcpListener::bind(config.bind_addr).await?;
    info!(addr = %listener.local_addr()?, "Racetrack server listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    purge.abort();
    db.close().await;
    info!("Racetrack server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Could not listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}
