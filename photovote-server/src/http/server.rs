//! Axum server setup
//!
//! Server skeleton with:
//! - Open CORS (`Access-Control-Allow-Origin: *` on every response)
//! - Tracing and timeout middleware
//! - Uploaded media served under `/media`
//! - Graceful shutdown on SIGTERM/Ctrl+C

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::http::header::ACCESS_CONTROL_ALLOW_ORIGIN;
use axum::http::HeaderValue;
use axum::Router;
use chrono_tz::Tz;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::routes;
use crate::db::repos::PgVotingStore;
use crate::storage::{BlobStore, LocalBlobStore};
use crate::voting::VotingStore;

/// Path prefix uploaded images are served from
pub const MEDIA_PREFIX: &str = "/media";

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (default: 127.0.0.1:3030)
    pub bind_addr: SocketAddr,

    /// Per-request deadline
    pub request_timeout: Duration,

    /// Directory uploaded images are written to and served from
    pub upload_dir: PathBuf,

    /// Externally visible base URL, used to build image URLs
    pub public_url: String,

    /// Timezone deciding what "today" means for maintenance jobs
    pub timezone: Tz,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3030)),
            request_timeout: Duration::from_secs(30),
            upload_dir: PathBuf::from("uploads"),
            public_url: "http://127.0.0.1:3030".to_string(),
            timezone: chrono_tz::Asia::Barnaul,
        }
    }
}

impl ServerConfig {
    /// Base URL under which stored images resolve
    pub fn media_url(&self) -> String {
        format!("{}{}", self.public_url.trim_end_matches('/'), MEDIA_PREFIX)
    }
}

/// Shared application state
pub struct AppState {
    pub pool: PgPool,
    pub voting: Arc<dyn VotingStore>,
    pub blobs: Arc<dyn BlobStore>,
    pub timezone: Tz,
}

impl AppState {
    /// Postgres-backed voting plus the local blob store from `config`.
    pub fn new(pool: PgPool, config: &ServerConfig) -> Self {
        Self {
            voting: Arc::new(PgVotingStore::new(pool.clone())),
            blobs: Arc::new(LocalBlobStore::new(config.upload_dir.clone(), config.media_url())),
            timezone: config.timezone,
            pool,
        }
    }
}

/// Build the application router with all routes and middleware
pub fn build_router(state: Arc<AppState>, config: &ServerConfig) -> Router {
    let routes = Router::new()
        .merge(routes::health::router())
        .merge(routes::voting::router())
        .merge(routes::photos::router())
        .merge(routes::images::router())
        .merge(routes::upload::router())
        .merge(routes::stats::router())
        .merge(routes::maintenance::router())
        .nest_service(MEDIA_PREFIX, ServeDir::new(&config.upload_dir))
        .with_state(state);

    with_middleware(routes, config.request_timeout)
}

/// Tracing, then the CORS header, then the deadline.
///
/// The header layer sits outside the timeout so a 408 carries it too.
fn with_middleware(router: Router, request_timeout: Duration) -> Router {
    router.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(SetResponseHeaderLayer::if_not_present(
                ACCESS_CONTROL_ALLOW_ORIGIN,
                HeaderValue::from_static("*"),
            ))
            .layer(TimeoutLayer::new(request_timeout)),
    )
}

/// Run the HTTP server.
///
/// # Example
///
/// ```ignore
/// let pool = create_pool(&database_url).await?;
/// let config = ServerConfig::default();
/// run_server(pool, config).await?;
/// ```
pub async fn run_server(pool: PgPool, config: ServerConfig) -> Result<(), ServerError> {
    tokio::fs::create_dir_all(&config.upload_dir).await?;
    tracing::info!(
        upload_dir = %config.upload_dir.display(),
        media_url = %config.media_url(),
        timezone = %config.timezone,
        "Media storage ready"
    );

    let state = Arc::new(AppState::new(pool, &config));
    let app = build_router(state, &config);

    // Bind listener
    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    // Run with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
