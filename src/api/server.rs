//! Workbook editor HTTP server
//!
//! Axum router serving the grid page and one endpoint per editor action.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use super::handlers;
use crate::editor::{SessionStore, DEFAULT_IDLE_TIMEOUT};

/// Server configuration
#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    /// Request body limit for uploads
    pub max_upload_bytes: usize,
    /// Sessions untouched for this long are discarded
    pub session_idle_timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            max_upload_bytes: 64 * 1024 * 1024,
            session_idle_timeout: DEFAULT_IDLE_TIMEOUT,
        }
    }
}

impl ApiConfig {
    /// Megabytes to a body limit in bytes, saturating instead of overflowing
    pub fn upload_limit_bytes(megabytes: u32) -> usize {
        usize::try_from(megabytes)
            .unwrap_or(usize::MAX)
            .saturating_mul(1024 * 1024)
    }
}

/// Shared application state
#[derive(Debug, Default)]
pub struct AppState {
    pub version: String,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new() -> Self {
        Self::with_config(&ApiConfig::default())
    }

    pub fn with_config(config: &ApiConfig) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            sessions: SessionStore::with_idle_timeout(config.session_idle_timeout),
        }
    }
}

/// Build the router. Split from [`run_api_server`] so tests can drive it directly.
pub fn build_router(state: Arc<AppState>, config: &ApiConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Page and info endpoints
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .route("/version", get(handlers::version))
        .route("/api/v1", get(handlers::api_info))
        // Session lifecycle
        .route("/api/v1/sessions", post(handlers::create_session))
        .route("/api/v1/sessions/:id", delete(handlers::delete_session))
        // Editor actions
        .route("/api/v1/sessions/:id/upload", post(handlers::upload))
        .route("/api/v1/sessions/:id/load", post(handlers::load))
        .route("/api/v1/sessions/:id/grid", get(handlers::grid))
        .route("/api/v1/sessions/:id/edit", post(handlers::edit))
        .route("/api/v1/sessions/:id/download", get(handlers::download))
        .with_state(state)
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Install the tracing subscriber (no-op if one is already set)
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "workbook_editor=info,tower_http=info".into()),
        )
        .try_init();
}

/// Run the server until SIGINT/SIGTERM
pub async fn run_api_server(config: ApiConfig) -> anyhow::Result<()> {
    init_tracing();

    let state = Arc::new(AppState::with_config(&config));
    spawn_session_reaper(Arc::clone(&state));
    let app = build_router(state, &config);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Workbook editor starting on http://{}", addr);
    info!("   Sessions: /api/v1/sessions/:id/{{upload,load,grid,edit,download}}");
    info!("   Health: /health, Version: /version");
    info!("   Idle sessions expire after {}s", config.session_idle_timeout.as_secs());

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Workbook editor shutdown complete");
    Ok(())
}

/// Periodically drop idle sessions so abandoned uploads are freed
fn spawn_session_reaper(state: Arc<AppState>) {
    let period = (state.sessions.idle_timeout() / 4).max(Duration::from_secs(1));
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            state.sessions.evict_idle().await;
        }
    });
}

/// Graceful shutdown signal handler
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
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, stopping server...");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ApiConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.max_upload_bytes, 64 * 1024 * 1024);
        assert_eq!(config.session_idle_timeout, DEFAULT_IDLE_TIMEOUT);
    }

    #[test]
    fn test_upload_limit_bytes() {
        assert_eq!(ApiConfig::upload_limit_bytes(64), 64 * 1024 * 1024);
        assert_eq!(ApiConfig::upload_limit_bytes(1), 1024 * 1024);
        // Never wraps around on narrow targets
        assert!(ApiConfig::upload_limit_bytes(u32::MAX) >= 1024 * 1024);
    }

    #[test]
    fn test_config_address_format() {
        let config = ApiConfig {
            host: "192.168.1.100".to_string(),
            port: 9090,
            ..ApiConfig::default()
        };
        let addr: SocketAddr = format!("{}:{}", config.host, config.port)
            .parse()
            .unwrap();
        assert_eq!(addr.port(), 9090);
    }

    #[tokio::test]
    async fn test_app_state_starts_without_sessions() {
        let state = AppState::new();
        assert_eq!(state.version, env!("CARGO_PKG_VERSION"));
        assert!(state.sessions.is_empty().await);
    }
}
