//! HTTP server for the dashboard and read API

use crate::config::ServerConfig;
use crate::error::{AppError, Result};
use crate::server::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Build the router with every route
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // ================================================================
        // Health check
        // ================================================================
        .route("/health", get(handlers::health_check))

        // ================================================================
        // Dashboard
        // ================================================================
        .route("/", get(handlers::dashboard))
        .route("/refresh", get(handlers::refresh))

        // ================================================================
        // JSON API
        // ================================================================
        .route("/api/refresh", post(handlers::api_refresh))
        .route("/api/crypto", get(handlers::api_crypto))
        .route("/api/news", get(handlers::api_news))
        .route("/api/weather", get(handlers::api_weather))
        .route("/api/asset/:slug", get(handlers::api_asset))
        .route("/api/status", get(handlers::api_status))

        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// API server manager
pub struct ApiServer {
    state: Arc<AppState>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl ApiServer {
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            state,
            shutdown_tx: None,
            task: None,
        }
    }

    /// Bind and start serving in the background. Returns the bound address.
    pub async fn start(&mut self, config: &ServerConfig) -> Result<SocketAddr> {
        let addr: SocketAddr = format!("{}:{}", config.host, config.port)
            .parse()
            .map_err(|e| AppError::Config(format!("Invalid server address: {}", e)))?;

        let app = build_router(self.state.clone());

        let listener = tokio::net::TcpListener::bind(addr).await?;
        let bound = listener.local_addr()?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        self.shutdown_tx = Some(shutdown_tx);

        info!("Starting crypto tracker server on {}", bound);

        self.task = Some(tokio::spawn(async move {
            let server = axum::serve(listener, app).with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
                info!("API server shutting down");
            });

            if let Err(e) = server.await {
                error!("API server error: {}", e);
            }
        }));

        info!("");
        info!("=== Endpoints ===");
        info!("  GET  http://{}/", bound);
        info!("  GET  http://{}/refresh", bound);
        info!("  POST http://{}/api/refresh", bound);
        info!("  GET  http://{}/api/crypto", bound);
        info!("  GET  http://{}/api/news", bound);
        info!("  GET  http://{}/api/weather", bound);
        info!("  GET  http://{}/api/asset/{{slug}}", bound);
        info!("  GET  http://{}/api/status", bound);
        info!("  GET  http://{}/health", bound);

        Ok(bound)
    }

    /// Stop the server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            info!("API server stop signal sent");
        }
    }

    /// Stop and wait for in-flight requests to drain
    pub async fn shutdown(mut self) {
        self.stop();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                error!("API server task ended abnormally: {}", e);
            }
        }
    }

    /// Check if server is running
    pub fn is_running(&self) -> bool {
        self.shutdown_tx.is_some()
    }
}

impl Drop for ApiServer {
    fn drop(&mut self) {
        self.stop();
    }
}
