//! Crypto Tracker - Market, News and Weather Dashboard
//!
//! A small service that periodically fetches cryptocurrency prices,
//! crypto news headlines and the current weather, keeps them in SQLite
//! and serves them as an HTML dashboard and a JSON API.

pub mod config;
pub mod db;
pub mod error;
pub mod scheduler;
pub mod server;
pub mod services;
pub mod sources;
pub mod state;

use config::AppConfig;
use error::Result;
use scheduler::FetchScheduler;
use server::ApiServer;
use services::Trigger;
use state::AppState;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize and run the service until Ctrl-C
pub async fn run() -> Result<()> {
    // Initialize tracing/logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "crypto_tracker_lib=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Crypto Tracker...");

    let config = AppConfig::load()?;
    let state = Arc::new(AppState::new(config)?);

    tracing::info!("Application state initialized");

    // Populate the store before the first page load
    if state.config.scheduler.fetch_on_startup {
        let report = state.fetch.run_cycle(Trigger::Startup).await;
        tracing::info!("Startup cycle {} finished", report.cycle_id);
    }

    let scheduler = FetchScheduler::new(state.fetch.clone(), state.config.scheduler.interval()).start();

    let mut server = ApiServer::new(state.clone());
    if let Err(e) = server.start(&state.config.server).await {
        tracing::error!("Failed to start API server: {}", e);
        scheduler.shutdown().await;
        return Err(e);
    }

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown requested");

    server.shutdown().await;
    scheduler.shutdown().await;

    tracing::info!("Crypto Tracker stopped");
    Ok(())
}
