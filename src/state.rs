//! Application state management

use crate::config::AppConfig;
use crate::db::sqlite::SqliteDb;
use crate::error::Result;
use crate::services::{FetchService, SnapshotService};
use crate::sources::SourceSet;
use std::sync::Arc;

/// Process-wide context, built once at startup and passed explicitly
pub struct AppState {
    pub config: AppConfig,

    /// SQLite database connection
    pub sqlite: Arc<SqliteDb>,

    /// Fetch orchestrator (owns the source clients)
    pub fetch: Arc<FetchService>,

    /// Read facade for presentation
    pub snapshots: SnapshotService,
}

impl AppState {
    /// Open the configured database and build the HTTP-backed sources
    pub fn new(config: AppConfig) -> Result<Self> {
        tracing::info!("Database: {:?}", config.database.path);

        let sqlite = SqliteDb::new(&config.database.path)?;
        let sources = SourceSet::from_config(&config)?;

        Self::with_parts(config, sqlite, sources)
    }

    /// Assemble from an already opened store and source set
    pub fn with_parts(config: AppConfig, sqlite: SqliteDb, sources: SourceSet) -> Result<Self> {
        let sqlite = Arc::new(sqlite);
        let fetch = Arc::new(FetchService::new(sqlite.clone(), sources));
        let snapshots = SnapshotService::new(sqlite.clone(), &config.dashboard)?;

        Ok(Self {
            config,
            sqlite,
            fetch,
            snapshots,
        })
    }
}
