//! Fetch Service
//!
//! Runs one fetch cycle: market → prices, news → articles, weather → snapshot,
//! then the optional asset-detail step. Shared by the scheduler, the startup
//! path and the manual refresh endpoint.

use crate::db::sqlite::{format_timestamp, SqliteDb};
use crate::error::Result;
use crate::sources::SourceSet;
use chrono::Utc;
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn, Instrument};
use uuid::Uuid;

/// What started a cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    Startup,
    Timer,
    Manual,
}

/// Result of one step of a cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepOutcome {
    /// Records fetched from the source and rows written by the store
    Applied { fetched: usize, written: usize },
    /// The store rejected the batch
    Failed { error: String },
    /// Step not configured
    Skipped,
}

impl StepOutcome {
    fn from_apply(fetched: usize, result: Result<usize>, step: &str) -> Self {
        match result {
            Ok(written) => StepOutcome::Applied { fetched, written },
            Err(e) => {
                error!(step = step, error = %e, "Failed to persist batch");
                StepOutcome::Failed { error: e.to_string() }
            }
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, StepOutcome::Failed { .. })
    }
}

/// Summary of a completed cycle
#[derive(Debug, Clone, Serialize)]
pub struct CycleReport {
    pub cycle_id: String,
    pub trigger: Trigger,
    pub started_at: String,
    pub finished_at: String,
    pub prices: StepOutcome,
    pub news: StepOutcome,
    pub weather: StepOutcome,
    pub asset_detail: StepOutcome,
}

/// Fetch orchestrator
pub struct FetchService {
    db: Arc<SqliteDb>,
    sources: SourceSet,
    /// Held for a whole cycle so timer and manual runs never interleave
    cycle_lock: Mutex<()>,
    last_report: RwLock<Option<CycleReport>>,
    cycles_completed: AtomicU64,
}

impl FetchService {
    pub fn new(db: Arc<SqliteDb>, sources: SourceSet) -> Self {
        Self {
            db,
            sources,
            cycle_lock: Mutex::new(()),
            last_report: RwLock::new(None),
            cycles_completed: AtomicU64::new(0),
        }
    }

    /// Run one full cycle. Waits for a cycle already in progress to finish first.
    pub async fn run_cycle(&self, trigger: Trigger) -> CycleReport {
        let _guard = self.cycle_lock.lock().await;

        let cycle_id = Uuid::new_v4();
        let span = tracing::info_span!("fetch_cycle", %cycle_id, ?trigger);

        let report = self.run_steps(cycle_id, trigger).instrument(span).await;

        self.cycles_completed.fetch_add(1, Ordering::SeqCst);
        *self.last_report.write() = Some(report.clone());
        report
    }

    async fn run_steps(&self, cycle_id: Uuid, trigger: Trigger) -> CycleReport {
        let started_at = Utc::now();
        info!("Starting data fetch at {}", format_timestamp(&started_at));

        let prices = self.refresh_prices().await;
        let news = self.refresh_news().await;
        let weather = self.refresh_weather().await;
        let asset_detail = self.refresh_asset_detail().await;

        let finished_at = Utc::now();
        let failed_steps = [&prices, &news, &weather, &asset_detail]
            .iter()
            .filter(|outcome| outcome.is_failed())
            .count();

        if failed_steps > 0 {
            warn!(
                "Data fetch complete in {} ms, {} step(s) failed to persist",
                (finished_at - started_at).num_milliseconds(),
                failed_steps
            );
        } else {
            info!(
                "Data fetch complete in {} ms",
                (finished_at - started_at).num_milliseconds()
            );
        }

        CycleReport {
            cycle_id: cycle_id.to_string(),
            trigger,
            started_at: format_timestamp(&started_at),
            finished_at: format_timestamp(&finished_at),
            prices,
            news,
            weather,
            asset_detail,
        }
    }

    async fn refresh_prices(&self) -> StepOutcome {
        let quotes = self.sources.market.fetch_or_empty().await;
        let result = self.db.apply_prices(&quotes).map(|stats| stats.written());
        StepOutcome::from_apply(quotes.len(), result, "prices")
    }

    async fn refresh_news(&self) -> StepOutcome {
        let articles = self.sources.news.fetch_or_empty().await;
        let result = self.db.apply_news(&articles);
        StepOutcome::from_apply(articles.len(), result, "news")
    }

    async fn refresh_weather(&self) -> StepOutcome {
        let reports = self.sources.weather.fetch_or_empty().await;

        // An empty batch keeps the previous snapshot in place
        let result = match reports.first() {
            Some(report) => self.db.apply_weather(report).map(|_| 1),
            None => Ok(0),
        };
        StepOutcome::from_apply(reports.len(), result, "weather")
    }

    async fn refresh_asset_detail(&self) -> StepOutcome {
        let Some(source) = &self.sources.asset_detail else {
            return StepOutcome::Skipped;
        };

        let facts = source.fetch_or_empty().await;
        let result = match facts.first() {
            Some(facts) => self.db.apply_asset_detail(facts).map(|_| 1),
            None => Ok(0),
        };
        StepOutcome::from_apply(facts.len(), result, "asset_detail")
    }

    pub fn last_report(&self) -> Option<CycleReport> {
        self.last_report.read().clone()
    }

    pub fn cycles_completed(&self) -> u64 {
        self.cycles_completed.load(Ordering::SeqCst)
    }
}
