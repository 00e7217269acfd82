//! Snapshot Service
//!
//! Read facade over the store for the dashboard and JSON endpoints.
//! Readers may observe a batch that is still being applied.

use crate::config::DashboardConfig;
use crate::db::sqlite::{format_timestamp, AssetDetail, NewsItem, PriceRecord, SqliteDb, TableCounts, WeatherSnapshot};
use crate::error::Result;
use crate::services::fetch_service::{CycleReport, FetchService};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use std::sync::Arc;

/// Everything the dashboard page renders
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub prices: Vec<PriceRecord>,
    pub news: Vec<NewsItem>,
    pub weather: Option<WeatherSnapshot>,
    /// Formatted timestamp of the first price row, or "Never"
    pub last_update: String,
    pub current_time: String,
    pub current_date: String,
    pub timezone: String,
}

/// Store and scheduler health
#[derive(Debug, Clone, Serialize)]
pub struct StatusView {
    pub counts: TableCounts,
    pub cycles_completed: u64,
    pub last_cycle: Option<CycleReport>,
}

pub struct SnapshotService {
    db: Arc<SqliteDb>,
    price_limit: u32,
    news_limit: u32,
    timezone: Tz,
}

impl SnapshotService {
    pub fn new(db: Arc<SqliteDb>, config: &DashboardConfig) -> Result<Self> {
        Ok(Self {
            db,
            price_limit: config.price_limit,
            news_limit: config.news_limit,
            timezone: config.tz()?,
        })
    }

    /// Configured number of price rows, in insertion order
    pub fn latest_prices(&self) -> Result<Vec<PriceRecord>> {
        self.db.latest_prices(self.price_limit)
    }

    /// Configured number of articles, newest first
    pub fn latest_news(&self) -> Result<Vec<NewsItem>> {
        self.db.latest_news(self.news_limit)
    }

    /// `None` until the first successful weather fetch
    pub fn current_weather(&self) -> Result<Option<WeatherSnapshot>> {
        self.db.current_weather()
    }

    pub fn asset_detail(&self, slug: &str) -> Result<Option<AssetDetail>> {
        self.db.get_asset_detail(slug)
    }

    /// Timestamp of the first stored price row
    pub fn last_update(&self) -> Result<Option<DateTime<Utc>>> {
        Ok(self.db.latest_prices(1)?.into_iter().next().map(|p| p.last_updated))
    }

    pub fn dashboard(&self, now: DateTime<Utc>) -> Result<DashboardView> {
        let local = now.with_timezone(&self.timezone);

        Ok(DashboardView {
            prices: self.latest_prices()?,
            news: self.latest_news()?,
            weather: self.current_weather()?,
            last_update: self
                .last_update()?
                .map(|ts| format_timestamp(&ts))
                .unwrap_or_else(|| "Never".to_string()),
            current_time: local.format("%I:%M:%S %p").to_string(),
            current_date: local.format("%A, %B %d, %Y").to_string(),
            timezone: self.timezone.name().to_string(),
        })
    }

    pub fn status(&self, fetch: &FetchService) -> Result<StatusView> {
        Ok(StatusView {
            counts: self.db.table_counts()?,
            cycles_completed: fetch.cycles_completed(),
            last_cycle: fetch.last_report(),
        })
    }
}
