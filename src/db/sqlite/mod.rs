//! SQLite database module
//!
//! The upsert store: every persisted entity is owned here. Sources hand over
//! transient records, the apply methods decide how they land.

pub mod models;
mod connection;
mod migrations;
mod prices;
mod news;
mod weather;
mod asset_details;

use crate::error::Result;
use crate::sources::types::{AssetFacts, NewsArticle, PriceQuote, WeatherReport};
pub use models::{format_timestamp, AssetDetail, NewsItem, PriceRecord, TableCounts, WeatherSnapshot};
pub use prices::PriceApplyStats;
use parking_lot::Mutex;
use rusqlite::Connection;
use std::path::Path;

/// SQLite database wrapper
pub struct SqliteDb {
    conn: Mutex<Connection>,
}

impl SqliteDb {
    /// Create new SQLite database connection
    pub fn new(path: &Path) -> Result<Self> {
        let conn = connection::create_connection(path)?;

        // Enable WAL mode so dashboard reads do not block on a running cycle
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        Self::with_connection(conn)
    }

    /// Private in-memory database, used by tests and dry runs
    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        let db = Self {
            conn: Mutex::new(conn),
        };

        db.run_migrations()?;

        Ok(db)
    }

    /// Run database migrations
    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn.lock();
        migrations::run_migrations(&conn)
    }

    // ========== Apply Methods ==========

    /// Upsert prices keyed by symbol
    pub fn apply_prices(&self, quotes: &[PriceQuote]) -> Result<PriceApplyStats> {
        let mut conn = self.conn.lock();
        prices::apply_prices(&mut conn, quotes)
    }

    /// Insert articles whose link is not stored yet
    pub fn apply_news(&self, articles: &[NewsArticle]) -> Result<usize> {
        let mut conn = self.conn.lock();
        news::apply_news(&mut conn, articles)
    }

    /// Replace the weather snapshot
    pub fn apply_weather(&self, report: &WeatherReport) -> Result<()> {
        let mut conn = self.conn.lock();
        weather::apply_weather(&mut conn, report)
    }

    /// Upsert asset detail keyed by slug
    pub fn apply_asset_detail(&self, facts: &AssetFacts) -> Result<()> {
        let mut conn = self.conn.lock();
        asset_details::apply_asset_detail(&mut conn, facts)
    }

    // ========== Read Methods ==========

    pub fn latest_prices(&self, limit: u32) -> Result<Vec<PriceRecord>> {
        let conn = self.conn.lock();
        prices::latest_prices(&conn, limit)
    }

    pub fn latest_news(&self, limit: u32) -> Result<Vec<NewsItem>> {
        let conn = self.conn.lock();
        news::latest_news(&conn, limit)
    }

    pub fn current_weather(&self) -> Result<Option<WeatherSnapshot>> {
        let conn = self.conn.lock();
        weather::current_weather(&conn)
    }

    pub fn get_asset_detail(&self, slug: &str) -> Result<Option<AssetDetail>> {
        let conn = self.conn.lock();
        asset_details::get_asset_detail(&conn, slug)
    }

    /// Raw SQL against the connection, for tests that break the schema
    #[cfg(test)]
    pub(crate) fn execute_batch(&self, sql: &str) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute_batch(sql)?;
        Ok(())
    }

    /// Row counts for the status endpoint
    pub fn table_counts(&self) -> Result<TableCounts> {
        let conn = self.conn.lock();
        Ok(TableCounts {
            prices: prices::count_prices(&conn)?,
            news: news::count_news(&conn)?,
            weather: weather::count_weather(&conn)?,
            asset_details: asset_details::count_asset_details(&conn)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_file_database_persists_across_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tracker.db");

        {
            let db = SqliteDb::new(&path).unwrap();
            db.apply_weather(&WeatherReport {
                city: "London".to_string(),
                temperature: "9°C".to_string(),
                description: "Light rain".to_string(),
                humidity: "88%".to_string(),
                wind_speed: "20 km/h".to_string(),
                condition_code: "296".to_string(),
            })
            .unwrap();
        }

        let db = SqliteDb::new(&path).unwrap();
        let weather = db.current_weather().unwrap().unwrap();
        assert_eq!(weather.description, "Light rain");
    }

    #[test]
    fn test_empty_store_counts() {
        let db = SqliteDb::open_in_memory().unwrap();
        assert_eq!(db.table_counts().unwrap(), TableCounts::default());
        assert!(db.latest_prices(20).unwrap().is_empty());
        assert!(db.latest_news(10).unwrap().is_empty());
        assert!(db.current_weather().unwrap().is_none());
    }
}
