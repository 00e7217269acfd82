//! SQLite database migrations

use crate::error::Result;
use rusqlite::Connection;

/// Run all database migrations
pub fn run_migrations(conn: &Connection) -> Result<()> {
    // Create migrations table
    conn.execute(
        "CREATE TABLE IF NOT EXISTS migrations (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    run_migration(conn, "001_crypto_prices", CREATE_CRYPTO_PRICES_TABLE)?;
    run_migration(conn, "002_news", CREATE_NEWS_TABLE)?;
    run_migration(conn, "003_weather", CREATE_WEATHER_TABLE)?;
    run_migration(conn, "004_asset_details", CREATE_ASSET_DETAILS_TABLE)?;

    tracing::info!("Database migrations completed");
    Ok(())
}

fn run_migration(conn: &Connection, name: &str, sql: &str) -> Result<()> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM migrations WHERE name = ?)",
        [name],
        |row| row.get(0),
    )?;

    if !exists {
        tracing::info!("Running migration: {}", name);
        conn.execute_batch(sql)?;
        conn.execute("INSERT INTO migrations (name) VALUES (?)", [name])?;
    }

    Ok(())
}

const CREATE_CRYPTO_PRICES_TABLE: &str = r#"
CREATE TABLE crypto_prices (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    symbol TEXT NOT NULL UNIQUE,
    price TEXT NOT NULL,
    change_24h TEXT NOT NULL,
    market_cap TEXT NOT NULL,
    volume_24h TEXT NOT NULL,
    last_updated TEXT NOT NULL
);
"#;

const CREATE_NEWS_TABLE: &str = r#"
CREATE TABLE news (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    link TEXT NOT NULL UNIQUE,
    source TEXT NOT NULL,
    published TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_news_published ON news(published);
"#;

const CREATE_WEATHER_TABLE: &str = r#"
CREATE TABLE weather (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    city TEXT NOT NULL,
    temperature TEXT NOT NULL,
    description TEXT NOT NULL,
    humidity TEXT NOT NULL,
    wind_speed TEXT NOT NULL,
    condition_code TEXT NOT NULL,
    last_updated TEXT NOT NULL
);
"#;

const CREATE_ASSET_DETAILS_TABLE: &str = r#"
CREATE TABLE asset_details (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    slug TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    price TEXT NOT NULL,
    market_cap TEXT NOT NULL,
    volume_24h TEXT NOT NULL,
    circulating_supply TEXT NOT NULL,
    about TEXT NOT NULL,
    last_updated TEXT NOT NULL
);
"#;
