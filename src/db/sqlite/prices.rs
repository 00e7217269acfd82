//! Market price rows, upserted by symbol

use crate::db::sqlite::models::PriceRecord;
use crate::error::Result;
use crate::sources::types::PriceQuote;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};

/// Outcome of one price batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PriceApplyStats {
    pub inserted: usize,
    pub updated: usize,
}

impl PriceApplyStats {
    pub fn written(&self) -> usize {
        self.inserted + self.updated
    }
}

/// Update-if-present, insert-if-absent for every quote; commits once
pub fn apply_prices(conn: &mut Connection, quotes: &[PriceQuote]) -> Result<PriceApplyStats> {
    let tx = conn.transaction()?;
    let now = Utc::now();
    let mut stats = PriceApplyStats::default();

    {
        let mut find = tx.prepare("SELECT id FROM crypto_prices WHERE symbol = ?1")?;
        let mut update = tx.prepare(
            "UPDATE crypto_prices
             SET name = ?1, price = ?2, change_24h = ?3, market_cap = ?4, volume_24h = ?5, last_updated = ?6
             WHERE id = ?7",
        )?;
        let mut insert = tx.prepare(
            "INSERT INTO crypto_prices (name, symbol, price, change_24h, market_cap, volume_24h, last_updated)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )?;

        for quote in quotes {
            let existing: Option<i64> = find
                .query_row(params![quote.symbol], |row| row.get(0))
                .optional()?;

            match existing {
                Some(id) => {
                    update.execute(params![
                        quote.name,
                        quote.price,
                        quote.change_24h,
                        quote.market_cap,
                        quote.volume_24h,
                        now,
                        id,
                    ])?;
                    stats.updated += 1;
                }
                None => {
                    insert.execute(params![
                        quote.name,
                        quote.symbol,
                        quote.price,
                        quote.change_24h,
                        quote.market_cap,
                        quote.volume_24h,
                        now,
                    ])?;
                    stats.inserted += 1;
                }
            }
        }
    }

    tx.commit()?;

    tracing::info!(
        "Applied {} prices ({} new, {} updated)",
        stats.written(),
        stats.inserted,
        stats.updated
    );
    Ok(stats)
}

fn row_to_price(row: &Row<'_>) -> rusqlite::Result<PriceRecord> {
    Ok(PriceRecord {
        id: row.get(0)?,
        name: row.get(1)?,
        symbol: row.get(2)?,
        price: row.get(3)?,
        change_24h: row.get(4)?,
        market_cap: row.get(5)?,
        volume_24h: row.get(6)?,
        last_updated: row.get(7)?,
    })
}

/// First `limit` rows in insertion order
pub fn latest_prices(conn: &Connection, limit: u32) -> Result<Vec<PriceRecord>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, symbol, price, change_24h, market_cap, volume_24h, last_updated
         FROM crypto_prices ORDER BY id LIMIT ?1",
    )?;

    let prices = stmt
        .query_map(params![limit], row_to_price)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(prices)
}

pub fn count_prices(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM crypto_prices", [], |row| row.get(0))?;
    Ok(count)
}
