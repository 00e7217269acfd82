//! Single-asset detail rows, upserted by slug

use crate::db::sqlite::models::AssetDetail;
use crate::error::Result;
use crate::sources::types::AssetFacts;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

pub fn apply_asset_detail(conn: &mut Connection, facts: &AssetFacts) -> Result<()> {
    let tx = conn.transaction()?;

    tx.execute(
        "INSERT INTO asset_details (slug, name, price, market_cap, volume_24h, circulating_supply, about, last_updated)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
         ON CONFLICT(slug) DO UPDATE SET
            name = excluded.name,
            price = excluded.price,
            market_cap = excluded.market_cap,
            volume_24h = excluded.volume_24h,
            circulating_supply = excluded.circulating_supply,
            about = excluded.about,
            last_updated = excluded.last_updated",
        params![
            facts.slug,
            facts.name,
            facts.price,
            facts.market_cap,
            facts.volume_24h,
            facts.circulating_supply,
            facts.about,
            Utc::now(),
        ],
    )?;

    tx.commit()?;

    tracing::info!("Updated asset detail for {}", facts.slug);
    Ok(())
}

pub fn get_asset_detail(conn: &Connection, slug: &str) -> Result<Option<AssetDetail>> {
    let detail = conn
        .query_row(
            "SELECT id, slug, name, price, market_cap, volume_24h, circulating_supply, about, last_updated
             FROM asset_details WHERE slug = ?1",
            params![slug],
            |row| {
                Ok(AssetDetail {
                    id: row.get(0)?,
                    slug: row.get(1)?,
                    name: row.get(2)?,
                    price: row.get(3)?,
                    market_cap: row.get(4)?,
                    volume_24h: row.get(5)?,
                    circulating_supply: row.get(6)?,
                    about: row.get(7)?,
                    last_updated: row.get(8)?,
                })
            },
        )
        .optional()?;

    Ok(detail)
}

pub fn count_asset_details(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM asset_details", [], |row| row.get(0))?;
    Ok(count)
}
