//! SQLite database models

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

/// Display format for every persisted timestamp
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

fn serialize_timestamp<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_timestamp(ts))
}

/// Latest known market snapshot for one asset, unique by symbol
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceRecord {
    pub id: i64,
    pub name: String,
    pub symbol: String,
    pub price: String,
    pub change_24h: String,
    pub market_cap: String,
    pub volume_24h: String,
    #[serde(serialize_with = "serialize_timestamp")]
    pub last_updated: DateTime<Utc>,
}

/// Discovered article, unique by link
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewsItem {
    pub id: i64,
    pub title: String,
    pub link: String,
    pub source: String,
    #[serde(serialize_with = "serialize_timestamp")]
    pub published: DateTime<Utc>,
}

/// Current weather; the table holds at most one row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherSnapshot {
    pub id: i64,
    pub city: String,
    pub temperature: String,
    pub description: String,
    pub humidity: String,
    pub wind_speed: String,
    pub condition_code: String,
    #[serde(serialize_with = "serialize_timestamp")]
    pub last_updated: DateTime<Utc>,
}

/// Single-asset detail page facts, unique by slug
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetDetail {
    pub id: i64,
    pub slug: String,
    pub name: String,
    pub price: String,
    pub market_cap: String,
    pub volume_24h: String,
    pub circulating_supply: String,
    pub about: String,
    #[serde(serialize_with = "serialize_timestamp")]
    pub last_updated: DateTime<Utc>,
}

/// Row counts per table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TableCounts {
    pub prices: i64,
    pub news: i64,
    pub weather: i64,
    pub asset_details: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_price_projection_formats_timestamp() {
        let record = PriceRecord {
            id: 1,
            name: "Bitcoin".to_string(),
            symbol: "BTC".to_string(),
            price: "$1,234.50".to_string(),
            change_24h: "-3.10%".to_string(),
            market_cap: "$1,000".to_string(),
            volume_24h: "$500".to_string(),
            last_updated: Utc.with_ymd_and_hms(2025, 3, 7, 9, 5, 1).unwrap(),
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["last_updated"], "2025-03-07 09:05:01");
        assert_eq!(json["symbol"], "BTC");
        assert_eq!(json["change_24h"], "-3.10%");
    }
}
