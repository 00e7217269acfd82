//! Normalized records produced by sources
//!
//! These are transient: the store consumes them and owns the persisted rows.

use serde::{Deserialize, Serialize};

/// One asset from the market listing, already formatted for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub name: String,
    /// Uppercased ticker, the natural key
    pub symbol: String,
    pub price: String,
    pub change_24h: String,
    pub market_cap: String,
    pub volume_24h: String,
}

/// One article discovered on the news page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsArticle {
    pub title: String,
    /// Absolute URL, the natural key
    pub link: String,
    pub source: String,
}

/// Current conditions for the configured city
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub city: String,
    pub temperature: String,
    pub description: String,
    pub humidity: String,
    pub wind_speed: String,
    pub condition_code: String,
}

/// Facts scraped from a single-asset detail page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetFacts {
    pub slug: String,
    pub name: String,
    pub price: String,
    pub market_cap: String,
    pub volume_24h: String,
    pub circulating_supply: String,
    pub about: String,
}
