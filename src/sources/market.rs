//! Market-data client (CoinGecko `coins/markets` listing)

use crate::config::MarketConfig;
use crate::error::{AppError, Result};
use crate::sources::format::{format_percent, format_usd};
use crate::sources::types::PriceQuote;
use crate::sources::{send_checked, Source};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

/// One item of the listing; every numeric field may be absent or null
#[derive(Debug, Deserialize)]
struct CoinMarket {
    name: Option<String>,
    symbol: Option<String>,
    current_price: Option<f64>,
    price_change_percentage_24h: Option<f64>,
    market_cap: Option<f64>,
    total_volume: Option<f64>,
}

pub struct MarketClient {
    client: Client,
    base_url: String,
    per_page: u32,
}

impl MarketClient {
    pub fn new(client: Client, config: &MarketConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            per_page: config.per_page,
        }
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("vs_currency", "usd".to_string()),
            ("order", "market_cap_desc".to_string()),
            ("per_page", self.per_page.to_string()),
            ("page", "1".to_string()),
            ("sparkline", "false".to_string()),
        ]
    }
}

#[async_trait]
impl Source for MarketClient {
    type Record = PriceQuote;

    fn id(&self) -> &'static str {
        "market"
    }

    async fn fetch(&self) -> Result<Vec<PriceQuote>> {
        let request = self
            .client
            .get(format!("{}/coins/markets", self.base_url))
            .query(&self.query());

        let response = send_checked(request, self.id()).await?;
        let body: Value = response.json().await?;

        let items = match body {
            Value::Array(items) => items,
            other => {
                return Err(AppError::Payload(format!(
                    "expected a JSON array of coins, got {}",
                    json_kind(&other)
                )))
            }
        };

        Ok(map_listing(items))
    }
}

/// Map every item, skipping (and logging) the ones that fail
pub fn map_listing(items: Vec<Value>) -> Vec<PriceQuote> {
    let total = items.len();
    let quotes: Vec<PriceQuote> = items
        .into_iter()
        .enumerate()
        .filter_map(|(idx, item)| match map_coin(item) {
            Ok(quote) => Some(quote),
            Err(e) => {
                tracing::warn!(source = "market", "Skipping coin #{}: {}", idx, e);
                None
            }
        })
        .collect();

    if quotes.len() < total {
        tracing::warn!(source = "market", "Mapped {} of {} coins", quotes.len(), total);
    }

    quotes
}

/// Normalize one listing item into a display-ready quote
pub fn map_coin(item: Value) -> Result<PriceQuote> {
    let coin: CoinMarket = serde_json::from_value(item)?;

    let symbol = coin
        .symbol
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::Payload("coin has no symbol".to_string()))?;

    Ok(PriceQuote {
        name: coin.name.unwrap_or_else(|| "N/A".to_string()),
        symbol,
        price: format_usd(coin.current_price.unwrap_or(0.0), 2),
        change_24h: format_percent(coin.price_change_percentage_24h.unwrap_or(0.0)),
        market_cap: format_usd(coin.market_cap.unwrap_or(0.0), 0),
        volume_24h: format_usd(coin.total_volume.unwrap_or(0.0), 0),
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HttpConfig;
    use crate::sources::build_http_client;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_map_coin_formats_fields() {
        let quote = map_coin(json!({
            "name": "Bitcoin",
            "symbol": "btc",
            "current_price": 1234.5,
            "price_change_percentage_24h": -3.1,
            "market_cap": 1_300_000_000_000.0_f64,
            "total_volume": 45_678_901.7
        }))
        .unwrap();

        assert_eq!(quote.symbol, "BTC");
        assert_eq!(quote.name, "Bitcoin");
        assert_eq!(quote.price, "$1,234.50");
        assert_eq!(quote.change_24h, "-3.10%");
        assert_eq!(quote.market_cap, "$1,300,000,000,000");
        assert_eq!(quote.volume_24h, "$45,678,902");
    }

    #[test]
    fn test_missing_numbers_default_to_zero() {
        let quote = map_coin(json!({
            "name": "Quiet Coin",
            "symbol": "qc",
            "current_price": null,
            "market_cap": null
        }))
        .unwrap();

        assert_eq!(quote.price, "$0.00");
        assert_eq!(quote.change_24h, "0.00%");
        assert_eq!(quote.market_cap, "$0");
        assert_eq!(quote.volume_24h, "$0");
    }

    #[test]
    fn test_bad_item_is_skipped_not_fatal() {
        let quotes = map_listing(vec![
            json!({"name": "Bitcoin", "symbol": "btc", "current_price": 1.0}),
            json!({"name": "Broken", "symbol": "brk", "current_price": "not a number"}),
            json!({"name": "No Symbol", "current_price": 2.0}),
            json!({"name": "Ethereum", "symbol": "eth", "current_price": 2.0}),
        ]);

        let symbols: Vec<&str> = quotes.iter().map(|q| q.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["BTC", "ETH"]);
    }

    #[tokio::test]
    async fn test_fetch_sends_listing_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/coins/markets"))
            .and(query_param("vs_currency", "usd"))
            .and(query_param("order", "market_cap_desc"))
            .and(query_param("per_page", "20"))
            .and(query_param("page", "1"))
            .and(query_param("sparkline", "false"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"name": "Bitcoin", "symbol": "btc", "current_price": 50000.0}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let config = MarketConfig {
            base_url: server.uri(),
            per_page: 20,
        };
        let client = MarketClient::new(build_http_client(&HttpConfig::default()).unwrap(), &config);

        let quotes = client.fetch().await.unwrap();
        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].price, "$50,000.00");
    }

    #[tokio::test]
    async fn test_non_success_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let config = MarketConfig {
            base_url: server.uri(),
            per_page: 20,
        };
        let client = MarketClient::new(build_http_client(&HttpConfig::default()).unwrap(), &config);

        let err = client.fetch().await.unwrap_err();
        assert!(matches!(err, AppError::Status { status: 429, .. }));
        assert!(client.fetch_or_empty().await.is_empty());
    }

    #[tokio::test]
    async fn test_non_array_payload_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"error": "rate limited"})))
            .mount(&server)
            .await;

        let config = MarketConfig {
            base_url: server.uri(),
            per_page: 20,
        };
        let client = MarketClient::new(build_http_client(&HttpConfig::default()).unwrap(), &config);

        assert!(matches!(client.fetch().await, Err(AppError::Payload(_))));
    }
}
