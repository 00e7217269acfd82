//! Source clients
//!
//! One client per upstream. Each turns a raw response into normalized records
//! from `types`; failures are absorbed at this boundary by `fetch_or_empty`
//! so one broken upstream never stops its siblings.

pub mod types;
pub mod format;
pub mod market;
pub mod news;
pub mod weather;
pub mod asset_detail;

use crate::config::{AppConfig, HttpConfig};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use types::*;

/// Trait every upstream integration implements
#[async_trait]
pub trait Source: Send + Sync {
    type Record: Send + 'static;

    /// Short id used as the log marker, e.g. "market"
    fn id(&self) -> &'static str;

    /// Fetch and normalize one batch
    async fn fetch(&self) -> Result<Vec<Self::Record>>;

    /// Like `fetch`, but any error is logged and becomes an empty batch
    async fn fetch_or_empty(&self) -> Vec<Self::Record> {
        match self.fetch().await {
            Ok(records) => {
                tracing::info!(source = self.id(), "Fetched {} records", records.len());
                records
            }
            Err(e) => {
                tracing::error!(source = self.id(), error = %e, "Source fetch failed, zero records this cycle");
                Vec::new()
            }
        }
    }
}

pub type PriceSource = Box<dyn Source<Record = PriceQuote>>;
pub type NewsSource = Box<dyn Source<Record = NewsArticle>>;
pub type WeatherSource = Box<dyn Source<Record = WeatherReport>>;
pub type AssetDetailSource = Box<dyn Source<Record = AssetFacts>>;

/// The clients one fetch cycle runs, in order
pub struct SourceSet {
    pub market: PriceSource,
    pub news: NewsSource,
    pub weather: WeatherSource,
    pub asset_detail: Option<AssetDetailSource>,
}

impl SourceSet {
    /// Build the HTTP-backed clients from configuration
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let client = build_http_client(&config.http)?;

        let asset_detail: Option<AssetDetailSource> = if config.asset_detail.enabled {
            Some(Box::new(asset_detail::AssetDetailClient::new(
                client.clone(),
                &config.asset_detail,
                &config.http.user_agent,
            )))
        } else {
            None
        };

        Ok(Self {
            market: Box::new(market::MarketClient::new(client.clone(), &config.market)),
            news: Box::new(news::NewsClient::new(client.clone(), &config.news, &config.http.user_agent)),
            weather: Box::new(weather::WeatherClient::new(client, &config.weather)),
            asset_detail,
        })
    }
}

/// One client shared by every source; the timeout bounds each request
pub fn build_http_client(config: &HttpConfig) -> Result<Client> {
    let client = Client::builder().timeout(config.timeout()).build()?;
    Ok(client)
}

/// Send the request and turn a non-success status into `AppError::Status`
pub(crate) async fn send_checked(request: RequestBuilder, upstream: &str) -> Result<Response> {
    let response = request.send().await?;
    let status = response.status();

    if !status.is_success() {
        return Err(AppError::Status {
            upstream: upstream.to_string(),
            status: status.as_u16(),
        });
    }

    Ok(response)
}
