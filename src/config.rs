//! Process configuration
//!
//! Layered with the `config` crate: serde defaults, then an optional TOML file,
//! then `TRACKER__SECTION__KEY` environment variables.

use crate::error::{AppError, Result};
use chrono_tz::Tz;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Default config file, looked up without extension
pub const DEFAULT_CONFIG_FILE: &str = "config/crypto-tracker";

/// Environment variable that overrides the config file location
pub const CONFIG_PATH_ENV: &str = "TRACKER_CONFIG";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub scheduler: SchedulerConfig,
    pub http: HttpConfig,
    pub market: MarketConfig,
    pub news: NewsConfig,
    pub weather: WeatherConfig,
    pub asset_detail: AssetDetailConfig,
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("crypto_data.db"),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub interval_secs: u64,
    pub fetch_on_startup: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            interval_secs: 300,
            fetch_on_startup: true,
        }
    }
}

impl SchedulerConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

/// Outbound HTTP client settings shared by every source
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    /// Sent to upstreams that reject default client identifiers
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string(),
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MarketConfig {
    pub base_url: String,
    pub per_page: u32,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.coingecko.com/api/v3".to_string(),
            per_page: 20,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NewsConfig {
    pub page_url: String,
    /// Prefixed to relative article links
    pub origin: String,
    pub source_label: String,
    pub max_articles: usize,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            page_url: "https://www.coindesk.com/".to_string(),
            origin: "https://www.coindesk.com".to_string(),
            source_label: "CoinDesk".to_string(),
            max_articles: 15,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    pub base_url: String,
    pub city: String,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: "https://wttr.in".to_string(),
            city: "London".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AssetDetailConfig {
    pub enabled: bool,
    pub page_url: String,
    pub slug: String,
    pub name: String,
}

impl Default for AssetDetailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            page_url: "https://coinmarketcap.com/currencies/ethereum/".to_string(),
            slug: "ethereum".to_string(),
            name: "Ethereum".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub price_limit: u32,
    pub news_limit: u32,
    pub timezone: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            price_limit: 20,
            news_limit: 10,
            timezone: "Asia/Kolkata".to_string(),
        }
    }
}

impl DashboardConfig {
    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| AppError::Config(format!("Invalid timezone '{}': {}", self.timezone, e)))
    }
}

impl AppConfig {
    /// Load from `TRACKER_CONFIG` (or the default file) plus environment overrides
    pub fn load() -> Result<Self> {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Self::load_from(&path)
    }

    pub fn load_from(path: &str) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("TRACKER")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: AppConfig = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would only fail later at runtime
    pub fn validate(&self) -> Result<()> {
        for (key, value) in [
            ("market.base_url", &self.market.base_url),
            ("news.page_url", &self.news.page_url),
            ("news.origin", &self.news.origin),
            ("weather.base_url", &self.weather.base_url),
            ("asset_detail.page_url", &self.asset_detail.page_url),
        ] {
            Url::parse(value)
                .map_err(|e| AppError::Config(format!("{} is not a valid URL ({}): {}", key, value, e)))?;
        }

        if self.scheduler.interval_secs == 0 {
            return Err(AppError::Config("scheduler.interval_secs must be positive".to_string()));
        }
        if self.http.timeout_secs == 0 {
            return Err(AppError::Config("http.timeout_secs must be positive".to_string()));
        }

        self.dashboard.tz()?;
        Ok(())
    }
}
