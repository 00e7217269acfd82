//! Single-asset detail page scraper (CoinMarketCap currency page)
//!
//! Each fact lands in its own typed field; anything not found is "N/A".
//! A page with no recognizable fact at all (challenge or error page) is
//! rejected so the stored record keeps its last good values.

use crate::config::AssetDetailConfig;
use crate::error::{AppError, Result};
use crate::sources::format::truncate_chars;
use crate::sources::types::AssetFacts;
use crate::sources::{send_checked, Source};
use async_trait::async_trait;
use reqwest::header::USER_AGENT;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};

pub const MAX_ABOUT_CHARS: usize = 250;
const NOT_AVAILABLE: &str = "N/A";

pub struct AssetDetailClient {
    client: Client,
    page_url: String,
    slug: String,
    name: String,
    user_agent: String,
}

impl AssetDetailClient {
    pub fn new(client: Client, config: &AssetDetailConfig, user_agent: &str) -> Self {
        Self {
            client,
            page_url: config.page_url.clone(),
            slug: config.slug.clone(),
            name: config.name.clone(),
            user_agent: user_agent.to_string(),
        }
    }
}

#[async_trait]
impl Source for AssetDetailClient {
    type Record = AssetFacts;

    fn id(&self) -> &'static str {
        "asset_detail"
    }

    async fn fetch(&self) -> Result<Vec<AssetFacts>> {
        let request = self
            .client
            .get(&self.page_url)
            .header(USER_AGENT, &self.user_agent);

        let response = send_checked(request, self.id()).await?;
        let body = response.text().await?;

        Ok(vec![parse_asset_page(&body, &self.slug, &self.name)?])
    }
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| AppError::Internal(format!("Invalid selector '{}': {}", css, e)))
}

fn element_text(element: &ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Text of the first `div` after the `div` labelled `label`, in document order
fn labelled_value(divs: &[ElementRef<'_>], label: &str) -> Option<String> {
    let pos = divs.iter().position(|div| element_text(div) == label)?;
    divs.get(pos + 1)
        .map(element_text)
        .filter(|text| !text.is_empty())
}

pub fn parse_asset_page(html: &str, slug: &str, name: &str) -> Result<AssetFacts> {
    let document = Html::parse_document(html);
    let divs: Vec<ElementRef<'_>> = document.select(&selector("div")?).collect();

    let price = document
        .select(&selector("div.priceValue")?)
        .next()
        .map(|el| element_text(&el))
        .filter(|text| !text.is_empty());

    let about = document
        .select(&selector("div.sc-16r8icm-0")?)
        .next()
        .map(|el| element_text(&el))
        .filter(|text| !text.is_empty())
        .map(|text| truncate_chars(&text, MAX_ABOUT_CHARS));

    let market_cap = labelled_value(&divs, "Market cap");
    let volume_24h = labelled_value(&divs, "Volume (24h)");
    let circulating_supply = labelled_value(&divs, "Circulating supply");

    if [&price, &market_cap, &volume_24h, &circulating_supply, &about]
        .iter()
        .all(|fact| fact.is_none())
    {
        return Err(AppError::Payload(format!("no asset facts found on the '{}' page", slug)));
    }

    let or_na = |value: Option<String>| value.unwrap_or_else(|| NOT_AVAILABLE.to_string());

    Ok(AssetFacts {
        slug: slug.to_string(),
        name: name.to_string(),
        price: or_na(price),
        market_cap: or_na(market_cap),
        volume_24h: or_na(volume_24h),
        circulating_supply: or_na(circulating_supply),
        about: or_na(about),
    })
}
