//! News client (CoinDesk front page scraper)
//!
//! The page has shipped two layouts: `a.card-title` anchors, and older
//! `h4.heading` blocks with the anchor nested inside. Candidates are located
//! first, then each layout goes through its own extractor.

use crate::config::NewsConfig;
use crate::error::{AppError, Result};
use crate::sources::format::truncate_chars;
use crate::sources::types::NewsArticle;
use crate::sources::{send_checked, Source};
use async_trait::async_trait;
use reqwest::header::USER_AGENT;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};

/// Titles shorter than this are navigation noise
pub const MIN_TITLE_CHARS: usize = 10;
pub const MAX_TITLE_CHARS: usize = 500;

const PRIMARY_SELECTOR: &str = "a.card-title";
const FALLBACK_SELECTOR: &str = "h4.heading";

pub struct NewsClient {
    client: Client,
    page_url: String,
    user_agent: String,
    rules: ExtractRules,
}

/// What the extractors need to build a record
#[derive(Debug, Clone)]
pub struct ExtractRules {
    pub origin: String,
    pub source_label: String,
    pub max_articles: usize,
}

impl From<&NewsConfig> for ExtractRules {
    fn from(config: &NewsConfig) -> Self {
        Self {
            origin: config.origin.trim_end_matches('/').to_string(),
            source_label: config.source_label.clone(),
            max_articles: config.max_articles,
        }
    }
}

impl NewsClient {
    pub fn new(client: Client, config: &NewsConfig, user_agent: &str) -> Self {
        Self {
            client,
            page_url: config.page_url.clone(),
            user_agent: user_agent.to_string(),
            rules: ExtractRules::from(config),
        }
    }
}

#[async_trait]
impl Source for NewsClient {
    type Record = NewsArticle;

    fn id(&self) -> &'static str {
        "news"
    }

    async fn fetch(&self) -> Result<Vec<NewsArticle>> {
        let request = self
            .client
            .get(&self.page_url)
            .header(USER_AGENT, &self.user_agent);

        let response = send_checked(request, self.id()).await?;
        let body = response.text().await?;

        parse_articles(&body, &self.rules)
    }
}

/// Candidate article elements, tagged by the layout that matched
enum Candidates<'a> {
    /// Primary layout: the element is the anchor
    Anchors(Vec<ElementRef<'a>>),
    /// Fallback layout: the anchor is nested inside the element
    Headings(Vec<ElementRef<'a>>),
}

/// Why a candidate did not become an article
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    MissingAnchor,
    MissingLink,
    EmptyTitle,
    ShortTitle(usize),
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| AppError::Internal(format!("Invalid selector '{}': {}", css, e)))
}

fn locate_candidates<'a>(document: &'a Html) -> Result<Candidates<'a>> {
    let anchors: Vec<ElementRef<'a>> = document.select(&selector(PRIMARY_SELECTOR)?).collect();
    if !anchors.is_empty() {
        return Ok(Candidates::Anchors(anchors));
    }

    let headings = document.select(&selector(FALLBACK_SELECTOR)?).collect();
    Ok(Candidates::Headings(headings))
}

/// Stripped text nodes joined without separators
fn element_text(element: &ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

fn extract_anchor(element: &ElementRef<'_>, rules: &ExtractRules) -> std::result::Result<NewsArticle, Rejection> {
    let title = element_text(element);
    build_article(title, element.value().attr("href"), rules)
}

fn extract_heading(
    element: &ElementRef<'_>,
    anchor: &Selector,
    rules: &ExtractRules,
) -> std::result::Result<NewsArticle, Rejection> {
    let link_tag = element.select(anchor).next().ok_or(Rejection::MissingAnchor)?;
    let title = element_text(element);
    build_article(title, link_tag.value().attr("href"), rules)
}

/// Apply the title rules and make the link absolute
pub fn build_article(
    title: String,
    href: Option<&str>,
    rules: &ExtractRules,
) -> std::result::Result<NewsArticle, Rejection> {
    let href = href.map(str::trim).filter(|h| !h.is_empty()).ok_or(Rejection::MissingLink)?;

    if title.is_empty() {
        return Err(Rejection::EmptyTitle);
    }
    let title_chars = title.chars().count();
    if title_chars < MIN_TITLE_CHARS {
        return Err(Rejection::ShortTitle(title_chars));
    }

    Ok(NewsArticle {
        title: truncate_chars(&title, MAX_TITLE_CHARS),
        link: normalize_link(href, &rules.origin),
        source: rules.source_label.clone(),
    })
}

/// Relative links get the site origin prepended; absolute ones are kept
pub fn normalize_link(href: &str, origin: &str) -> String {
    if href.starts_with("http") {
        href.to_string()
    } else if href.starts_with('/') {
        format!("{}{}", origin, href)
    } else {
        format!("{}/{}", origin, href)
    }
}

/// Parse the listing page into articles, looking at most at `max_articles` candidates
pub fn parse_articles(html: &str, rules: &ExtractRules) -> Result<Vec<NewsArticle>> {
    let document = Html::parse_document(html);
    let anchor = selector("a")?;

    let results: Vec<std::result::Result<NewsArticle, Rejection>> = match locate_candidates(&document)? {
        Candidates::Anchors(elements) => elements
            .iter()
            .take(rules.max_articles)
            .map(|el| extract_anchor(el, rules))
            .collect(),
        Candidates::Headings(elements) => elements
            .iter()
            .take(rules.max_articles)
            .map(|el| extract_heading(el, &anchor, rules))
            .collect(),
    };

    let mut articles = Vec::with_capacity(results.len());
    for result in results {
        match result {
            Ok(article) => articles.push(article),
            Err(reason) => tracing::debug!(source = "news", "Skipping candidate: {:?}", reason),
        }
    }

    if articles.is_empty() {
        tracing::warn!(source = "news", "No articles found on the page");
    }

    Ok(articles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HttpConfig;
    use crate::sources::build_http_client;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn rules() -> ExtractRules {
        ExtractRules {
            origin: "https://www.coindesk.com".to_string(),
            source_label: "CoinDesk".to_string(),
            max_articles: 15,
        }
    }

    #[test]
    fn test_primary_layout() {
        let html = r#"
            <html><body>
              <a class="card-title" href="/markets/2025/bitcoin-hits-record">Bitcoin hits a new record</a>
              <a class="card-title other" href="https://example.com/eth">  Ether <b>staking</b> grows  </a>
            </body></html>"#;

        let articles = parse_articles(html, &rules()).unwrap();
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title, "Bitcoin hits a new record");
        assert_eq!(articles[0].link, "https://www.coindesk.com/markets/2025/bitcoin-hits-record");
        assert_eq!(articles[0].source, "CoinDesk");
        assert_eq!(articles[1].title, "Etherstakinggrows");
        assert_eq!(articles[1].link, "https://example.com/eth");
    }

    #[test]
    fn test_fallback_layout_with_nested_anchor() {
        let html = r#"
            <html><body>
              <h4 class="heading"><a href="/policy/sec-approves-etf">SEC approves spot ETF</a></h4>
              <h4 class="heading">Heading without any link inside</h4>
              <h4 class="heading"><a href="/tech/layer-two">Layer two fees drop sharply</a></h4>
            </body></html>"#;

        let articles = parse_articles(html, &rules()).unwrap();
        let links: Vec<&str> = articles.iter().map(|a| a.link.as_str()).collect();
        assert_eq!(
            links,
            vec![
                "https://www.coindesk.com/policy/sec-approves-etf",
                "https://www.coindesk.com/tech/layer-two",
            ]
        );
    }

    #[test]
    fn test_primary_layout_wins_over_fallback() {
        let html = r#"
            <a class="card-title" href="/a">Primary layout headline</a>
            <h4 class="heading"><a href="/b">Fallback layout headline</a></h4>"#;

        let articles = parse_articles(html, &rules()).unwrap();
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].link, "https://www.coindesk.com/a");
    }

    #[test]
    fn test_title_length_boundary() {
        assert_eq!(
            build_article("123456789".to_string(), Some("/x"), &rules()),
            Err(Rejection::ShortTitle(9))
        );
        let kept = build_article("1234567890".to_string(), Some("/x"), &rules()).unwrap();
        assert_eq!(kept.title, "1234567890");
    }

    #[test]
    fn test_empty_link_or_title_rejected() {
        assert_eq!(
            build_article("A long enough title".to_string(), None, &rules()),
            Err(Rejection::MissingLink)
        );
        assert_eq!(
            build_article("A long enough title".to_string(), Some("  "), &rules()),
            Err(Rejection::MissingLink)
        );
        assert_eq!(build_article(String::new(), Some("/x"), &rules()), Err(Rejection::EmptyTitle));
    }

    #[test]
    fn test_title_truncated() {
        let long = "x".repeat(MAX_TITLE_CHARS + 20);
        let article = build_article(long, Some("/long"), &rules()).unwrap();
        assert_eq!(article.title.chars().count(), MAX_TITLE_CHARS);
    }

    #[test]
    fn test_normalize_link() {
        assert_eq!(
            normalize_link("/article/foo", "https://www.coindesk.com"),
            "https://www.coindesk.com/article/foo"
        );
        assert_eq!(
            normalize_link("https://other.site/article/foo", "https://www.coindesk.com"),
            "https://other.site/article/foo"
        );
    }

    #[test]
    fn test_only_first_candidates_considered() {
        let html: String = (0..20)
            .map(|i| format!(r#"<a class="card-title" href="/n/{i}">Headline number {i:02}</a>"#))
            .collect();

        let articles = parse_articles(&html, &rules()).unwrap();
        assert_eq!(articles.len(), 15);
        assert_eq!(articles[14].link, "https://www.coindesk.com/n/14");
    }

    #[test]
    fn test_no_candidates_is_empty_not_error() {
        let articles = parse_articles("<html><body><p>maintenance</p></body></html>", &rules()).unwrap();
        assert!(articles.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_sends_browser_user_agent() {
        let server = MockServer::start().await;
        let http = HttpConfig::default();

        Mock::given(method("GET"))
            .and(path("/"))
            .and(header("user-agent", http.user_agent.as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<a class="card-title" href="/x">A perfectly fine headline</a>"#,
            ))
            .expect(1)
            .mount(&server)
            .await;

        let config = NewsConfig {
            page_url: format!("{}/", server.uri()),
            origin: server.uri(),
            ..NewsConfig::default()
        };
        let client = NewsClient::new(build_http_client(&http).unwrap(), &config, &http.user_agent);

        let articles = client.fetch().await.unwrap();
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].link, format!("{}/x", server.uri()));
    }
}
