//! Web search through the DuckDuckGo HTML endpoint

use crate::config::SourcesConfig;
use crate::error::SourceError;
use async_trait::async_trait;
use dossier_domain::traits::{BoxError, SearchHit, WebSearch};
use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

/// Web search backed by DuckDuckGo's no-JavaScript results page
pub struct DuckDuckGoSearch {
    client: reqwest::Client,
    endpoint: String,
}

impl DuckDuckGoSearch {
    /// Create a search client from configuration
    pub fn new(config: &SourcesConfig) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.fetch_timeout())
            .build()
            .map_err(|e| SourceError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: config.search_url.clone(),
        })
    }

    async fn query(&self, query: &str) -> Result<String, SourceError> {
        let response = self
            .client
            .post(&self.endpoint)
            .form(&[("q", query)])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(SourceError::Status {
                status: response.status().as_u16(),
                url: self.endpoint.clone(),
            });
        }
        Ok(response.text().await?)
    }
}

#[async_trait]
impl WebSearch for DuckDuckGoSearch {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, BoxError> {
        let html = self.query(query).await?;
        let hits = parse_results(&html, max_results)?;
        debug!(query, hits = hits.len(), "Web search complete");
        Ok(hits)
    }
}

/// Parse a results page into at most `max_results` hits
pub fn parse_results(html: &str, max_results: usize) -> Result<Vec<SearchHit>, SourceError> {
    let result_sel = selector("div.result")?;
    let link_sel = selector("a.result__a")?;
    let snippet_sel = selector(".result__snippet")?;

    let document = Html::parse_document(html);
    let hits = document
        .select(&result_sel)
        .filter_map(|result| {
            let link = result.select(&link_sel).next()?;
            let url = resolve_link(link.value().attr("href")?)?;
            Some(SearchHit {
                title: element_text(&link),
                url,
                body: result
                    .select(&snippet_sel)
                    .next()
                    .map(|s| element_text(&s))
                    .unwrap_or_default(),
            })
        })
        .take(max_results)
        .collect();
    Ok(hits)
}

fn selector(css: &str) -> Result<Selector, SourceError> {
    Selector::parse(css).map_err(|e| SourceError::InvalidResponse(format!("Bad selector {}: {}", css, e)))
}

fn element_text(element: &ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Unwrap DuckDuckGo's `/l/?uddg=` redirect links
fn resolve_link(href: &str) -> Option<String> {
    let absolute = if href.starts_with("//") {
        format!("https:{}", href)
    } else {
        href.to_string()
    };
    let parsed = Url::parse(&absolute).ok()?;

    if parsed.path().starts_with("/l/") {
        return parsed
            .query_pairs()
            .find(|(k, _)| k == "uddg")
            .map(|(_, v)| v.into_owned());
    }
    matches!(parsed.scheme(), "http" | "https").then_some(absolute)
}
