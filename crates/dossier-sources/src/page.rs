//! Page text over HTTP

use crate::config::SourcesConfig;
use crate::error::SourceError;
use crate::html::visible_text;
use async_trait::async_trait;
use dossier_domain::traits::PageTextProvider;
use tracing::debug;
use url::Url;

/// Set of domains that are never fetched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Blocklist {
    domains: Vec<String>,
}

impl Blocklist {
    /// Blocklist over `domains` (case-insensitive)
    pub fn new<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            domains: domains
                .into_iter()
                .map(|d| d.as_ref().trim().trim_start_matches('.').to_ascii_lowercase())
                .filter(|d| !d.is_empty())
                .collect(),
        }
    }

    /// Whether `url` points at a blocked domain or one of its subdomains.
    ///
    /// Urls without a parseable host fall back to a substring check.
    pub fn is_blocked(&self, url: &str) -> bool {
        match Url::parse(url).ok().and_then(|u| u.host_str().map(str::to_ascii_lowercase)) {
            Some(host) => self.domains.iter().any(|d| {
                host == *d || host.strip_suffix(d.as_str()).is_some_and(|rest| rest.ends_with('.'))
            }),
            None => {
                let lower = url.to_ascii_lowercase();
                self.domains.iter().any(|d| lower.contains(d.as_str()))
            }
        }
    }

    /// Number of blocked domains
    pub fn len(&self) -> usize {
        self.domains.len()
    }

    /// Whether nothing is blocked
    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }
}

/// Fetches pages with a browser User-Agent and extracts their visible text
pub struct HttpPageTextProvider {
    client: reqwest::Client,
    blocklist: Blocklist,
}

impl HttpPageTextProvider {
    /// Create a provider from configuration
    pub fn new(config: &SourcesConfig) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.fetch_timeout())
            .build()
            .map_err(|e| SourceError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            blocklist: Blocklist::new(&config.blocked_domains),
        })
    }

    /// Active blocklist
    pub fn blocklist(&self) -> &Blocklist {
        &self.blocklist
    }

    async fn fetch_html(&self, url: &str) -> Result<String, SourceError> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }
}

#[async_trait]
impl PageTextProvider for HttpPageTextProvider {
    async fn fetch_text(&self, url: &str) -> Option<String> {
        if self.blocklist.is_blocked(url) {
            debug!(url, "Skipping blocked domain");
            return None;
        }

        match self.fetch_html(url).await {
            Ok(html) => visible_text(&html),
            Err(e) => {
                debug!(url, error = %e, "Page fetch failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blocklist() -> Blocklist {
        Blocklist::new(["etsy.com", "News.com.au", ""])
    }

    #[test]
    fn test_blocks_domain_and_subdomains() {
        let list = blocklist();
        assert_eq!(list.len(), 2);
        assert!(list.is_blocked("https://etsy.com/shop/x"));
        assert!(list.is_blocked("https://www.ETSY.com/shop/x"));
        assert!(list.is_blocked("https://sport.news.com.au/a"));
    }

    #[test]
    fn test_does_not_block_lookalikes() {
        let list = blocklist();
        assert!(!list.is_blocked("https://notetsy.com/"));
        assert!(!list.is_blocked("https://example.com/etsy.com"));
    }

    #[test]
    fn test_unparseable_url_uses_substring() {
        assert!(blocklist().is_blocked("etsy.com/shop"));
        assert!(!blocklist().is_blocked("example.org/shop"));
    }

    #[tokio::test]
    async fn test_blocked_url_is_never_fetched() {
        let provider = HttpPageTextProvider::new(&SourcesConfig::default()).unwrap();
        assert!(provider.fetch_text("https://www.facebook.com/jane").await.is_none());
    }

    #[tokio::test]
    async fn test_unreachable_host_yields_none() {
        let provider = HttpPageTextProvider::new(&SourcesConfig::default()).unwrap();
        assert!(provider.fetch_text("http://localhost:99999/").await.is_none());
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_fetch_real_page() {
        let provider = HttpPageTextProvider::new(&SourcesConfig::default()).unwrap();
        let text = provider.fetch_text("https://example.com/").await;
        assert!(text.is_some_and(|t| t.contains("Example Domain")));
    }
}
