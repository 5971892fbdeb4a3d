//! Configuration for the network collaborators

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Browser User-Agent sent with page fetches; many sites reject bare clients
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/110.0.0.0 Safari/537.36";

/// Domains that are known to block or break scraping
pub const DEFAULT_BLOCKED_DOMAINS: &[&str] = &[
    "azernews.az",
    "catchmyparty.com",
    "creekcountysheriff.com",
    "etsy.com",
    "facebook.com",
    "health.usnews.com",
    "heraldsun.com.au",
    "instagram.com",
    "news.com.au",
    "thecontactdetails.com",
    "tullahomanews.com",
    "usnews.com",
];

/// Configuration for page fetching, lookups and web search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    /// User-Agent for page fetches and API calls
    pub user_agent: String,

    /// Timeout for a single HTTP request (seconds)
    /// Default: 10
    pub fetch_timeout_secs: u64,

    /// Domains never fetched; subdomains are blocked too
    pub blocked_domains: Vec<String>,

    /// Source-hosting REST API base url
    pub github_api_url: String,

    /// Base url for raw repository files
    pub github_raw_url: String,

    /// HTML web search endpoint
    pub search_url: String,

    /// Face search service settings
    pub facecheck: FaceCheckConfig,
}

impl SourcesConfig {
    /// Request timeout as a Duration
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.fetch_timeout_secs == 0 {
            return Err("fetch_timeout_secs must be greater than 0".to_string());
        }
        for (name, value) in [
            ("github_api_url", &self.github_api_url),
            ("github_raw_url", &self.github_raw_url),
            ("search_url", &self.search_url),
            ("facecheck.base_url", &self.facecheck.base_url),
        ] {
            url::Url::parse(value).map_err(|e| format!("{} is not a valid url: {}", name, e))?;
        }
        self.facecheck.validate()
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            fetch_timeout_secs: 10,
            blocked_domains: DEFAULT_BLOCKED_DOMAINS.iter().map(|d| d.to_string()).collect(),
            github_api_url: "https://api.github.com".to_string(),
            github_raw_url: "https://raw.githubusercontent.com".to_string(),
            search_url: "https://html.duckduckgo.com/html/".to_string(),
            facecheck: FaceCheckConfig::default(),
        }
    }
}

/// Face search service settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FaceCheckConfig {
    /// Service base url
    pub base_url: String,

    /// API token sent as the `Authorization` header
    #[serde(skip_serializing_if = "String::is_empty")]
    pub api_token: String,

    /// Free demo searches: inaccurate and slow, but no credits are spent
    /// Default: true
    pub testing_mode: bool,

    /// Delay between status polls (milliseconds)
    /// Default: 1000
    pub poll_interval_ms: u64,

    /// Give up polling after this long (seconds)
    /// Default: 600
    pub max_wait_secs: u64,
}

impl FaceCheckConfig {
    /// Poll interval as a Duration
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Polling deadline as a Duration
    pub fn max_wait(&self) -> Duration {
        Duration::from_secs(self.max_wait_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.poll_interval_ms == 0 {
            return Err("facecheck.poll_interval_ms must be greater than 0".to_string());
        }
        if self.max_wait_secs == 0 {
            return Err("facecheck.max_wait_secs must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for FaceCheckConfig {
    fn default() -> Self {
        Self {
            base_url: "https://facecheck.id".to_string(),
            api_token: String::new(),
            testing_mode: true,
            poll_interval_ms: 1000,
            max_wait_secs: 600,
        }
    }
}
