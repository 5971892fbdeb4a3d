//! Configuration for clustering, signatures and the filter pool

use dossier_domain::signature::MAX_SIGNATURE_TOKENS;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the evidence filter
///
/// # Examples
///
/// ```
/// use dossier_filter::FilterConfig;
///
/// let config = FilterConfig::default();
/// assert_eq!(config.overlap_threshold, 5);
///
/// // Accept fewer shared words
/// let config = FilterConfig::lenient();
/// assert_eq!(config.overlap_threshold, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Core boundary is `mean + stdev_multiplier * stdev`
    /// Default: 1.0
    pub stdev_multiplier: f64,

    /// Largest allowed core cluster
    /// Default: 5
    pub max_core: usize,

    /// Tokens kept in the signature (at most 50)
    /// Default: 50
    pub signature_size: usize,

    /// Signature words a page must contain to count as a match
    /// Default: 5
    pub overlap_threshold: usize,

    /// Tail candidates evaluated by the pool; later ones are never fetched
    /// Default: 10
    pub tail_limit: usize,

    /// Upper bound on pool workers; `None` uses available parallelism
    pub max_workers: Option<usize>,

    /// Guard on a single page fetch inside the pool (seconds)
    /// Default: 15
    pub fetch_timeout_secs: u64,
}

impl FilterConfig {
    /// Stricter matching: more shared words, fewer tail pages
    pub fn strict() -> Self {
        Self {
            overlap_threshold: 8,
            tail_limit: 5,
            ..Self::default()
        }
    }

    /// Looser matching: fewer shared words, more tail pages
    pub fn lenient() -> Self {
        Self {
            overlap_threshold: 3,
            tail_limit: 20,
            ..Self::default()
        }
    }

    /// Fetch guard as a Duration
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Number of workers for `tail_len` candidates
    pub fn worker_count(&self, tail_len: usize) -> usize {
        let cap = self.max_workers.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        });
        tail_len.min(cap.max(1))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if !self.stdev_multiplier.is_finite() || self.stdev_multiplier < 0.0 {
            return Err("stdev_multiplier must be a non-negative number".to_string());
        }
        if self.max_core == 0 {
            return Err("max_core must be greater than 0".to_string());
        }
        if self.signature_size == 0 || self.signature_size > MAX_SIGNATURE_TOKENS {
            return Err(format!(
                "signature_size must be between 1 and {}",
                MAX_SIGNATURE_TOKENS
            ));
        }
        if self.overlap_threshold == 0 {
            return Err("overlap_threshold must be greater than 0".to_string());
        }
        if self.max_workers == Some(0) {
            return Err("max_workers must be greater than 0".to_string());
        }
        if self.fetch_timeout_secs == 0 {
            return Err("fetch_timeout_secs must be greater than 0".to_string());
        }
        Ok(())
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

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            stdev_multiplier: 1.0,
            max_core: 5,
            signature_size: MAX_SIGNATURE_TOKENS,
            overlap_threshold: 5,
            tail_limit: 10,
            max_workers: None,
            fetch_timeout_secs: 15,
        }
    }
}
