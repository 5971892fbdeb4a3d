//! Configuration for a pipeline run

use dossier_extractor::ExtractorConfig;
use dossier_filter::FilterConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings for the escalation step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EscalationConfig {
    /// Escalate when fewer tail candidates than this were confirmed
    /// Default: 2
    pub min_confirmed: usize,

    /// Supplementary urls kept from escalation
    /// Default: 3
    pub max_supplementary_urls: usize,

    /// Pause before the name search (milliseconds)
    /// Default: 1000
    pub search_delay_ms: u64,

    /// Results requested from the name search
    /// Default: 10
    pub name_search_results: usize,
}

impl EscalationConfig {
    /// Pause before the name search as a Duration
    pub fn search_delay(&self) -> Duration {
        Duration::from_millis(self.search_delay_ms)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.name_search_results == 0 {
            return Err("name_search_results must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for EscalationConfig {
    fn default() -> Self {
        Self {
            min_confirmed: 2,
            max_supplementary_urls: 3,
            search_delay_ms: 1000,
            name_search_results: 10,
        }
    }
}

/// Everything a [`Pipeline`](crate::Pipeline) needs to know, passed in
/// explicitly
///
/// # Examples
///
/// ```
/// use dossier_pipeline::PipelineConfig;
///
/// let config = PipelineConfig::from_toml(r#"
///     [filter]
///     overlap_threshold = 3
///
///     [escalation]
///     search_delay_ms = 0
/// "#).unwrap();
///
/// assert_eq!(config.filter.overlap_threshold, 3);
/// assert_eq!(config.escalation.min_confirmed, 2);
/// assert_eq!(config.extractor.max_attempts, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Clustering, signature and filter pool
    pub filter: FilterConfig,

    /// Profile extraction
    pub extractor: ExtractorConfig,

    /// Escalation to secondary sources
    pub escalation: EscalationConfig,
}

impl PipelineConfig {
    /// Validate every section
    pub fn validate(&self) -> Result<(), String> {
        self.filter.validate().map_err(|e| format!("filter: {}", e))?;
        self.extractor.validate().map_err(|e| format!("extractor: {}", e))?;
        self.escalation
            .validate()
            .map_err(|e| format!("escalation: {}", e))?;
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(PipelineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validation_names_the_section() {
        let mut config = PipelineConfig::default();
        config.escalation.name_search_results = 0;
        let err = config.validate().unwrap_err();
        assert!(err.starts_with("escalation:"), "{}", err);

        let mut config = PipelineConfig::default();
        config.extractor.max_attempts = 0;
        assert!(config.validate().unwrap_err().starts_with("extractor:"));
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = PipelineConfig::default();
        config.escalation.max_supplementary_urls = 5;
        config.filter = FilterConfig::strict();

        let toml_str = config.to_toml().unwrap();
        assert_eq!(PipelineConfig::from_toml(&toml_str).unwrap(), config);
    }

    #[test]
    fn test_bad_toml() {
        let err = PipelineConfig::from_toml("[escalation]\nmin_confirmed = \"two\"").unwrap_err();
        assert!(err.starts_with("Failed to parse TOML"));
    }
}
