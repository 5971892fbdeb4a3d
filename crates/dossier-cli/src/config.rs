//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use dossier_pipeline::PipelineConfig;
use dossier_sources::SourcesConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration, stored as TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Display settings
    #[serde(default)]
    pub settings: Settings,

    /// Language model used for extraction
    #[serde(default)]
    pub llm: LlmSettings,

    /// Page fetching, lookups and face search
    #[serde(default)]
    pub sources: SourcesConfig,

    /// Clustering, filtering, escalation and extraction
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
}

/// Which language model backend to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmBackend {
    /// Local Ollama server
    Ollama,
    /// Google Gemini API
    Gemini,
}

/// Language model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    /// Backend to use
    #[serde(default = "default_backend")]
    pub backend: LlmBackend,

    /// Model name
    #[serde(default = "default_model")]
    pub model: String,

    /// Ollama server url
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Gemini API key; prefer the environment
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub api_key: String,
}

impl Config {
    /// Default configuration file path: `~/.dossier/config.toml`.
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".dossier").join("config.toml"))
    }

    /// Load from `path`, or from the default path when `None`.
    ///
    /// A missing file is created with default contents.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::default_path()?,
        };

        if path.exists() {
            Self::load_from(&path)
        } else {
            let config = Self::default();
            config.save_to(&path)?;
            Ok(config)
        }
    }

    /// Load configuration from an existing file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Serialize to TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Check every section.
    pub fn validate(&self) -> Result<()> {
        self.sources.validate().map_err(CliError::Config)?;
        self.pipeline.validate().map_err(CliError::Config)?;
        Ok(())
    }

    /// Apply secrets given on the command line or in the environment.
    pub fn apply_secrets(&mut self, facecheck_token: Option<String>, gemini_key: Option<String>) {
        if let Some(token) = facecheck_token.filter(|t| !t.is_empty()) {
            self.sources.facecheck.api_token = token;
        }
        if let Some(key) = gemini_key.filter(|k| !k.is_empty()) {
            self.llm.api_key = key;
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            model: default_model(),
            endpoint: default_endpoint(),
            api_key: String::new(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

fn default_backend() -> LlmBackend {
    LlmBackend::Ollama
}

fn default_model() -> String {
    "llama3.1".to_string()
}

fn default_endpoint() -> String {
    dossier_llm::ollama::DEFAULT_ENDPOINT.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.settings.color);
        assert_eq!(config.llm.backend, LlmBackend::Ollama);
        assert_eq!(config.pipeline.escalation.min_confirmed, 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_file_is_created() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load(Some(&path)).unwrap();
        assert!(path.exists());
        assert_eq!(config.settings.format, OutputFormat::Table);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[llm]\nbackend = \"gemini\"\nmodel = \"gemini-1.5-pro\"\n\n[pipeline.filter]\noverlap_threshold = 4\n",
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.llm.backend, LlmBackend::Gemini);
        assert_eq!(config.pipeline.filter.overlap_threshold, 4);
        assert_eq!(config.pipeline.filter.max_core, 5);
        assert_eq!(config.sources.fetch_timeout_secs, 10);
    }

    #[test]
    fn test_invalid_file_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[pipeline.extractor]\nmax_attempts = 0\n").unwrap();

        assert!(matches!(Config::load(Some(&path)), Err(CliError::Config(_))));
    }

    #[test]
    fn test_secrets_are_not_written_when_empty() {
        let toml_str = Config::default().to_toml().unwrap();
        assert!(!toml_str.contains("api_key"));
        assert!(!toml_str.contains("api_token"));
    }

    #[test]
    fn test_apply_secrets() {
        let mut config = Config::default();
        config.apply_secrets(Some("tok".to_string()), Some(String::new()));
        assert_eq!(config.sources.facecheck.api_token, "tok");
        assert!(config.llm.api_key.is_empty());
    }
}
