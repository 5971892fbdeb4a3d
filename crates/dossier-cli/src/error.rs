//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Face search or lookup client error
    #[error("Source error: {0}")]
    Source(#[from] dossier_sources::SourceError),

    /// Language model client error
    #[error("LLM error: {0}")]
    Llm(#[from] dossier_llm::LlmError),

    /// Pipeline construction or run error
    #[error("{0}")]
    Pipeline(#[from] dossier_pipeline::PipelineError),

    /// A run ended in failure
    #[error("Run failed at stage {stage}: {message}")]
    RunFailed {
        /// Stage the run failed in
        stage: String,
        /// Failure text
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
