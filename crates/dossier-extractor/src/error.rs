//! Error types for the Extractor

use thiserror::Error;

/// Errors that can occur during extraction
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// LLM provider error
    #[error("LLM error: {0}")]
    Llm(String),

    /// A single LLM call took too long
    #[error("Extraction timeout after {0}s")]
    Timeout(u64),

    /// The model answered, but not with a profile object
    #[error("Invalid profile format: {0}")]
    InvalidFormat(String),

    /// The response carried the raw-unparsed-response marker
    #[error("LLM returned an unparsed response")]
    RawResponse,

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    JsonParse(String),

    /// No evidence text to extract from
    #[error("No source text to extract from")]
    EmptyInput,

    /// Every attempt failed
    #[error("Extraction failed after {attempts} attempts: {last}")]
    Exhausted {
        /// Number of attempts made
        attempts: u32,
        /// Failure of the final attempt
        last: Box<ExtractorError>,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ExtractorError {
    /// Whether another attempt with the same input could succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ExtractorError::Llm(_)
                | ExtractorError::Timeout(_)
                | ExtractorError::InvalidFormat(_)
                | ExtractorError::RawResponse
                | ExtractorError::JsonParse(_)
        )
    }
}

impl From<serde_json::Error> for ExtractorError {
    fn from(e: serde_json::Error) -> Self {
        ExtractorError::JsonParse(e.to_string())
    }
}
