//! Error types for network collaborators

use thiserror::Error;

/// Errors raised by the HTTP-backed sources
#[derive(Error, Debug)]
pub enum SourceError {
    /// Transport failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status
    #[error("HTTP {status} from {url}")]
    Status {
        /// Response status code
        status: u16,
        /// Requested url
        url: String,
    },

    /// Response body did not have the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The remote service reported a failure; message kept verbatim
    #[error("{0}")]
    Upstream(String),

    /// Polling did not finish in time
    #[error("Timed out after {0}s")]
    Timeout(u64),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
