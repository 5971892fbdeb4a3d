//! Error types for the evidence filter

use thiserror::Error;

/// Errors that can occur while filtering candidates
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// Nothing to cluster
    #[error("Empty candidate set")]
    EmptyCandidateSet,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
