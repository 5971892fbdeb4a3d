//! Error types for a pipeline run

use dossier_domain::Stage;
use dossier_extractor::ExtractorError;
use dossier_filter::FilterError;
use thiserror::Error;

/// Terminal failures of a run
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// The face-matching service reported an error; the text is the
    /// service's own message
    #[error("{0}")]
    UpstreamSearch(String),

    /// The search produced no candidates
    #[error("Face search returned no candidates")]
    EmptyCandidateSet,

    /// No evidence page yielded any text and escalation found nothing
    #[error("No evidence text could be collected")]
    NoEvidenceText,

    /// Every extraction attempt failed
    #[error("LLM failed to return a valid summary after {attempts} attempts: {message}")]
    ExtractionExhausted {
        /// Attempts made
        attempts: u32,
        /// Failure of the final attempt
        message: String,
    },

    /// Extraction failed in a way retrying cannot fix
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl PipelineError {
    /// Stage the failure belongs to
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::UpstreamSearch(_)
            | PipelineError::EmptyCandidateSet
            | PipelineError::Config(_) => Stage::Searching,
            PipelineError::NoEvidenceText
            | PipelineError::ExtractionExhausted { .. }
            | PipelineError::Extraction(_) => Stage::Extracting,
        }
    }
}

impl From<FilterError> for PipelineError {
    fn from(e: FilterError) -> Self {
        match e {
            FilterError::EmptyCandidateSet => PipelineError::EmptyCandidateSet,
            FilterError::Config(msg) => PipelineError::Config(msg),
        }
    }
}

impl From<ExtractorError> for PipelineError {
    fn from(e: ExtractorError) -> Self {
        match e {
            ExtractorError::Exhausted { attempts, last } => PipelineError::ExtractionExhausted {
                attempts,
                message: last.to_string(),
            },
            ExtractorError::EmptyInput => PipelineError::NoEvidenceText,
            ExtractorError::Config(msg) => PipelineError::Config(msg),
            other => PipelineError::Extraction(other.to_string()),
        }
    }
}
