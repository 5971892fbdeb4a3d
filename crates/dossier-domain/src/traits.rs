//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the pipeline and the network.
//! Infrastructure implementations live in `dossier-sources` and `dossier-llm`;
//! tests substitute in-memory fakes.

use crate::CandidateMatch;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Boxed error for collaborators whose failures the pipeline only reports
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Face-matching search service
///
/// Implemented by the infrastructure layer (dossier-sources)
#[async_trait]
pub trait FaceSearch: Send + Sync {
    /// Search the web for pages showing the face in `image`.
    ///
    /// May poll for a long time internally. An `Err` is an upstream failure
    /// and its message is surfaced to the caller verbatim.
    async fn search(&self, image: &[u8]) -> Result<Vec<CandidateMatch>, BoxError>;
}

/// Fetches a url and extracts its visible text
///
/// Implemented by the infrastructure layer (dossier-sources)
#[async_trait]
pub trait PageTextProvider: Send + Sync {
    /// Visible text of the page, or `None` on any failure (network error,
    /// blocked domain, timeout, or no text left after cleanup)
    async fn fetch_text(&self, url: &str) -> Option<String>;
}

/// Public profile record from a source-code hosting service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostedProfile {
    /// Account handle
    pub login: String,

    /// Display name, if set
    pub name: Option<String>,

    /// Public email, if set
    pub email: Option<String>,

    /// Personal site url, if set
    pub blog_url: Option<String>,

    /// Canonical profile url
    pub profile_url: Option<String>,
}

/// Source-code hosting profile lookup
///
/// Implemented by the infrastructure layer (dossier-sources)
#[async_trait]
pub trait SourceHostingLookup: Send + Sync {
    /// Resolve a profile url to its public record
    async fn lookup_profile(&self, url: &str) -> Option<HostedProfile>;

    /// Self-description README for the profile; empty when absent
    async fn fetch_readme(&self, profile: &HostedProfile) -> String;
}

/// Name and location recovered for a professional-network profile
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkIdentity {
    /// Display name; empty when unresolved
    pub name: String,

    /// Location; empty when unresolved
    pub location: String,
}

impl NetworkIdentity {
    /// Whether a name was resolved
    pub fn is_resolved(&self) -> bool {
        !self.name.is_empty()
    }
}

/// Professional-network name lookup
///
/// Implemented by the infrastructure layer (dossier-sources)
#[async_trait]
pub trait ProfessionalNetworkLookup: Send + Sync {
    /// Resolve the display name and location behind a profile url.
    ///
    /// Returns an empty identity on any failure.
    async fn lookup_identity(&self, url: &str) -> NetworkIdentity;
}

/// One general web search result
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Result title
    pub title: String,

    /// Result url
    pub url: String,

    /// Result snippet
    pub body: String,
}

/// General web search
///
/// Implemented by the infrastructure layer (dossier-sources)
#[async_trait]
pub trait WebSearch: Send + Sync {
    /// Run `query`, returning at most `max_results` hits
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, BoxError>;
}

/// Trait for LLM provider operations
///
/// Implemented by the infrastructure layer (dossier-llm)
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Error type for LLM operations
    type Error: std::fmt::Display + Send;

    /// Generate text completion
    async fn generate(&self, prompt: &str) -> Result<String, Self::Error>;

    /// Generate output constrained to a JSON schema (if supported)
    async fn generate_structured(&self, prompt: &str, schema: &str) -> Result<String, Self::Error>;
}
