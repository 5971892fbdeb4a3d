//! Dossier Extractor
//!
//! Turns the text of confirmed evidence pages into a validated [`PersonProfile`]
//! using an LLM.
//!
//! # Architecture
//!
//! ```text
//! Evidence text → PromptBuilder → LLM → parser → PersonProfile
//!                                  ↑        │
//!                                  └ retry ─┘
//! ```
//!
//! Each attempt is all-or-nothing: the response must parse into the profile
//! shape and must not carry the raw-response marker. Failed attempts are
//! retried with the identical prompt, without backoff, up to
//! [`ExtractorConfig::max_attempts`].
//!
//! # Example Usage
//!
//! ```no_run
//! use dossier_extractor::{Extractor, ExtractorConfig, ExtractionRequest, SourceText};
//! use dossier_llm::MockProvider;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let llm = MockProvider::new(r#"{"name": "Jane Doe"}"#);
//! let extractor = Extractor::new(llm, ExtractorConfig::default());
//!
//! let request = ExtractionRequest {
//!     sources: vec![SourceText {
//!         url: "https://example.com/about".to_string(),
//!         text: "Jane Doe is a software engineer in Seattle.".to_string(),
//!     }],
//!     supplement: None,
//! };
//!
//! let result = extractor
//!     .extract(&request, |failure| eprintln!("attempt {} failed", failure.attempt))
//!     .await?;
//! println!("Name: {}", result.profile.name);
//! # Ok(())
//! # }
//! ```
//!
//! [`PersonProfile`]: dossier_domain::PersonProfile

#![warn(missing_docs)]

mod config;
mod error;
mod extractor;
mod parser;
mod prompt;
mod retry;
mod types;


pub use config::ExtractorConfig;
pub use error::ExtractorError;
pub use extractor::Extractor;
pub use parser::parse_profile_response;
pub use prompt::{PromptBuilder, PROFILE_SCHEMA};
pub use retry::RetryPolicy;
pub use types::{AttemptFailure, ExtractionMetadata, ExtractionRequest, ExtractionResult, SourceText};
