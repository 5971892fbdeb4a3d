//! Dossier Domain Layer
//!
//! Core data model and capability interfaces for the Dossier identity-resolution
//! pipeline. Every other crate in the workspace depends on this one.
//!
//! ## Key Concepts
//!
//! - **Candidate**: a `(score, url)` pair returned by a face-matching service
//! - **Score cluster**: the trusted `core` prefix and the `tail` still to verify
//! - **Signature**: frequent words of the core pages, a lexical fingerprint
//! - **Confirmed evidence**: urls whose text feeds the profile extractor
//! - **Person profile**: the validated structured result of a run
//!
//! ## Architecture
//!
//! - Pure data types and invariants only
//! - Network-facing collaborators are expressed as traits in [`traits`];
//!   implementations live in `dossier-sources` and `dossier-llm`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod candidate;
pub mod evidence;
pub mod profile;
pub mod progress;
pub mod signature;
pub mod traits;

// Re-exports for convenience
pub use candidate::{sort_by_score_desc, CandidateMatch, ScoreCluster};
pub use evidence::{ConfirmedEvidence, EvidenceEntry, EvidenceOrigin, PageTextCache};
pub use profile::{PersonProfile, RAW_RESPONSE_MARKER};
pub use progress::{ProgressEvent, RunId, Stage};
pub use signature::Signature;
