//! Dossier Evidence Filter
//!
//! Decides which face-match candidates describe the same person.
//!
//! # Overview
//!
//! 1. [`ScoreClusterer`] splits the ranked candidates into a trusted core and
//!    a tail.
//! 2. [`SignatureBuilder`] fetches the core pages and keeps their most
//!    frequent content words.
//! 3. [`ConcurrentFilterPool`] fetches tail pages in parallel and keeps those
//!    that share enough words with the signature ([`OverlapClassifier`]).
//!
//! All stages absorb fetch failures: a page without text simply contributes
//! nothing.

#![warn(missing_docs)]

mod cluster;
mod config;
mod error;
mod overlap;
mod pool;
mod report;
mod signature;
mod tokenize;

pub use cluster::ScoreClusterer;
pub use config::FilterConfig;
pub use error::FilterError;
pub use overlap::{overlap_count, OverlapClassifier, OverlapVerdict};
pub use pool::{slice_bounds, ConcurrentFilterPool, FilterOutcome};
pub use report::FilterReport;
pub use signature::{signature_from_texts, SignatureBuilder};
pub use tokenize::{is_content_word, tokenize, NOISE_WORDS, STOPWORDS};
