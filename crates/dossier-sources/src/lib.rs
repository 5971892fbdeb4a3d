//! Dossier Sources
//!
//! Network-backed implementations of the capability traits in
//! `dossier_domain::traits`:
//!
//! - [`HttpPageTextProvider`]: page fetch + visible text, with a domain blocklist
//! - [`GitHubLookup`]: source-hosting profile and README
//! - [`DuckDuckGoSearch`]: general web search
//! - [`SearchNameLookup`]: professional-network name via web search
//! - [`FaceCheckClient`]: face search (upload, then poll)
//!
//! Every collaborator except the face search absorbs its own failures and
//! answers with `None` or an empty value.

#![warn(missing_docs)]

mod config;
mod duckduckgo;
mod error;
mod facecheck;
mod github;
mod html;
mod name_lookup;
mod page;

pub use config::{FaceCheckConfig, SourcesConfig, DEFAULT_BLOCKED_DOMAINS, DEFAULT_USER_AGENT};
pub use duckduckgo::{parse_results, DuckDuckGoSearch};
pub use error::SourceError;
pub use facecheck::FaceCheckClient;
pub use github::{login_from_url, GitHubLookup};
pub use html::visible_text;
pub use name_lookup::{parse_profile_title, SearchNameLookup};
pub use page::{Blocklist, HttpPageTextProvider};
