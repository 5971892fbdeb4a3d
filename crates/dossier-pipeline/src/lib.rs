//! Dossier Pipeline
//!
//! Drives one identity-resolution run from a face image (or a cached list of
//! candidates) to a [`PersonProfile`](dossier_domain::PersonProfile):
//!
//! 1. face search
//! 2. score clustering and the core signature
//! 3. concurrent verification of the tail
//! 4. escalation to linked profiles when too little was confirmed
//! 5. profile extraction with bounded retry
//!
//! Progress is reported through a [`ProgressSink`]; [`Pipeline::spawn`]
//! wraps a run in a task and hands back the event stream.
//!
//! # Example
//!
//! ```no_run
//! use dossier_pipeline::{Collaborators, Pipeline, PipelineConfig, PipelineEvent, RunInput};
//! use dossier_llm::MockProvider;
//! use std::sync::Arc;
//!
//! # async fn example(collaborators: Collaborators, candidates: Vec<dossier_domain::CandidateMatch>) {
//! let llm = Arc::new(MockProvider::new(r#"{"name": "Jane Doe"}"#));
//! let pipeline = Arc::new(Pipeline::new(collaborators, llm, PipelineConfig::default()).unwrap());
//!
//! let mut events = pipeline.spawn(RunInput::Candidates(candidates));
//! while let Some(event) = events.recv().await {
//!     match event {
//!         PipelineEvent::Progress(p) => println!("{}", p.message),
//!         PipelineEvent::Done(outcome) => println!("{}", outcome.profile.name),
//!         PipelineEvent::Failed { message, .. } => eprintln!("{}", message),
//!     }
//! }
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod escalation;
mod events;
mod orchestrator;
mod outcome;

pub use config::{EscalationConfig, PipelineConfig};
pub use error::PipelineError;
pub use escalation::{EscalationOutcome, EscalationSource, HOSTING_PROFILE_MARKER, NETWORK_PROFILE_MARKER};
pub use events::{PipelineEvent, ProgressSink};
pub use orchestrator::{Collaborators, Pipeline, RunInput};
pub use outcome::RunOutcome;
