//! The run state machine
//!
//! ```text
//! SEARCHING → CLUSTERING_AND_SIGNATURE → FILTERING → [ESCALATING] → EXTRACTING → DONE
//!     └──────────────────────┴───────────────┴──────────────┴────────────┴──→ FAILED
//! ```
//!
//! Each stage is announced on the [`ProgressSink`] before its work starts.
//! Only the filter pool runs concurrently; everything else is one sequential
//! flow.

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::escalation::EscalationSource;
use crate::events::{PipelineEvent, ProgressSink};
use crate::outcome::RunOutcome;
use dossier_domain::traits::{
    FaceSearch, LlmProvider, PageTextProvider, ProfessionalNetworkLookup, SourceHostingLookup,
    WebSearch,
};
use dossier_domain::{CandidateMatch, ConfirmedEvidence, EvidenceOrigin, PageTextCache, Stage};
use dossier_extractor::{ExtractionRequest, Extractor};
use dossier_filter::{ConcurrentFilterPool, ScoreClusterer, SignatureBuilder};
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::{debug, info};

/// Network-facing capabilities a run needs besides the LLM
#[derive(Clone)]
pub struct Collaborators {
    /// Page fetch and text extraction
    pub pages: Arc<dyn PageTextProvider>,

    /// Source-hosting profile lookup
    pub hosting: Arc<dyn SourceHostingLookup>,

    /// Professional-network name lookup
    pub network: Arc<dyn ProfessionalNetworkLookup>,

    /// General web search
    pub web: Arc<dyn WebSearch>,
}

/// Where a spawned run starts
#[derive(Debug, Clone)]
pub enum RunInput {
    /// Run the face search on an image first
    Image(Vec<u8>),

    /// Start from an already resolved candidate list
    Candidates(Vec<CandidateMatch>),
}

/// Identity-resolution pipeline
pub struct Pipeline<L>
where
    L: LlmProvider,
{
    face_search: Option<Arc<dyn FaceSearch>>,
    pages: Arc<dyn PageTextProvider>,
    clusterer: ScoreClusterer,
    signatures: SignatureBuilder,
    pool: ConcurrentFilterPool,
    escalation: EscalationSource,
    extractor: Extractor<L>,
}

impl<L> Pipeline<L>
where
    L: LlmProvider,
{
    /// Build a pipeline; fails if `config` does not validate
    pub fn new(
        collaborators: Collaborators,
        llm: Arc<L>,
        config: PipelineConfig,
    ) -> Result<Self, PipelineError> {
        config.validate().map_err(PipelineError::Config)?;

        let Collaborators {
            pages,
            hosting,
            network,
            web,
        } = collaborators;
        let filter = config.filter;

        Ok(Self {
            face_search: None,
            clusterer: ScoreClusterer::new(filter.stdev_multiplier, filter.max_core),
            signatures: SignatureBuilder::new(pages.clone(), filter.signature_size),
            pool: ConcurrentFilterPool::new(pages.clone(), filter),
            escalation: EscalationSource::new(hosting, network, web, config.escalation),
            extractor: Extractor::from_arc(llm, config.extractor),
            pages,
        })
    }

    /// Attach the face search used by [`Pipeline::run`]
    pub fn with_face_search(mut self, face_search: Arc<dyn FaceSearch>) -> Self {
        self.face_search = Some(face_search);
        self
    }

    /// Name the model in extraction metadata
    pub fn with_model_name(mut self, model_name: impl Into<String>) -> Self {
        self.extractor = self.extractor.with_model_name(model_name);
        self
    }

    /// Full run: face search on `image`, then [`Pipeline::run_candidates`]
    pub async fn run(&self, image: &[u8], sink: &mut ProgressSink) -> Result<RunOutcome, PipelineError> {
        let result = match self.search(image, sink).await {
            Ok(candidates) => self.resolve(candidates, sink).await,
            Err(e) => Err(e),
        };
        report(result, sink)
    }

    /// Run from an already resolved candidate list
    pub async fn run_candidates(
        &self,
        candidates: Vec<CandidateMatch>,
        sink: &mut ProgressSink,
    ) -> Result<RunOutcome, PipelineError> {
        let result = self.resolve(candidates, sink).await;
        report(result, sink)
    }

    async fn search(&self, image: &[u8], sink: &mut ProgressSink) -> Result<Vec<CandidateMatch>, PipelineError> {
        let face_search = self
            .face_search
            .as_ref()
            .ok_or_else(|| PipelineError::Config("No face search configured".to_string()))?;

        sink.advance(Stage::Searching, "Running face search");
        let candidates = face_search
            .search(image)
            .await
            .map_err(|e| PipelineError::UpstreamSearch(e.to_string()))?;

        info!(candidates = candidates.len(), "Face search returned");
        Ok(candidates)
    }

    async fn resolve(
        &self,
        candidates: Vec<CandidateMatch>,
        sink: &mut ProgressSink,
    ) -> Result<RunOutcome, PipelineError> {
        if candidates.is_empty() {
            return Err(PipelineError::EmptyCandidateSet);
        }

        sink.advance(Stage::ClusteringAndSignature, "Building profile signatures");
        let cluster = self.clusterer.cluster(candidates)?;
        let core_urls = cluster.core_urls();
        let mut cache = PageTextCache::new();
        let signature = self.signatures.build(&core_urls, &mut cache).await;
        debug!(
            core = cluster.core.len(),
            tail = cluster.tail.len(),
            signature = signature.len(),
            "Cluster and signature ready"
        );

        sink.advance(Stage::Filtering, "Finding & filtering additional information");
        let filtered = self.pool.run(Arc::new(signature), &cluster.tail).await;
        cache.merge(filtered.cache);

        let mut evidence = ConfirmedEvidence::new();
        for candidate in &cluster.core {
            evidence.push(candidate.score, candidate.url.as_str(), EvidenceOrigin::Core);
        }
        for candidate in &filtered.matches {
            evidence.push(candidate.score, candidate.url.as_str(), EvidenceOrigin::Matched);
        }

        let mut supplement = None;
        let escalated = self.escalation.is_needed(filtered.matches.len());
        if escalated {
            sink.advance(Stage::Escalating, "Looking for more information in linked profiles");
            let found = self.escalation.escalate(&core_urls).await;
            for url in &found.urls {
                match self.pages.fetch_text(url).await {
                    Some(text) => {
                        cache.insert(url.as_str(), text);
                        evidence.push_escalated(url.as_str());
                    }
                    None => debug!(url = %url, "Supplementary page has no text"),
                }
            }
            supplement = Some(found.supplement_text);
        }

        evidence.sort_by_score();
        let request = ExtractionRequest::from_evidence(&evidence, &cache, supplement);

        sink.advance(Stage::Extracting, "Summarizing person information");
        let extracted = self
            .extractor
            .extract(&request, |failure| {
                if failure.will_retry() {
                    sink.advance(
                        Stage::Extracting,
                        format!(
                            "Attempt {}/{}: LLM returned malformatted summary, retrying...",
                            failure.attempt, failure.max_attempts
                        ),
                    );
                }
            })
            .await?;

        let outcome = RunOutcome {
            run_id: sink.run_id(),
            profile: extracted.profile,
            evidence,
            filter: filtered.report,
            escalated,
            extraction: extracted.metadata,
        };
        info!(run_id = %outcome.run_id, "{}", outcome.summary());
        Ok(outcome)
    }
}

impl<L> Pipeline<L>
where
    L: LlmProvider + 'static,
{
    /// Start a run in the background and return its event stream.
    ///
    /// The stream ends with exactly one `Done` or `Failed` event.
    pub fn spawn(self: Arc<Self>, input: RunInput) -> UnboundedReceiver<PipelineEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(async move {
            let mut sink = ProgressSink::new(tx);
            // The outcome travels as the terminal event
            let _ = match input {
                RunInput::Image(image) => self.run(&image, &mut sink).await,
                RunInput::Candidates(candidates) => self.run_candidates(candidates, &mut sink).await,
            };
        });
        rx
    }
}

fn report(result: Result<RunOutcome, PipelineError>, sink: &mut ProgressSink) -> Result<RunOutcome, PipelineError> {
    match &result {
        Ok(outcome) => sink.finish(outcome),
        Err(e) => sink.fail(e),
    }
    result
}
