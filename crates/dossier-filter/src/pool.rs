//! Concurrent verification of tail candidates
//!
//! The tail is cut into contiguous slices, one tokio task per slice. Each
//! task owns its results and page texts; they are merged in slice order once
//! every task has finished, then sorted by score. Nothing mutable is shared
//! between tasks.

use crate::config::FilterConfig;
use crate::overlap::OverlapClassifier;
use crate::report::FilterReport;
use dossier_domain::traits::PageTextProvider;
use dossier_domain::{sort_by_score_desc, CandidateMatch, PageTextCache, Signature};
use std::ops::Range;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Matches and page texts produced by one pool run
#[derive(Debug, Clone, Default)]
pub struct FilterOutcome {
    /// Matched candidates, highest score first
    pub matches: Vec<CandidateMatch>,

    /// Text of every matched page
    pub cache: PageTextCache,

    /// Counters for the run
    pub report: FilterReport,
}

/// What a single worker hands back after its slice
#[derive(Default)]
struct WorkerOutput {
    matches: Vec<CandidateMatch>,
    cache: PageTextCache,
    report: FilterReport,
}

/// Verifies tail candidates against a signature in parallel
pub struct ConcurrentFilterPool {
    provider: Arc<dyn PageTextProvider>,
    classifier: OverlapClassifier,
    config: FilterConfig,
}

impl ConcurrentFilterPool {
    /// Create a pool
    pub fn new(provider: Arc<dyn PageTextProvider>, config: FilterConfig) -> Self {
        Self {
            provider,
            classifier: OverlapClassifier::new(config.overlap_threshold),
            config,
        }
    }

    /// Verify the first `tail_limit` candidates of `tail`.
    ///
    /// Returns only after every worker has finished. Fetch failures and
    /// worker panics cost matches, never the whole run.
    pub async fn run(&self, signature: Arc<Signature>, tail: &[CandidateMatch]) -> FilterOutcome {
        let start = Instant::now();
        let limit = tail.len().min(self.config.tail_limit);
        let batch = &tail[..limit];
        let workers = self.config.worker_count(batch.len());

        let mut outcome = FilterOutcome::default();
        outcome.report.skipped_by_limit = tail.len() - limit;
        outcome.report.workers = workers;

        if batch.is_empty() {
            debug!("No tail candidates to verify");
            return outcome;
        }

        let handles: Vec<JoinHandle<WorkerOutput>> = slice_bounds(batch.len(), workers)
            .into_iter()
            .map(|range| {
                let slice = batch[range].to_vec();
                let provider = Arc::clone(&self.provider);
                let signature = Arc::clone(&signature);
                let classifier = self.classifier;
                let fetch_timeout = self.config.fetch_timeout();
                tokio::spawn(async move {
                    verify_slice(provider, signature, classifier, fetch_timeout, slice).await
                })
            })
            .collect();

        for (idx, handle) in handles.into_iter().enumerate() {
            match handle.await {
                Ok(output) => {
                    outcome.report.absorb(&output.report);
                    outcome.cache.merge(output.cache);
                    outcome.matches.extend(output.matches);
                }
                Err(e) => {
                    warn!(worker = idx, error = %e, "Filter worker failed");
                    outcome.report.worker_failures += 1;
                }
            }
        }

        sort_by_score_desc(&mut outcome.matches);
        outcome.report.elapsed_ms = start.elapsed().as_millis() as u64;

        info!(
            evaluated = outcome.report.evaluated,
            matched = outcome.report.matched,
            workers,
            elapsed_ms = outcome.report.elapsed_ms,
            "Filtered tail candidates"
        );
        outcome
    }
}

async fn verify_slice(
    provider: Arc<dyn PageTextProvider>,
    signature: Arc<Signature>,
    classifier: OverlapClassifier,
    fetch_timeout: Duration,
    slice: Vec<CandidateMatch>,
) -> WorkerOutput {
    let mut output = WorkerOutput::default();

    for mut candidate in slice {
        output.report.evaluated += 1;

        let text = match timeout(fetch_timeout, provider.fetch_text(&candidate.url)).await {
            Ok(Some(text)) => text,
            Ok(None) => {
                output.report.fetch_failures += 1;
                continue;
            }
            Err(_) => {
                debug!(url = %candidate.url, "Page fetch timed out");
                output.report.fetch_failures += 1;
                continue;
            }
        };
        output.report.fetched += 1;

        let verdict = classifier.classify(&signature, &text);
        debug!(
            url = %candidate.url,
            overlap = verdict.count,
            is_match = verdict.is_match,
            "Classified page"
        );
        if !verdict.is_match {
            continue;
        }

        output.report.matched += 1;
        output.cache.insert(candidate.url.clone(), text.clone());
        candidate.set_page_text(text);
        output.matches.push(candidate);
    }

    output
}

/// Split `len` items into `workers` contiguous ranges whose sizes differ by
/// at most one; earlier ranges take the remainder.
pub fn slice_bounds(len: usize, workers: usize) -> Vec<Range<usize>> {
    if len == 0 || workers == 0 {
        return Vec::new();
    }
    let workers = workers.min(len);
    let base = len / workers;
    let extra = len % workers;

    let mut start = 0;
    (0..workers)
        .map(|i| {
            let size = base + usize::from(i < extra);
            let range = start..start + size;
            start += size;
            range
        })
        .collect()
}
