//! Request and response types for extraction

use crate::error::ExtractorError;
use dossier_domain::{ConfirmedEvidence, PageTextCache, PersonProfile};

/// Text of one evidence page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceText {
    /// Page the text came from
    pub url: String,

    /// Extracted visible text
    pub text: String,
}

/// Request to extract a profile from evidence text
#[derive(Debug, Clone, Default)]
pub struct ExtractionRequest {
    /// Evidence pages, highest score first
    pub sources: Vec<SourceText>,

    /// Supplementary facts gathered during escalation
    pub supplement: Option<String>,
}

impl ExtractionRequest {
    /// Collect the cached text of every evidence url.
    ///
    /// Urls without cached text are skipped. The evidence order is kept, so
    /// callers should sort it first.
    pub fn from_evidence(
        evidence: &ConfirmedEvidence,
        cache: &PageTextCache,
        supplement: Option<String>,
    ) -> Self {
        let sources = evidence
            .with_text(cache)
            .into_iter()
            .map(|(entry, text)| SourceText {
                url: entry.url.clone(),
                text: text.to_string(),
            })
            .collect();

        Self {
            sources,
            supplement: supplement.filter(|s| !s.trim().is_empty()),
        }
    }

    /// Whether there is nothing to extract from
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty() && self.supplement.is_none()
    }
}

/// Report of one failed attempt, handed to the caller's observer
#[derive(Debug)]
pub struct AttemptFailure<'a> {
    /// 1-based attempt number
    pub attempt: u32,

    /// Configured attempt limit
    pub max_attempts: u32,

    /// Why the attempt failed
    pub reason: &'a ExtractorError,
}

impl AttemptFailure<'_> {
    /// Whether another attempt will follow
    pub fn will_retry(&self) -> bool {
        self.attempt < self.max_attempts
    }
}

/// Result of a successful extraction
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// The validated profile
    pub profile: PersonProfile,

    /// Metadata about the extraction
    pub metadata: ExtractionMetadata,
}

/// Metadata about an extraction operation
#[derive(Debug, Clone)]
pub struct ExtractionMetadata {
    /// Attempt that produced the profile (1-based)
    pub attempts: u32,

    /// Name of the LLM model used
    pub model_name: String,

    /// Number of evidence pages in the prompt
    pub source_count: usize,

    /// Prompt length in characters
    pub prompt_chars: usize,

    /// Processing time in milliseconds
    pub processing_time_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use dossier_domain::EvidenceOrigin;

    #[test]
    fn test_from_evidence_keeps_order_and_skips_missing() {
        let mut evidence = ConfirmedEvidence::new();
        evidence.push(98, "a", EvidenceOrigin::Core);
        evidence.push(60, "b", EvidenceOrigin::Matched);
        evidence.push(0, "c", EvidenceOrigin::Escalated);

        let mut cache = PageTextCache::new();
        cache.insert("a", "alpha");
        cache.insert("c", "gamma");

        let request = ExtractionRequest::from_evidence(&evidence, &cache, Some("  ".to_string()));
        let urls: Vec<_> = request.sources.iter().map(|s| s.url.as_str()).collect();
        assert_eq!(urls, vec!["a", "c"]);
        assert!(request.supplement.is_none());
        assert!(!request.is_empty());
    }

    #[test]
    fn test_attempt_failure_will_retry() {
        let err = ExtractorError::RawResponse;
        let failure = AttemptFailure {
            attempt: 2,
            max_attempts: 3,
            reason: &err,
        };
        assert!(failure.will_retry());

        let last = AttemptFailure {
            attempt: 3,
            max_attempts: 3,
            reason: &err,
        };
        assert!(!last.will_retry());
    }
}
