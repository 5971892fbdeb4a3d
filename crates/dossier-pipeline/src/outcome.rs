//! Result of a successful run

use dossier_domain::{ConfirmedEvidence, EvidenceOrigin, PersonProfile, RunId};
use dossier_extractor::ExtractionMetadata;
use dossier_filter::FilterReport;

/// Profile plus the evidence trail that produced it
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// Run identifier
    pub run_id: RunId,

    /// Extracted profile
    pub profile: PersonProfile,

    /// Urls that fed the extraction, highest score first
    pub evidence: ConfirmedEvidence,

    /// Filter pool counters
    pub filter: FilterReport,

    /// Whether escalation ran
    pub escalated: bool,

    /// Extraction details
    pub extraction: ExtractionMetadata,
}

impl RunOutcome {
    /// One-line summary for logs
    pub fn summary(&self) -> String {
        format!(
            "{} core, {} matched, {} escalated; profile after {} attempt(s)",
            self.evidence.count(EvidenceOrigin::Core),
            self.evidence.count(EvidenceOrigin::Matched),
            self.evidence.count(EvidenceOrigin::Escalated),
            self.extraction.attempts
        )
    }
}
