//! Pipeline stages and progress notifications

use std::fmt;

/// Identifier for one pipeline run, based on UUIDv7
///
/// UUIDv7 sorts chronologically, so run ids in logs order by start time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RunId(u128);

impl RunId {
    /// Generate a new run id
    ///
    /// # Examples
    ///
    /// ```
    /// use dossier_domain::RunId;
    ///
    /// let a = RunId::new();
    /// let b = RunId::new();
    /// assert_ne!(a, b);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Get the raw u128 value
    pub fn value(&self) -> u128 {
        self.0
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

/// Stage of the identity-resolution state machine
///
/// Runs advance `Searching → ClusteringAndSignature → Filtering →
/// Escalating (optional) → Extracting → Done`. `Failed` is reachable from
/// any stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Waiting on the face-matching service
    Searching,
    /// Partitioning candidates and building the signature
    ClusteringAndSignature,
    /// Verifying tail candidates concurrently
    Filtering,
    /// Gathering supplementary evidence from secondary sources
    Escalating,
    /// Calling the language model
    Extracting,
    /// Terminal success
    Done,
    /// Terminal failure
    Failed,
}

impl Stage {
    /// Get the stage name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Searching => "searching",
            Stage::ClusteringAndSignature => "clustering_and_signature",
            Stage::Filtering => "filtering",
            Stage::Escalating => "escalating",
            Stage::Extracting => "extracting",
            Stage::Done => "done",
            Stage::Failed => "failed",
        }
    }

    /// Whether the run ends in this stage
    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::Done | Stage::Failed)
    }

    /// Whether `next` is a legal successor of this stage
    pub fn can_advance_to(&self, next: Stage) -> bool {
        if self.is_terminal() {
            return false;
        }
        if next == Stage::Failed {
            return true;
        }
        matches!(
            (self, next),
            (Stage::Searching, Stage::ClusteringAndSignature)
                | (Stage::ClusteringAndSignature, Stage::Filtering)
                | (Stage::Filtering, Stage::Escalating)
                | (Stage::Filtering, Stage::Extracting)
                | (Stage::Escalating, Stage::Extracting)
                | (Stage::Extracting, Stage::Extracting)
                | (Stage::Extracting, Stage::Done)
        )
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Human-readable status emitted before a stage starts its work
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressEvent {
    /// Run this event belongs to
    pub run_id: RunId,

    /// Stage being entered
    pub stage: Stage,

    /// Status text for the user
    pub message: String,
}

impl ProgressEvent {
    /// Create a new progress event
    pub fn new(run_id: RunId, stage: Stage, message: impl Into<String>) -> Self {
        Self {
            run_id,
            stage,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_transitions() {
        let path = [
            Stage::Searching,
            Stage::ClusteringAndSignature,
            Stage::Filtering,
            Stage::Escalating,
            Stage::Extracting,
            Stage::Done,
        ];
        for pair in path.windows(2) {
            assert!(pair[0].can_advance_to(pair[1]), "{} -> {}", pair[0], pair[1]);
        }
        assert!(Stage::Filtering.can_advance_to(Stage::Extracting));
    }

    #[test]
    fn test_failed_reachable_from_any_live_stage() {
        for stage in [
            Stage::Searching,
            Stage::ClusteringAndSignature,
            Stage::Filtering,
            Stage::Escalating,
            Stage::Extracting,
        ] {
            assert!(stage.can_advance_to(Stage::Failed));
        }
        assert!(!Stage::Done.can_advance_to(Stage::Failed));
    }

    #[test]
    fn test_no_backwards_transitions() {
        assert!(!Stage::Extracting.can_advance_to(Stage::Filtering));
        assert!(!Stage::Searching.can_advance_to(Stage::Done));
    }

    #[test]
    fn test_run_id_display_is_uuid() {
        let id = RunId::new();
        assert_eq!(id.to_string().len(), 36);
    }
}
