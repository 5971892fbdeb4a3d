//! Progress reporting for a run

use crate::error::PipelineError;
use crate::outcome::RunOutcome;
use dossier_domain::{ProgressEvent, RunId, Stage};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{info, warn};

/// Everything a run tells its observer
#[derive(Debug, Clone)]
pub enum PipelineEvent {
    /// A stage is about to start its work
    Progress(ProgressEvent),

    /// The run finished with a profile
    Done(Box<RunOutcome>),

    /// The run ended in failure
    Failed {
        /// Stage the failure belongs to
        stage: Stage,
        /// Failure text
        message: String,
    },
}

impl PipelineEvent {
    /// Whether no further events follow this one
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PipelineEvent::Progress(_))
    }
}

/// Stage tracker that logs every transition and forwards it to an optional
/// channel
///
/// A closed channel is not an error; the run carries on unobserved.
#[derive(Debug)]
pub struct ProgressSink {
    run_id: RunId,
    stage: Stage,
    started: bool,
    tx: Option<UnboundedSender<PipelineEvent>>,
}

impl ProgressSink {
    /// Sink that forwards events to `tx`
    pub fn new(tx: UnboundedSender<PipelineEvent>) -> Self {
        Self {
            run_id: RunId::new(),
            stage: Stage::Searching,
            started: false,
            tx: Some(tx),
        }
    }

    /// Sink that only logs
    pub fn silent() -> Self {
        Self {
            run_id: RunId::new(),
            stage: Stage::Searching,
            started: false,
            tx: None,
        }
    }

    /// Run this sink reports for
    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    /// Current stage
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Announce `stage` before its work starts
    pub fn advance(&mut self, stage: Stage, message: impl Into<String>) {
        let message = message.into();
        // a run may start at any stage
        if self.started && !self.stage.can_advance_to(stage) {
            warn!(run_id = %self.run_id, from = %self.stage, to = %stage, "Unexpected stage transition");
        }
        self.stage = stage;
        self.started = true;
        info!(run_id = %self.run_id, stage = %stage, "{}", message);
        self.send(PipelineEvent::Progress(ProgressEvent::new(self.run_id, stage, message)));
    }

    pub(crate) fn finish(&mut self, outcome: &RunOutcome) {
        self.stage = Stage::Done;
        info!(run_id = %self.run_id, named = outcome.profile.is_named(), "Run complete");
        self.send(PipelineEvent::Done(Box::new(outcome.clone())));
    }

    pub(crate) fn fail(&mut self, error: &PipelineError) {
        let stage = error.stage();
        self.stage = Stage::Failed;
        warn!(run_id = %self.run_id, stage = %stage, error = %error, "Run failed");
        self.send(PipelineEvent::Failed {
            stage,
            message: error.to_string(),
        });
    }

    fn send(&self, event: PipelineEvent) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(event);
        }
    }
}
