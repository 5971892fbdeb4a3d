//! Shared pipeline setup for `identify` and `resolve`.

use crate::config::{Config, LlmBackend};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use dossier_domain::traits::{LlmProvider, WebSearch};
use dossier_llm::{GeminiProvider, OllamaProvider};
use dossier_pipeline::{Collaborators, Pipeline, PipelineEvent, RunInput};
use dossier_sources::{
    DuckDuckGoSearch, FaceCheckClient, GitHubLookup, HttpPageTextProvider, SearchNameLookup,
    SourcesConfig,
};
use std::sync::Arc;
use tracing::{debug, info};

/// Network collaborators built from configuration.
pub fn build_collaborators(sources: &SourcesConfig) -> Result<Collaborators> {
    let web: Arc<dyn WebSearch> = Arc::new(DuckDuckGoSearch::new(sources)?);
    Ok(Collaborators {
        pages: Arc::new(HttpPageTextProvider::new(sources)?),
        hosting: Arc::new(GitHubLookup::new(sources)?),
        network: Arc::new(SearchNameLookup::new(web.clone())),
        web,
    })
}

/// Run the pipeline on `input` with the configured LLM backend and print
/// progress and the final profile.
pub async fn execute_run(input: RunInput, config: &Config, formatter: &Formatter) -> Result<()> {
    let collaborators = build_collaborators(&config.sources)?;
    let model = config.llm.model.clone();
    info!(backend = ?config.llm.backend, model = %model, "Starting pipeline run");

    match config.llm.backend {
        LlmBackend::Ollama => {
            let llm = OllamaProvider::new(config.llm.endpoint.clone(), model.clone())?;
            let pipeline = Pipeline::new(collaborators, Arc::new(llm), config.pipeline.clone())?;
            stream(pipeline.with_model_name(model), input, config, formatter).await
        }
        LlmBackend::Gemini => {
            if config.llm.api_key.is_empty() {
                return Err(CliError::Config(
                    "Gemini API key missing; set DOSSIER_GEMINI_KEY or llm.api_key".to_string(),
                ));
            }
            let llm = GeminiProvider::new(config.llm.api_key.clone(), model.clone())?;
            let pipeline = Pipeline::new(collaborators, Arc::new(llm), config.pipeline.clone())?;
            stream(pipeline.with_model_name(model), input, config, formatter).await
        }
    }
}

async fn stream<L>(mut pipeline: Pipeline<L>, input: RunInput, config: &Config, formatter: &Formatter) -> Result<()>
where
    L: LlmProvider + 'static,
{
    if matches!(input, RunInput::Image(_)) {
        let face_search = FaceCheckClient::new(config.sources.facecheck.clone())?;
        pipeline = pipeline.with_face_search(Arc::new(face_search));
    }

    let mut events = Arc::new(pipeline).spawn(input);
    while let Some(event) = events.recv().await {
        debug!(terminal = event.is_terminal(), "Pipeline event");
        match event {
            PipelineEvent::Progress(progress) => eprintln!("{}", formatter.progress(&progress)),
            PipelineEvent::Done(outcome) => {
                println!("{}", formatter.format_outcome(&outcome)?);
                return Ok(());
            }
            PipelineEvent::Failed { stage, message } => {
                return Err(CliError::RunFailed {
                    stage: stage.to_string(),
                    message,
                });
            }
        }
    }

    Err(CliError::RunFailed {
        stage: "unknown".to_string(),
        message: "run ended without a result".to_string(),
    })
}
