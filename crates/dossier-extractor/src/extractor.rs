//! Core Extractor implementation

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::parser::parse_profile_response;
use crate::prompt::{PromptBuilder, PROFILE_SCHEMA};
use crate::retry::RetryPolicy;
use crate::types::{AttemptFailure, ExtractionMetadata, ExtractionRequest, ExtractionResult};
use dossier_domain::traits::LlmProvider;
use dossier_domain::PersonProfile;
use std::sync::Arc;
use std::time::Instant;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// The Extractor turns confirmed evidence text into a person profile
pub struct Extractor<L>
where
    L: LlmProvider,
{
    llm_provider: Arc<L>,
    config: ExtractorConfig,
    model_name: String,
}

impl<L> Extractor<L>
where
    L: LlmProvider,
{
    /// Create a new Extractor
    pub fn new(llm_provider: L, config: ExtractorConfig) -> Self {
        Self::from_arc(Arc::new(llm_provider), config)
    }

    /// Create an Extractor around a shared provider
    pub fn from_arc(llm_provider: Arc<L>, config: ExtractorConfig) -> Self {
        Self {
            llm_provider,
            config,
            model_name: "llm".to_string(),
        }
    }

    /// Create a new Extractor with a specific model name
    pub fn with_model_name(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = model_name.into();
        self
    }

    /// Active configuration
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extract a profile, retrying failed attempts with the same prompt.
    ///
    /// `on_retry` sees every failed attempt, including the last one.
    pub async fn extract<O>(
        &self,
        request: &ExtractionRequest,
        on_retry: O,
    ) -> Result<ExtractionResult, ExtractorError>
    where
        O: FnMut(&AttemptFailure<'_>),
    {
        if request.is_empty() {
            return Err(ExtractorError::EmptyInput);
        }

        let start = Instant::now();
        let prompt = PromptBuilder::new(request)
            .with_max_text_length(self.config.max_text_length)
            .build();

        info!(
            model = %self.model_name,
            sources = request.sources.len(),
            prompt_chars = prompt.len(),
            "Starting profile extraction"
        );

        let policy = RetryPolicy::new(self.config.max_attempts);
        let prompt_ref = prompt.as_str();
        let (profile, attempts) = policy
            .run(|attempt| self.attempt(prompt_ref, attempt), on_retry)
            .await?;

        let metadata = ExtractionMetadata {
            attempts,
            model_name: self.model_name.clone(),
            source_count: request.sources.len(),
            prompt_chars: prompt.len(),
            processing_time_ms: start.elapsed().as_millis() as u64,
        };

        info!(
            attempts,
            named = profile.is_named(),
            elapsed_ms = metadata.processing_time_ms,
            "Extraction complete"
        );

        Ok(ExtractionResult { profile, metadata })
    }

    /// One call plus validation
    async fn attempt(&self, prompt: &str, attempt: u32) -> Result<PersonProfile, ExtractorError> {
        debug!(attempt, "Calling LLM");

        let response = timeout(
            self.config.call_timeout(),
            self.llm_provider.generate_structured(prompt, PROFILE_SCHEMA),
        )
        .await
        .map_err(|_| ExtractorError::Timeout(self.config.call_timeout_secs))?
        .map_err(|e| ExtractorError::Llm(e.to_string()))?;

        debug!(attempt, response_len = response.len(), "LLM responded");

        parse_profile_response(&response).inspect_err(|e| {
            warn!(attempt, error = %e, "LLM response failed validation");
        })
    }
}
