//! Request-scoped generation pipeline.
//!
//! A request moves through validation, the upstream call and normalization.
//! Upstream failures, timeouts and empty replies are absorbed into a
//! templated fallback sentence; validation and configuration errors are
//! returned to the caller.

use chrono::{Datelike, Local};
use moodcaster_core::{
    CastPrompt, GenerationRequest, GenerationResult, SamplingProfile, fallback_text, normalize_cast,
};
use moodcaster_error::{GenerationError, GenerationErrorKind};
use moodcaster_models::ChatBackend;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Message returned when no upstream credential is configured.
pub const MISSING_API_KEY: &str = "Missing GROQ_API_KEY";

/// Runs one generation against an optional upstream backend.
#[derive(Clone)]
pub struct GenerationPipeline {
    backend: Option<Arc<dyn ChatBackend>>,
    timeout: Duration,
}

impl GenerationPipeline {
    /// Creates a pipeline. `backend` is `None` when no credential is configured.
    pub fn new(backend: Option<Arc<dyn ChatBackend>>, timeout: Duration) -> Self {
        Self { backend, timeout }
    }

    /// Model name of the configured backend, if any.
    pub fn model_name(&self) -> Option<&str> {
        self.backend.as_deref().map(|backend| backend.model_name())
    }

    /// Produces cast text for a request.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for a blank mood or category and `Configuration`
    /// when no backend is available. Upstream failures never surface here.
    #[instrument(
        skip(self, request),
        fields(mood = %request.mood, category = %request.category, diverse = request.diverse)
    )]
    pub async fn run(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResult, GenerationError> {
        request.validate()?;

        let backend = self.backend.as_ref().ok_or_else(|| {
            GenerationError::new(GenerationErrorKind::Configuration(
                MISSING_API_KEY.to_string(),
            ))
        })?;

        match self.call_upstream(backend.as_ref(), request).await {
            Ok(text) => {
                info!(chars = text.chars().count(), "Served generated text");
                Ok(GenerationResult::generated(text))
            }
            Err(err) if err.kind().is_degradable() => {
                warn!(error = %err.kind(), "Serving fallback text");
                let text = fallback_text(
                    &request.mood,
                    &request.category,
                    request.diverse,
                    &mut rand::thread_rng(),
                );
                Ok(GenerationResult::fallback(text, err.kind().to_string()))
            }
            Err(err) => Err(err),
        }
    }

    async fn call_upstream(
        &self,
        backend: &dyn ChatBackend,
        request: &GenerationRequest,
    ) -> Result<String, GenerationError> {
        let weekday = Local::now().weekday();
        let prompt = CastPrompt::for_request(request, &mut rand::thread_rng(), weekday);
        let sampling = SamplingProfile::for_request(request);

        debug!(
            model = backend.model_name(),
            timeout_ms = self.timeout.as_millis() as u64,
            "Calling upstream"
        );

        let reply = match tokio::time::timeout(self.timeout, backend.generate(&prompt, &sampling))
            .await
        {
            Ok(reply) => reply?,
            Err(_) => {
                return Err(GenerationError::new(GenerationErrorKind::Timeout(
                    self.timeout.as_millis() as u64,
                )));
            }
        };

        let text = normalize_cast(&reply.text());
        if text.is_empty() {
            return Err(GenerationError::new(GenerationErrorKind::EmptyResult));
        }
        Ok(text)
    }
}

impl std::fmt::Debug for GenerationPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationPipeline")
            .field("model", &self.model_name())
            .field("timeout", &self.timeout)
            .finish()
    }
}
