//! Backend selection and fallback policy

use crate::backend::ExtractionBackend;
use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::heuristic::HeuristicExtractor;
use crate::structured::StructuredExtractor;
use crate::types::{BackendKind, ExtractionMode, FallbackPolicy};
use gleaner_domain::traits::LlmProvider;
use gleaner_domain::ExtractionResult;
use gleaner_llm::{LlmError, OllamaProvider};
use tracing::{debug, info, warn};

/// Chooses a backend per call and applies the configured fallback policy
///
/// Holds no mutable state: the default backend and the fallback policy are
/// fixed when the orchestrator is built. It never touches storage.
pub struct ExtractionOrchestrator<L> {
    config: ExtractorConfig,
    heuristic: HeuristicExtractor,
    structured: StructuredExtractor<L>,
}

impl ExtractionOrchestrator<OllamaProvider> {
    /// Build an orchestrator talking to the Ollama endpoint in `config.llm`
    pub fn with_ollama(config: ExtractorConfig) -> Result<Self, ExtractorError> {
        config.validate()?;
        let provider = OllamaProvider::new(&config.llm.endpoint, &config.llm.model)?
            .with_timeout(config.llm.timeout());
        Self::new(config, provider)
    }
}

impl<L> ExtractionOrchestrator<L>
where
    L: LlmProvider<Error = LlmError> + Send + Sync + 'static,
{
    /// Create an orchestrator over the given LLM provider
    pub fn new(config: ExtractorConfig, provider: L) -> Result<Self, ExtractorError> {
        config.validate()?;
        let structured = StructuredExtractor::new(provider).with_timeout(config.llm.timeout());
        Ok(Self {
            config,
            heuristic: HeuristicExtractor::new(),
            structured,
        })
    }

    /// Replace the rule backend, e.g. to use a custom verb set
    pub fn with_heuristic(mut self, heuristic: HeuristicExtractor) -> Self {
        self.heuristic = heuristic;
        self
    }

    /// The active configuration
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// The backend a mode resolves to
    pub fn resolve_backend(&self, mode: ExtractionMode) -> BackendKind {
        mode.forced_backend()
            .unwrap_or(self.config.default_backend)
    }

    /// Extract tags and action items from text
    ///
    /// Text longer than `max_text_length` characters is rejected. Blank text
    /// yields an empty result. LLM backend failures are returned or replaced
    /// by the rule backend's result, according to the fallback policy.
    pub async fn extract(
        &self,
        text: &str,
        mode: ExtractionMode,
    ) -> Result<ExtractionResult, ExtractorError> {
        let len = text.chars().count();
        if len > self.config.max_text_length {
            return Err(ExtractorError::Validation(format!(
                "Text length {} exceeds maximum {}",
                len, self.config.max_text_length
            )));
        }

        let backend = self.resolve_backend(mode);
        debug!(%mode, %backend, text_len = len, "Starting extraction");

        match backend {
            BackendKind::Rule => run(&self.heuristic, text).await,
            BackendKind::Llm => match run(&self.structured, text).await {
                Ok(result) => Ok(result),
                Err(e) if e.is_backend_failure() => self.fall_back(text, e).await,
                Err(e) => Err(e),
            },
        }
    }

    async fn fall_back(
        &self,
        text: &str,
        error: ExtractorError,
    ) -> Result<ExtractionResult, ExtractorError> {
        match self.config.fallback {
            FallbackPolicy::Propagate => Err(error),
            FallbackPolicy::Rule => {
                warn!(error = %error, "LLM extraction failed, falling back to rule backend");
                run(&self.heuristic, text).await
            }
        }
    }
}

async fn run<B: ExtractionBackend>(
    backend: &B,
    text: &str,
) -> Result<ExtractionResult, ExtractorError> {
    let result = backend.extract(text).await?;
    info!(
        backend = %backend.kind(),
        tags = result.tags.len(),
        action_items = result.action_items.len(),
        "Extraction complete"
    );
    Ok(result)
}
