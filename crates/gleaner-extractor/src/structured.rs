//! LLM-backed structured extraction

use crate::backend::ExtractionBackend;
use crate::error::ExtractorError;
use crate::parser::parse_llm_response;
use crate::prompt::PromptBuilder;
use crate::types::BackendKind;
use gleaner_domain::traits::LlmProvider;
use gleaner_domain::ExtractionResult;
use gleaner_llm::ollama::DEFAULT_TIMEOUT_SECS;
use gleaner_llm::LlmError;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info};

/// Extracts tags and action items by asking an LLM for a JSON object
///
/// One request per call, bounded by the configured timeout. Failures are
/// returned as typed errors and never retried here.
pub struct StructuredExtractor<L> {
    provider: Arc<L>,
    timeout: Duration,
}

impl<L> Clone for StructuredExtractor<L> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
            timeout: self.timeout,
        }
    }
}

impl<L> StructuredExtractor<L>
where
    L: LlmProvider<Error = LlmError> + Send + Sync + 'static,
{
    /// Create a structured extractor with the default timeout
    pub fn new(provider: L) -> Self {
        Self::from_arc(Arc::new(provider))
    }

    /// Create a structured extractor sharing an existing provider
    pub fn from_arc(provider: Arc<L>) -> Self {
        Self {
            provider,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Set the per-call timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The per-call timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Model behind the provider
    pub fn model_name(&self) -> &str {
        self.provider.model_name()
    }

    /// Extract candidates from text
    ///
    /// Blank text yields an empty result without contacting the model.
    pub async fn extract(&self, text: &str) -> Result<ExtractionResult, ExtractorError> {
        if text.trim().is_empty() {
            return Ok(ExtractionResult::default());
        }

        let builder = PromptBuilder::new(text);
        let prompt = builder.build();
        let system = builder.system();
        let schema = PromptBuilder::response_schema().to_string();

        debug!(
            model = self.model_name(),
            prompt_len = prompt.len(),
            "Sending structured extraction request"
        );

        let response = timeout(self.timeout, self.call_llm(system, prompt, schema))
            .await
            .map_err(|_| ExtractorError::BackendTimeout(self.timeout))??;

        debug!(response_len = response.len(), "Received LLM response");

        let result = parse_llm_response(&response)?;
        info!(
            tags = result.tags.len(),
            action_items = result.action_items.len(),
            "Structured extraction complete"
        );
        Ok(result)
    }

    /// Run the blocking provider call off the async runtime
    async fn call_llm(
        &self,
        system: &'static str,
        prompt: String,
        schema: String,
    ) -> Result<String, ExtractorError> {
        let provider = Arc::clone(&self.provider);

        tokio::task::spawn_blocking(move || {
            provider
                .generate_structured(system, &prompt, &schema)
                .map_err(ExtractorError::from)
        })
        .await
        .map_err(|e| ExtractorError::BackendUnavailable(format!("Task join error: {}", e)))?
    }
}

impl<L> ExtractionBackend for StructuredExtractor<L>
where
    L: LlmProvider<Error = LlmError> + Send + Sync + 'static,
{
    fn kind(&self) -> BackendKind {
        BackendKind::Llm
    }

    fn extract(
        &self,
        text: &str,
    ) -> impl Future<Output = Result<ExtractionResult, ExtractorError>> + Send {
        StructuredExtractor::extract(self, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gleaner_llm::MockProvider;

    #[tokio::test]
    async fn test_structured_extraction() {
        let provider = MockProvider::new(
            r#"{"tags": ["errands"], "action_items": ["- Buy milk", "call mom"]}"#,
        );
        let extractor = StructuredExtractor::new(provider);

        let result = extractor.extract("whatever").await.unwrap();
        assert_eq!(result.tags, vec!["errands"]);
        assert_eq!(result.action_items, vec!["Buy milk", "call mom"]);
    }

    #[tokio::test]
    async fn test_request_carries_text_and_schema() {
        let provider = Arc::new(MockProvider::default());
        let extractor = StructuredExtractor::from_arc(Arc::clone(&provider));

        extractor.extract("Fix the roof #house").await.unwrap();

        let request = provider.last_request().unwrap();
        assert!(request.prompt.contains("Fix the roof #house"));
        assert!(request.schema.unwrap().contains("action_items"));
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_blank_text_skips_provider() {
        let provider = Arc::new(MockProvider::default());
        let extractor = StructuredExtractor::from_arc(Arc::clone(&provider));

        assert!(extractor.extract("  \n ").await.unwrap().is_empty());
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_unavailable() {
        let extractor =
            StructuredExtractor::new(MockProvider::failing(LlmError::Unavailable("refused".into())));
        assert!(matches!(
            extractor.extract("text").await,
            Err(ExtractorError::BackendUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_timeout() {
        let provider = MockProvider::default().with_delay(Duration::from_millis(500));
        let extractor =
            StructuredExtractor::new(provider).with_timeout(Duration::from_millis(20));

        assert_eq!(
            extractor.extract("text").await,
            Err(ExtractorError::BackendTimeout(Duration::from_millis(20)))
        );
    }

    #[tokio::test]
    async fn test_malformed_response() {
        let extractor = StructuredExtractor::new(MockProvider::new("Sure! Here are your tasks:"));
        assert!(matches!(
            extractor.extract("text").await,
            Err(ExtractorError::Parse(_))
        ));
    }
}
