//! Gleaner LLM Provider Layer
//!
//! Implementations of the `LlmProvider` trait from `gleaner-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `OllamaProvider`: Local Ollama API integration
//!
//! # Examples
//!
//! ```
//! use gleaner_llm::MockProvider;
//! use gleaner_domain::traits::LlmProvider;
//!
//! let provider = MockProvider::new(r#"{"tags": [], "action_items": []}"#);
//! let result = provider.generate("system", "test prompt").unwrap();
//! assert_eq!(result, r#"{"tags": [], "action_items": []}"#);
//! ```

#![warn(missing_docs)]

pub mod ollama;

use gleaner_domain::traits::LlmProvider as LlmProviderTrait;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use thiserror::Error;

pub use ollama::OllamaProvider;

/// Errors that can occur during LLM operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LlmError {
    /// The inference endpoint refused the connection or could not be reached
    #[error("Endpoint unavailable: {0}")]
    Unavailable(String),

    /// No response within the configured timeout
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Response body could not be decoded
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Model not available on the endpoint
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// The request could not be built (bad schema, bad endpoint URL)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Other network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),
}

/// A request as seen by [`MockProvider`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    /// System instruction
    pub system: String,
    /// User prompt
    pub prompt: String,
    /// JSON schema, for structured requests
    pub schema: Option<String>,
}

/// Mock LLM provider for deterministic testing
///
/// Returns one pre-configured response without making any network calls.
///
/// # Examples
///
/// ```
/// use gleaner_llm::{LlmError, MockProvider};
/// use gleaner_domain::traits::LlmProvider;
///
/// let provider = MockProvider::new("response1");
/// assert_eq!(provider.generate("sys", "prompt1").unwrap(), "response1");
/// assert_eq!(provider.call_count(), 1);
///
/// let failing = MockProvider::failing(LlmError::Unavailable("down".into()));
/// assert!(failing.generate("sys", "anything").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    response: String,
    failure: Option<LlmError>,
    delay: Option<Duration>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            failure: None,
            delay: None,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a MockProvider whose every call fails with `error`
    pub fn failing(error: LlmError) -> Self {
        Self {
            failure: Some(error),
            ..Self::default()
        }
    }

    /// Sleep for `delay` before answering each call
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Get the number of times the provider was called
    pub fn call_count(&self) -> usize {
        lock(&self.requests).len()
    }

    /// The most recent request, if any
    pub fn last_request(&self) -> Option<RecordedRequest> {
        lock(&self.requests).last().cloned()
    }

    fn respond(&self, request: RecordedRequest) -> Result<String, LlmError> {
        lock(&self.requests).push(request);

        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }

        Ok(self.response.clone())
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new(r#"{"tags": [], "action_items": []}"#)
    }
}

impl LlmProviderTrait for MockProvider {
    type Error = LlmError;

    fn generate(&self, system: &str, prompt: &str) -> Result<String, Self::Error> {
        self.respond(RecordedRequest {
            system: system.to_string(),
            prompt: prompt.to_string(),
            schema: None,
        })
    }

    fn generate_structured(
        &self,
        system: &str,
        prompt: &str,
        schema: &str,
    ) -> Result<String, Self::Error> {
        self.respond(RecordedRequest {
            system: system.to_string(),
            prompt: prompt.to_string(),
            schema: Some(schema.to_string()),
        })
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}

// Poisoned locks are recovered: the mock holds no invariants across calls.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
