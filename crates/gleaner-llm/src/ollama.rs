//! Ollama Provider Implementation
//!
//! Integration with Ollama's local chat API.
//!
//! # Features
//!
//! - Async HTTP communication with the `/api/chat` endpoint
//! - Structured output via the `format` field (JSON schema)
//! - Per-request timeout, surfaced as [`LlmError::Timeout`]
//! - Connection failures surfaced as [`LlmError::Unavailable`]
//!
//! Requests are never retried here; retry and fallback belong to callers.
//!
//! # Examples
//!
//! ```no_run
//! use gleaner_llm::OllamaProvider;
//!
//! let provider = OllamaProvider::new("http://localhost:11434", "llama3.1:8b").unwrap();
//! ```

use crate::LlmError;
use gleaner_domain::traits::LlmProvider as LlmProviderTrait;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Default Ollama API endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Default model
pub const DEFAULT_MODEL: &str = "llama3.1:8b";

/// Default timeout for LLM requests (30 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Ollama API provider for local LLM inference
#[derive(Debug, Clone)]
pub struct OllamaProvider {
    endpoint: String,
    model: String,
    client: reqwest::Client,
    timeout: Duration,
}

/// Request body for the Ollama chat API
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<serde_json::Value>,
    options: ChatOptions,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatOptions {
    temperature: f32,
}

/// Response from the Ollama chat API
#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

/// Normalize an Ollama endpoint into an absolute http(s) base URL
///
/// Accepts the `OLLAMA_HOST` form (`127.0.0.1:11434`) by assuming `http`.
/// Trailing slashes are dropped.
///
/// # Examples
///
/// ```
/// use gleaner_llm::ollama::normalize_endpoint;
///
/// assert_eq!(normalize_endpoint("127.0.0.1:11434").unwrap(), "http://127.0.0.1:11434");
/// assert_eq!(normalize_endpoint("https://gpu-box/").unwrap(), "https://gpu-box");
/// assert!(normalize_endpoint("ftp://gpu-box").is_err());
/// ```
pub fn normalize_endpoint(raw: &str) -> Result<String, LlmError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(LlmError::InvalidRequest("endpoint must not be empty".to_string()));
    }
    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    };

    let url = reqwest::Url::parse(&candidate)
        .map_err(|e| LlmError::InvalidRequest(format!("invalid endpoint '{}': {}", raw.trim(), e)))?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(LlmError::InvalidRequest(format!(
            "endpoint '{}' must be an http or https URL",
            raw.trim()
        )));
    }
    Ok(candidate)
}

impl OllamaProvider {
    /// Create a new Ollama provider
    ///
    /// # Parameters
    ///
    /// - `endpoint`: Ollama API endpoint (e.g., "http://localhost:11434").
    ///   A bare `host:port` is read as `http://host:port`.
    /// - `model`: Model to use (e.g., "llama3.1:8b")
    ///
    /// No connection is made until the first request. An endpoint that is
    /// not an http(s) URL is rejected with [`LlmError::InvalidRequest`].
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| LlmError::InvalidRequest(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: normalize_endpoint(&endpoint.into())?,
            model: model.into(),
            client,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Create a new Ollama provider against `http://localhost:11434`
    pub fn default_endpoint(model: impl Into<String>) -> Result<Self, LlmError> {
        Self::new(DEFAULT_ENDPOINT, model)
    }

    /// Set the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The configured endpoint
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// The configured per-request timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Send one chat request and return the assistant message content
    ///
    /// # Errors
    ///
    /// - [`LlmError::Unavailable`] if Ollama is not running or unreachable
    /// - [`LlmError::Timeout`] if no response arrives within the timeout
    /// - [`LlmError::ModelNotAvailable`] if the model is not pulled
    /// - [`LlmError::InvalidResponse`] if the body is not a chat response
    pub async fn chat(
        &self,
        system: &str,
        prompt: &str,
        format: Option<serde_json::Value>,
    ) -> Result<String, LlmError> {
        let started = Instant::now();
        let url = format!("{}/api/chat", self.endpoint);

        let mut messages = Vec::with_capacity(2);
        if !system.is_empty() {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: prompt,
        });

        let request = ChatRequest {
            model: &self.model,
            messages,
            stream: false,
            format,
            options: ChatOptions { temperature: 0.0 },
        };

        debug!(
            model = %self.model,
            structured = request.format.is_some(),
            "Sending chat request"
        );

        let response = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(LlmError::ModelNotAvailable(self.model.clone()));
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            warn!(status = %status, "Ollama returned an error status");
            return Err(LlmError::Communication(format!("HTTP {}: {}", status, body)));
        }

        let body: ChatResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                LlmError::Timeout(self.timeout)
            } else {
                LlmError::InvalidResponse(format!("Failed to parse response: {}", e))
            }
        })?;

        debug!(
            response_len = body.message.content.len(),
            duration_ms = started.elapsed().as_millis() as u64,
            "Chat request complete"
        );

        Ok(body.message.content)
    }

    fn classify(&self, error: reqwest::Error) -> LlmError {
        if error.is_timeout() {
            LlmError::Timeout(self.timeout)
        } else if error.is_connect() {
            LlmError::Unavailable(format!("{}: {}", self.endpoint, error))
        } else if error.is_builder() {
            LlmError::InvalidRequest(error.to_string())
        } else {
            LlmError::Communication(format!("Request failed: {}", error))
        }
    }
}

impl LlmProviderTrait for OllamaProvider {
    type Error = LlmError;

    fn generate(&self, system: &str, prompt: &str) -> Result<String, Self::Error> {
        run_blocking(self.chat(system, prompt, None))?
    }

    fn generate_structured(
        &self,
        system: &str,
        prompt: &str,
        schema: &str,
    ) -> Result<String, Self::Error> {
        let format: serde_json::Value = serde_json::from_str(schema)
            .map_err(|e| LlmError::InvalidRequest(format!("Schema is not valid JSON: {}", e)))?;
        run_blocking(self.chat(system, prompt, Some(format)))?
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Drive a future to completion from synchronous code.
///
/// Inside a tokio runtime this must be called from a blocking thread
/// (`spawn_blocking`), never directly from an async task.
fn run_blocking<F: Future>(future: F) -> Result<F::Output, LlmError> {
    if let Ok(handle) = tokio::runtime::Handle::try_current() {
        return Ok(handle.block_on(future));
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| LlmError::Communication(format!("Failed to start runtime: {}", e)))?;
    Ok(runtime.block_on(future))
}
