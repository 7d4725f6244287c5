//! Error types for the Extractor

use gleaner_llm::LlmError;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during extraction
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractorError {
    /// Input rejected before any backend ran
    #[error("Validation error: {0}")]
    Validation(String),

    /// Inference endpoint refused the connection or was unreachable
    #[error("Extraction backend unavailable: {0}")]
    BackendUnavailable(String),

    /// Inference endpoint did not answer within the timeout
    #[error("Extraction backend timed out after {0:?}")]
    BackendTimeout(Duration),

    /// Response was not valid JSON or did not match the expected shape
    #[error("Extraction parse error: {0}")]
    Parse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ExtractorError {
    /// Whether this error came from the LLM backend
    ///
    /// Only these errors are subject to the configured fallback policy.
    pub fn is_backend_failure(&self) -> bool {
        matches!(
            self,
            ExtractorError::BackendUnavailable(_)
                | ExtractorError::BackendTimeout(_)
                | ExtractorError::Parse(_)
        )
    }
}

impl From<LlmError> for ExtractorError {
    fn from(e: LlmError) -> Self {
        match e {
            LlmError::Unavailable(msg) => ExtractorError::BackendUnavailable(msg),
            LlmError::Timeout(after) => ExtractorError::BackendTimeout(after),
            LlmError::InvalidResponse(msg) => ExtractorError::Parse(msg),
            LlmError::ModelNotAvailable(model) => {
                ExtractorError::BackendUnavailable(format!("model '{}' not available", model))
            }
            LlmError::Communication(msg) => ExtractorError::BackendUnavailable(msg),
            LlmError::InvalidRequest(msg) => ExtractorError::Config(msg),
        }
    }
}

impl From<serde_json::Error> for ExtractorError {
    fn from(e: serde_json::Error) -> Self {
        ExtractorError::Parse(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_llm_error_mapping() {
        assert!(matches!(
            ExtractorError::from(LlmError::Unavailable("refused".into())),
            ExtractorError::BackendUnavailable(_)
        ));
        assert_eq!(
            ExtractorError::from(LlmError::Timeout(Duration::from_secs(3))),
            ExtractorError::BackendTimeout(Duration::from_secs(3))
        );
        assert!(matches!(
            ExtractorError::from(LlmError::InvalidResponse("eof".into())),
            ExtractorError::Parse(_)
        ));
        assert!(matches!(
            ExtractorError::from(LlmError::InvalidRequest("bad url".into())),
            ExtractorError::Config(_)
        ));
    }

    #[test]
    fn test_backend_failure_classification() {
        assert!(ExtractorError::Parse("x".into()).is_backend_failure());
        assert!(ExtractorError::BackendTimeout(Duration::from_secs(1)).is_backend_failure());
        assert!(!ExtractorError::Validation("x".into()).is_backend_failure());
        assert!(!ExtractorError::Config("x".into()).is_backend_failure());
    }
}
