//! Configuration for the Extractor
//!
//! The fallback policy has no default: a config without one is rejected, so
//! whether LLM failures degrade to the rule backend is always a deliberate
//! choice.

use crate::error::ExtractorError;
use crate::types::{BackendKind, FallbackPolicy};
use gleaner_llm::ollama::{normalize_endpoint, DEFAULT_ENDPOINT, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default maximum input length in characters
pub const DEFAULT_MAX_TEXT_LENGTH: usize = 50_000;

/// Settings for the LLM inference endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LlmSettings {
    /// Inference endpoint address
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// Maximum time for a single inference call (seconds)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl LlmSettings {
    /// Get the request timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Configuration for extraction backend selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Backend used when a caller asks for `default`
    pub default_backend: BackendKind,

    /// What happens when the LLM backend fails
    pub fallback: FallbackPolicy,

    /// Maximum input text length (characters)
    #[serde(default = "default_max_text_length")]
    pub max_text_length: usize,

    /// LLM endpoint settings
    #[serde(default)]
    pub llm: LlmSettings,
}

impl ExtractorConfig {
    /// Create a configuration with default limits and LLM settings
    pub fn new(default_backend: BackendKind, fallback: FallbackPolicy) -> Self {
        Self {
            default_backend,
            fallback,
            max_text_length: DEFAULT_MAX_TEXT_LENGTH,
            llm: LlmSettings::default(),
        }
    }

    /// Rule backend by default; LLM errors are returned to the caller
    pub fn rule_only() -> Self {
        Self::new(BackendKind::Rule, FallbackPolicy::Propagate)
    }

    /// LLM backend by default; LLM errors fall back to the rule backend
    pub fn llm_with_fallback() -> Self {
        Self::new(BackendKind::Llm, FallbackPolicy::Rule)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ExtractorError> {
        if self.max_text_length == 0 {
            return Err(ExtractorError::Config(
                "max_text_length must be greater than 0".to_string(),
            ));
        }
        if self.llm.timeout_secs == 0 {
            return Err(ExtractorError::Config(
                "llm.timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.llm.model.trim().is_empty() {
            return Err(ExtractorError::Config("llm.model must not be empty".to_string()));
        }
        normalize_endpoint(&self.llm.endpoint)
            .map_err(|e| ExtractorError::Config(format!("llm.endpoint: {}", e)))?;
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ExtractorError> {
        toml::from_str(toml_str)
            .map_err(|e| ExtractorError::Config(format!("Failed to parse TOML: {}", e)))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, ExtractorError> {
        toml::to_string_pretty(self)
            .map_err(|e| ExtractorError::Config(format!("Failed to serialize to TOML: {}", e)))
    }

    /// Apply overrides from the process environment
    ///
    /// Recognized variables: `GLEANER_BACKEND`, `GLEANER_FALLBACK`,
    /// `GLEANER_LLM_ENDPOINT` (or `OLLAMA_HOST`), `GLEANER_LLM_MODEL`
    /// (or `OLLAMA_MODEL`), `GLEANER_LLM_TIMEOUT_SECS`.
    pub fn apply_env_overrides(&mut self) -> Result<(), ExtractorError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ExtractorError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(value) = non_empty("GLEANER_BACKEND") {
            self.default_backend = value.parse().map_err(ExtractorError::Config)?;
        }
        if let Some(value) = non_empty("GLEANER_FALLBACK") {
            self.fallback = value.parse().map_err(ExtractorError::Config)?;
        }
        if let Some(value) = non_empty("GLEANER_LLM_ENDPOINT").or_else(|| non_empty("OLLAMA_HOST")) {
            self.llm.endpoint = normalize_endpoint(&value)
                .map_err(|e| ExtractorError::Config(format!("llm.endpoint: {}", e)))?;
        }
        if let Some(value) = non_empty("GLEANER_LLM_MODEL").or_else(|| non_empty("OLLAMA_MODEL")) {
            self.llm.model = value.trim().to_string();
        }
        if let Some(value) = non_empty("GLEANER_LLM_TIMEOUT_SECS") {
            self.llm.timeout_secs = value.trim().parse().map_err(|e| {
                ExtractorError::Config(format!("Invalid GLEANER_LLM_TIMEOUT_SECS '{}': {}", value, e))
            })?;
        }
        Ok(())
    }
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_max_text_length() -> usize {
    DEFAULT_MAX_TEXT_LENGTH
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_presets_are_valid() {
        assert!(ExtractorConfig::rule_only().validate().is_ok());
        assert!(ExtractorConfig::llm_with_fallback().validate().is_ok());
    }

    #[test]
    fn test_invalid_max_text_length() {
        let mut config = ExtractorConfig::rule_only();
        config.max_text_length = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_timeout() {
        let mut config = ExtractorConfig::rule_only();
        config.llm.timeout_secs = 0;
        assert!(matches!(config.validate(), Err(ExtractorError::Config(_))));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ExtractorConfig::llm_with_fallback();
        let toml_str = config.to_toml().unwrap();
        let parsed = ExtractorConfig::from_toml(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_minimal_toml_uses_defaults() {
        let parsed = ExtractorConfig::from_toml(
            r#"
            default_backend = "llm"
            fallback = "propagate"
            "#,
        )
        .unwrap();
        assert_eq!(parsed.default_backend, BackendKind::Llm);
        assert_eq!(parsed.fallback, FallbackPolicy::Propagate);
        assert_eq!(parsed.max_text_length, DEFAULT_MAX_TEXT_LENGTH);
        assert_eq!(parsed.llm, LlmSettings::default());
    }

    #[test]
    fn test_fallback_is_required() {
        let result = ExtractorConfig::from_toml(r#"default_backend = "llm""#);
        assert!(matches!(result, Err(ExtractorError::Config(_))));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("GLEANER_BACKEND", "llm"),
            ("GLEANER_FALLBACK", "rule"),
            ("OLLAMA_HOST", "http://gpu-box:11434"),
            ("GLEANER_LLM_MODEL", "qwen2.5:7b"),
            ("OLLAMA_MODEL", "ignored"),
            ("GLEANER_LLM_TIMEOUT_SECS", "12"),
        ]
        .into_iter()
        .collect();

        let mut config = ExtractorConfig::rule_only();
        config
            .apply_overrides(|k| vars.get(k).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.default_backend, BackendKind::Llm);
        assert_eq!(config.fallback, FallbackPolicy::Rule);
        assert_eq!(config.llm.endpoint, "http://gpu-box:11434");
        assert_eq!(config.llm.model, "qwen2.5:7b");
        assert_eq!(config.llm.timeout(), Duration::from_secs(12));
    }

    #[test]
    fn test_ollama_host_without_scheme() {
        let mut config = ExtractorConfig::llm_with_fallback();
        config
            .apply_overrides(|k| (k == "OLLAMA_HOST").then(|| "127.0.0.1:11434".to_string()))
            .unwrap();
        assert_eq!(config.llm.endpoint, "http://127.0.0.1:11434");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_endpoint() {
        let mut config = ExtractorConfig::llm_with_fallback();
        config.llm.endpoint = "ftp://gpu-box:21".to_string();
        assert!(matches!(config.validate(), Err(ExtractorError::Config(_))));

        config.llm.endpoint = "  ".to_string();
        assert!(matches!(config.validate(), Err(ExtractorError::Config(_))));

        let result = config
            .apply_overrides(|k| (k == "GLEANER_LLM_ENDPOINT").then(|| "not a url".to_string()));
        assert!(matches!(result, Err(ExtractorError::Config(_))));
    }

    #[test]
    fn test_invalid_override_rejected() {
        let mut config = ExtractorConfig::rule_only();
        let result = config.apply_overrides(|k| {
            (k == "GLEANER_FALLBACK").then(|| "sometimes".to_string())
        });
        assert!(result.is_err());
        assert_eq!(config.fallback, FallbackPolicy::Propagate);
    }
}
