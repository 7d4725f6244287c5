//! Backend selection types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which extraction backend a caller asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMode {
    /// Force the heuristic (rule-based) backend
    Rule,
    /// Force the LLM-backed structured backend
    Llm,
    /// Use the configured default backend
    #[default]
    Default,
}

/// A concrete extraction backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Heuristic, rule-based extractor
    Rule,
    /// LLM-backed structured extractor
    Llm,
}

/// What to do when the LLM backend fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackPolicy {
    /// Return the backend error to the caller
    Propagate,
    /// Log the failure and return the rule backend's result instead
    Rule,
}

impl ExtractionMode {
    /// The backend this mode forces, if any
    pub fn forced_backend(self) -> Option<BackendKind> {
        match self {
            ExtractionMode::Rule => Some(BackendKind::Rule),
            ExtractionMode::Llm => Some(BackendKind::Llm),
            ExtractionMode::Default => None,
        }
    }
}

impl fmt::Display for ExtractionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExtractionMode::Rule => "rule",
            ExtractionMode::Llm => "llm",
            ExtractionMode::Default => "default",
        })
    }
}

impl FromStr for ExtractionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rule" => Ok(ExtractionMode::Rule),
            "llm" => Ok(ExtractionMode::Llm),
            "default" | "" => Ok(ExtractionMode::Default),
            other => Err(format!(
                "Unknown extraction mode '{}' (expected rule, llm or default)",
                other
            )),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BackendKind::Rule => "rule",
            BackendKind::Llm => "llm",
        })
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rule" => Ok(BackendKind::Rule),
            "llm" => Ok(BackendKind::Llm),
            other => Err(format!("Unknown backend '{}' (expected rule or llm)", other)),
        }
    }
}

impl fmt::Display for FallbackPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FallbackPolicy::Propagate => "propagate",
            FallbackPolicy::Rule => "rule",
        })
    }
}

impl FromStr for FallbackPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "propagate" => Ok(FallbackPolicy::Propagate),
            "rule" => Ok(FallbackPolicy::Rule),
            other => Err(format!(
                "Unknown fallback policy '{}' (expected propagate or rule)",
                other
            )),
        }
    }
}
