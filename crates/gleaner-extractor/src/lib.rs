//! Gleaner Extractor
//!
//! Turns free-form note text into candidate tags and action items.
//!
//! # Architecture
//!
//! ```text
//!                      ┌─ rule ─→ HeuristicExtractor ──────────────┐
//! text → Orchestrator ─┤                                           ├→ ExtractionResult
//!                      └─ llm ──→ StructuredExtractor → LLM → parse┘
//!                                   (on failure: fallback policy)
//! ```
//!
//! Extraction never touches storage. Persisting a result is a separate,
//! transactional step (see `gleaner-store`), so no database lock is held
//! across the slow model call.
//!
//! # Example Usage
//!
//! ```
//! use gleaner_extractor::{ExtractionMode, ExtractionOrchestrator, ExtractorConfig};
//! use gleaner_llm::MockProvider;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let orchestrator =
//!     ExtractionOrchestrator::new(ExtractorConfig::rule_only(), MockProvider::default())?;
//!
//! let result = orchestrator
//!     .extract("- [ ] Buy milk\nTODO: call mom\nMeeting notes #errands", ExtractionMode::Default)
//!     .await?;
//!
//! assert_eq!(result.tags, vec!["errands"]);
//! assert_eq!(result.action_items, vec!["Buy milk", "call mom"]);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod backend;
mod config;
mod error;
mod heuristic;
mod normalize;
mod orchestrator;
mod parser;
mod prompt;
mod structured;
mod types;


pub use backend::ExtractionBackend;
pub use config::{ExtractorConfig, LlmSettings, DEFAULT_MAX_TEXT_LENGTH};
pub use error::ExtractorError;
pub use heuristic::{strip_markers, HeuristicExtractor, LineMarker, DEFAULT_IMPERATIVE_VERBS};
pub use normalize::{normalize, scan_tag_tokens, NormalizedText};
pub use orchestrator::ExtractionOrchestrator;
pub use parser::parse_llm_response;
pub use prompt::PromptBuilder;
pub use structured::StructuredExtractor;
pub use types::{BackendKind, ExtractionMode, FallbackPolicy};

pub use gleaner_domain::ExtractionResult;
