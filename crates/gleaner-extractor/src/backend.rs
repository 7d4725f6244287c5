//! The extraction capability shared by both backends

use crate::error::ExtractorError;
use crate::heuristic::HeuristicExtractor;
use crate::types::BackendKind;
use gleaner_domain::ExtractionResult;
use std::future::Future;

/// A backend that turns note text into candidate tags and action items
///
/// Implementations hold no mutable state across calls.
pub trait ExtractionBackend {
    /// Which backend this is
    fn kind(&self) -> BackendKind;

    /// Extract candidates from text
    fn extract(
        &self,
        text: &str,
    ) -> impl Future<Output = Result<ExtractionResult, ExtractorError>> + Send;
}

impl ExtractionBackend for HeuristicExtractor {
    fn kind(&self) -> BackendKind {
        BackendKind::Rule
    }

    fn extract(
        &self,
        text: &str,
    ) -> impl Future<Output = Result<ExtractionResult, ExtractorError>> + Send {
        let result = HeuristicExtractor::extract(self, text);
        std::future::ready(Ok(result))
    }
}
