//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use crate::{ActionItem, AppliedExtractionSummary, ExtractionResult, Note, NoteId, Tag};

/// Trait for storing notes and applying extraction results
///
/// Implemented by the infrastructure layer (gleaner-store)
pub trait NoteStore {
    /// Error type for store operations
    type Error;

    /// Create a note and return it
    fn create_note(&mut self, title: &str, content: &str) -> Result<Note, Self::Error>;

    /// Get a note, with its attached tags, by ID
    fn get_note(&self, id: NoteId) -> Result<Option<Note>, Self::Error>;

    /// Tags attached to a note, ordered by name
    fn note_tags(&self, id: NoteId) -> Result<Vec<Tag>, Self::Error>;

    /// Action items associated with a note, oldest first
    fn note_action_items(&self, id: NoteId) -> Result<Vec<ActionItem>, Self::Error>;

    /// Every known tag, ordered by name
    fn list_tags(&self) -> Result<Vec<Tag>, Self::Error>;

    /// Persist an extraction result against a note as one atomic unit
    fn apply_extraction(
        &mut self,
        note_id: NoteId,
        result: &ExtractionResult,
    ) -> Result<AppliedExtractionSummary, Self::Error>;
}

/// Trait for LLM provider operations
///
/// Implemented by the infrastructure layer (gleaner-llm). Calls are
/// blocking; async callers are expected to move them off the runtime.
pub trait LlmProvider {
    /// Error type for LLM operations
    type Error;

    /// Generate a completion from a system instruction and a user prompt
    fn generate(&self, system: &str, prompt: &str) -> Result<String, Self::Error>;

    /// Generate a completion constrained to the given JSON schema
    fn generate_structured(
        &self,
        system: &str,
        prompt: &str,
        schema: &str,
    ) -> Result<String, Self::Error>;

    /// Identifier of the model behind this provider
    fn model_name(&self) -> &str;
}
