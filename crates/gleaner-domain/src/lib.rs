//! Gleaner Domain Layer
//!
//! Core data model for the note extraction pipeline. This crate performs no
//! I/O; storage and inference live behind the traits in [`traits`].
//!
//! ## Key Concepts
//!
//! - **Note**: free-form text owned by the surrounding application
//! - **Tag**: a label whose name is unique under case-folding
//! - **Action item**: a short task description, optionally tied to a note
//! - **Extraction result**: ephemeral candidate tags and action items
//! - **Applied summary**: what an apply call actually created or attached
//!
//! ## Architecture
//!
//! - Only `uuid` (identifiers) and `thiserror` (validation errors) as dependencies
//! - Deduplication rules shared by every extraction backend live on
//!   [`ExtractionResult`]
//! - Infrastructure implementations live in other crates

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod action_item;
pub mod error;
pub mod extraction;
pub mod ids;
pub mod note;
pub mod tag;
pub mod traits;

// Re-exports for convenience
pub use action_item::{ActionItem, MAX_DESCRIPTION_CHARS};
pub use error::ValidationError;
pub use extraction::{AppliedExtractionSummary, ExtractionResult};
pub use ids::{ActionItemId, NoteId, TagId};
pub use note::Note;
pub use tag::{Tag, MAX_TAG_NAME_CHARS};
