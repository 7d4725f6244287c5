//! Validation errors for domain values

use thiserror::Error;

/// A value violated a domain invariant
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Action item description is empty after trimming
    #[error("action item description must not be blank")]
    BlankDescription,

    /// Action item description exceeds the maximum length
    #[error("action item description too long: {len} chars (max: {max})")]
    DescriptionTooLong {
        /// Actual length in characters
        len: usize,
        /// Maximum allowed length in characters
        max: usize,
    },

    /// Tag name is empty after trimming
    #[error("tag name must not be blank")]
    BlankTagName,

    /// Tag name exceeds the maximum length
    #[error("tag name '{name}' too long: {len} chars (max: {max})")]
    TagNameTooLong {
        /// The offending name
        name: String,
        /// Actual length in characters
        len: usize,
        /// Maximum allowed length in characters
        max: usize,
    },
}
