//! Action item module

use crate::error::ValidationError;
use crate::ids::{ActionItemId, NoteId};

/// Maximum action item description length in characters
pub const MAX_DESCRIPTION_CHARS: usize = 1000;

/// A task extracted from, or associated with, a note
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionItem {
    /// Unique identifier
    pub id: ActionItemId,

    /// What needs doing (1-1000 chars, never blank)
    pub description: String,

    /// Whether the item has been completed
    pub completed: bool,

    /// When this item was created (unix seconds)
    pub created_at: u64,

    /// Note this item was extracted from, if any
    pub note_id: Option<NoteId>,
}

/// Validate an action item description, returning the trimmed text
///
/// Length is measured in characters, not bytes.
///
/// # Examples
///
/// ```
/// use gleaner_domain::action_item::validate_description;
///
/// assert_eq!(validate_description("  Buy milk ").unwrap(), "Buy milk");
/// assert!(validate_description("   ").is_err());
/// ```
pub fn validate_description(description: &str) -> Result<String, ValidationError> {
    let trimmed = description.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::BlankDescription);
    }
    let len = trimmed.chars().count();
    if len > MAX_DESCRIPTION_CHARS {
        return Err(ValidationError::DescriptionTooLong {
            len,
            max: MAX_DESCRIPTION_CHARS,
        });
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_description_rejected() {
        assert_eq!(validate_description(""), Err(ValidationError::BlankDescription));
        assert_eq!(validate_description("\t \n"), Err(ValidationError::BlankDescription));
    }

    #[test]
    fn test_length_limit_is_inclusive() {
        let exact = "a".repeat(MAX_DESCRIPTION_CHARS);
        assert!(validate_description(&exact).is_ok());

        let over = "a".repeat(MAX_DESCRIPTION_CHARS + 1);
        assert_eq!(
            validate_description(&over),
            Err(ValidationError::DescriptionTooLong { len: 1001, max: 1000 })
        );
    }

    #[test]
    fn test_length_counts_chars_not_bytes() {
        // 1000 three-byte characters is still within the limit
        let wide = "界".repeat(MAX_DESCRIPTION_CHARS);
        assert!(validate_description(&wide).is_ok());
    }

    #[test]
    fn test_surrounding_whitespace_not_counted() {
        let padded = format!("   {}   ", "b".repeat(MAX_DESCRIPTION_CHARS));
        assert!(validate_description(&padded).is_ok());
    }
}
