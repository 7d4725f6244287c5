//! Tag module

use crate::error::ValidationError;
use crate::ids::TagId;

/// Maximum tag name length in characters
pub const MAX_TAG_NAME_CHARS: usize = 50;

/// A label attached to notes
///
/// Names are unique under case-folding: "Rust" and "rust" are the same tag.
/// The first-seen casing is the one that is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// Unique identifier
    pub id: TagId,

    /// Display name, as first written
    pub name: String,

    /// When this tag was created (unix seconds)
    pub created_at: u64,
}

impl Tag {
    /// Case-folded key used for uniqueness checks
    pub fn key(&self) -> String {
        fold_tag_name(&self.name)
    }
}

/// Clean a raw tag candidate: trim and strip leading `#` markers
///
/// Returns `None` when nothing remains.
///
/// # Examples
///
/// ```
/// use gleaner_domain::tag::clean_tag_name;
///
/// assert_eq!(clean_tag_name("  #errands "), Some("errands".to_string()));
/// assert_eq!(clean_tag_name("#"), None);
/// ```
pub fn clean_tag_name(raw: &str) -> Option<String> {
    let cleaned = raw.trim().trim_start_matches('#').trim();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.to_string())
    }
}

/// Case-fold a tag name for comparison
///
/// Uses Unicode lowercasing, so non-ASCII names fold too.
pub fn fold_tag_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Validate a tag name for persistence, returning the trimmed name
pub fn validate_tag_name(name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::BlankTagName);
    }
    let len = trimmed.chars().count();
    if len > MAX_TAG_NAME_CHARS {
        return Err(ValidationError::TagNameTooLong {
            name: trimmed.to_string(),
            len,
            max: MAX_TAG_NAME_CHARS,
        });
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_is_unicode_aware() {
        assert_eq!(fold_tag_name("ÉTÉ"), "été");
        assert_eq!(fold_tag_name(" Errands "), "errands");
    }

    #[test]
    fn test_clean_strips_multiple_hashes() {
        assert_eq!(clean_tag_name("##work"), Some("work".to_string()));
        assert_eq!(clean_tag_name("   "), None);
    }

    #[test]
    fn test_validate_tag_name_bounds() {
        assert_eq!(validate_tag_name(" home ").unwrap(), "home");
        assert_eq!(validate_tag_name("  "), Err(ValidationError::BlankTagName));

        let long = "x".repeat(MAX_TAG_NAME_CHARS + 1);
        assert!(matches!(
            validate_tag_name(&long),
            Err(ValidationError::TagNameTooLong { len: 51, max: 50, .. })
        ));

        let exact = "y".repeat(MAX_TAG_NAME_CHARS);
        assert!(validate_tag_name(&exact).is_ok());
    }

    #[test]
    fn test_tag_key() {
        let tag = Tag {
            id: TagId::new(),
            name: "Errands".to_string(),
            created_at: 0,
        };
        assert_eq!(tag.key(), "errands");
    }
}
