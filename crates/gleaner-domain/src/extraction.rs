//! Extraction results and apply summaries
//!
//! Both types are ephemeral: they are produced per call and never persisted.
//!
//! Deduplication rules, shared by every backend:
//! - action items: exact string equality after trimming, first occurrence wins
//! - tags: case-insensitive, first occurrence wins and keeps its casing;
//!   names longer than [`MAX_TAG_NAME_CHARS`] are dropped

use crate::action_item::ActionItem;
use crate::tag::{clean_tag_name, fold_tag_name, Tag, MAX_TAG_NAME_CHARS};
use std::collections::HashSet;
use tracing::debug;

/// Candidate tags and action items from one extraction call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionResult {
    /// Distinct tag names in order of first appearance
    pub tags: Vec<String>,

    /// Distinct action item descriptions in order of first appearance
    pub action_items: Vec<String>,
}

impl ExtractionResult {
    /// Create an empty result
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a result from raw candidates, applying cleanup and deduplication
    ///
    /// # Examples
    ///
    /// ```
    /// use gleaner_domain::ExtractionResult;
    ///
    /// let result = ExtractionResult::from_candidates(
    ///     ["Errands", "#errands", "home"],
    ///     ["Buy milk", " Buy milk ", "call mom"],
    /// );
    /// assert_eq!(result.tags, vec!["Errands", "home"]);
    /// assert_eq!(result.action_items, vec!["Buy milk", "call mom"]);
    /// ```
    pub fn from_candidates<T, A>(tags: T, action_items: A) -> Self
    where
        T: IntoIterator,
        T::Item: AsRef<str>,
        A: IntoIterator,
        A::Item: AsRef<str>,
    {
        Self {
            tags: dedup_tags(tags),
            action_items: dedup_action_items(action_items),
        }
    }

    /// Merge another result into this one, keeping this result's entries first
    pub fn merge(self, other: ExtractionResult) -> Self {
        Self::from_candidates(
            self.tags.into_iter().chain(other.tags),
            self.action_items.into_iter().chain(other.action_items),
        )
    }

    /// Whether neither tags nor action items were found
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty() && self.action_items.is_empty()
    }
}

/// Deduplicate tag candidates case-insensitively, preserving first-seen casing
///
/// Candidates that could never be stored as a tag are dropped.
pub fn dedup_tags<I>(candidates: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut unique = Vec::new();
    for candidate in candidates {
        let Some(name) = clean_tag_name(candidate.as_ref()) else {
            continue;
        };
        let len = name.chars().count();
        if len > MAX_TAG_NAME_CHARS {
            debug!(event = "tag_candidate_dropped", len, max = MAX_TAG_NAME_CHARS);
            continue;
        }
        if seen.insert(fold_tag_name(&name)) {
            unique.push(name);
        }
    }
    unique
}

/// Deduplicate action item candidates by exact trimmed text
pub fn dedup_action_items<I>(candidates: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut unique = Vec::new();
    for candidate in candidates {
        let item = candidate.as_ref().trim();
        if item.is_empty() {
            continue;
        }
        if seen.insert(item.to_string()) {
            unique.push(item.to_string());
        }
    }
    unique
}

/// Rows created or attached as a side effect of one apply call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppliedExtractionSummary {
    /// Tags that did not exist before this call
    pub created_tags: Vec<Tag>,

    /// Tags newly attached to the note (includes newly created tags)
    pub attached_tags: Vec<Tag>,

    /// Action items created for the note
    pub created_action_items: Vec<ActionItem>,
}

impl AppliedExtractionSummary {
    /// Whether the call changed nothing
    pub fn is_noop(&self) -> bool {
        self.created_tags.is_empty()
            && self.attached_tags.is_empty()
            && self.created_action_items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_tag_dedup_keeps_first_casing() {
        let tags = dedup_tags(["Work", "WORK", "work", "Home"]);
        assert_eq!(tags, vec!["Work", "Home"]);
    }

    #[test]
    fn test_action_item_dedup_is_case_sensitive() {
        let items = dedup_action_items(["Buy milk", "buy milk", "Buy milk  "]);
        assert_eq!(items, vec!["Buy milk", "buy milk"]);
    }

    #[test]
    fn test_blank_candidates_dropped() {
        let result = ExtractionResult::from_candidates(["", "#", "  "], ["", "   "]);
        assert!(result.is_empty());
    }

    #[test]
    fn test_overlong_tag_candidates_dropped() {
        let exact = "é".repeat(MAX_TAG_NAME_CHARS);
        let long = "a".repeat(MAX_TAG_NAME_CHARS + 1);
        let tags = dedup_tags([long.as_str(), "errands", exact.as_str()]);
        assert_eq!(tags, vec!["errands".to_string(), exact]);
    }

    #[test]
    fn test_merge_preserves_order_and_dedups() {
        let first = ExtractionResult::from_candidates(["a"], ["one"]);
        let second = ExtractionResult::from_candidates(["A", "b"], ["two", "one"]);
        let merged = first.merge(second);
        assert_eq!(merged.tags, vec!["a", "b"]);
        assert_eq!(merged.action_items, vec!["one", "two"]);
    }

    #[test]
    fn test_summary_noop() {
        assert!(AppliedExtractionSummary::default().is_noop());
    }

    proptest! {
        #[test]
        fn prop_dedup_tags_is_idempotent(names in proptest::collection::vec("[a-zA-Z]{1,8}", 0..20)) {
            let once = dedup_tags(&names);
            let twice = dedup_tags(&once);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_dedup_tags_unique_under_folding(names in proptest::collection::vec("[a-zA-Z]{1,8}", 0..20)) {
            let tags = dedup_tags(&names);
            let keys: HashSet<String> = tags.iter().map(|t| fold_tag_name(t)).collect();
            prop_assert_eq!(keys.len(), tags.len());
        }

        #[test]
        fn prop_dedup_tags_always_storable(names in proptest::collection::vec("#?[a-z]{0,80}", 0..20)) {
            for tag in dedup_tags(&names) {
                prop_assert!(crate::tag::validate_tag_name(&tag).is_ok());
            }
        }
    }
}
