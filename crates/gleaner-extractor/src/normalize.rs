//! Text normalization: canonical lines and inline tag tokens

use regex::Regex;
use std::sync::LazyLock;

static TAG_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#(\w+)").expect("valid tag token regex"));

/// Normalized view of raw note text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedText {
    /// Trimmed, non-empty lines in original order
    pub lines: Vec<String>,

    /// Every `#word` token in the text, in order, without the `#`
    ///
    /// Duplicates are kept; deduplication is the extractor's job.
    pub tag_tokens: Vec<String>,
}

impl NormalizedText {
    /// Whether the text had no content at all
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Normalize raw text. Never fails; blank input yields empty lists.
///
/// # Examples
///
/// ```
/// use gleaner_extractor::normalize;
///
/// let normalized = normalize("  first #a \r\n\n second #b");
/// assert_eq!(normalized.lines, vec!["first #a", "second #b"]);
/// assert_eq!(normalized.tag_tokens, vec!["a", "b"]);
/// ```
pub fn normalize(text: &str) -> NormalizedText {
    let lines = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    NormalizedText {
        lines,
        tag_tokens: scan_tag_tokens(text),
    }
}

/// Scan text for `#` followed by one or more word characters
///
/// Word characters are Unicode-aware, so `#中文` and `#café` are tokens.
pub fn scan_tag_tokens(text: &str) -> Vec<String> {
    TAG_TOKEN_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_and_whitespace_input() {
        assert_eq!(normalize(""), NormalizedText::default());
        assert_eq!(normalize("   \n\t\n  "), NormalizedText::default());
        assert!(normalize(" ").is_empty());
    }

    #[test]
    fn test_lines_trimmed_in_order() {
        let normalized = normalize("\n  one\n\ttwo  \n\nthree");
        assert_eq!(normalized.lines, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_tag_tokens_keep_duplicates_and_case() {
        let tokens = scan_tag_tokens("#Work then #work and #home");
        assert_eq!(tokens, vec!["Work", "work", "home"]);
    }

    #[test]
    fn test_heading_markers_are_not_tags() {
        assert!(scan_tag_tokens("# Heading\n## Sub heading").is_empty());
    }

    #[test]
    fn test_unicode_tags() {
        let tokens = scan_tag_tokens("notes #中文标签 and #café_2");
        assert_eq!(tokens, vec!["中文标签", "café_2"]);
    }

    #[test]
    fn test_tag_stops_at_punctuation() {
        let tokens = scan_tag_tokens("(#errands), #tag-1");
        assert_eq!(tokens, vec!["errands", "tag"]);
    }
}
