//! Rule-based extraction of action items and tags
//!
//! Each normalized line is classified on its own, in order. The first
//! matching rule wins:
//!
//! 1. checkbox marker (`- [ ]`, `- [x]`, `[ ]`, `[x]`, `[TODO]`)
//! 2. bullet marker (`-`, `*`, `•` followed by whitespace)
//! 3. numbered marker (`1. `)
//! 4. keyword prefix (`TODO:`, `Action:`, `Next:`)
//! 5. first word is a recognized imperative verb (the whole line is kept)
//!
//! Tags come only from inline `#word` tokens, independent of line rules.

use crate::normalize::normalize;
use gleaner_domain::ExtractionResult;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;
use tracing::debug;

static CHECKBOX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:-\s*)?\[(?:\s|x|todo)\]\s*").expect("valid checkbox regex")
});
static BULLET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-*•]\s+").expect("valid bullet regex"));
static NUMBERED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\s+").expect("valid numbered regex"));
static KEYWORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:todo|action|next)\s*:\s*").expect("valid keyword regex")
});

/// Verbs that mark a line as an action item when they start it
pub const DEFAULT_IMPERATIVE_VERBS: &[&str] = &[
    "add",
    "book",
    "buy",
    "call",
    "check",
    "contact",
    "create",
    "deploy",
    "design",
    "document",
    "draft",
    "email",
    "finish",
    "fix",
    "follow",
    "implement",
    "investigate",
    "prepare",
    "refactor",
    "remind",
    "remove",
    "research",
    "review",
    "schedule",
    "send",
    "submit",
    "update",
    "verify",
    "write",
];

/// Which rule classified a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineMarker {
    /// Checkbox marker, stripped
    Checkbox,
    /// Bullet marker, stripped
    Bullet,
    /// Numbered-list marker, stripped
    Numbered,
    /// Keyword prefix, stripped
    Keyword,
    /// Imperative first word, line kept whole
    ImperativeVerb,
}

/// Deterministic, rule-based extractor. Never fails.
#[derive(Debug, Clone)]
pub struct HeuristicExtractor {
    verbs: HashSet<String>,
}

impl Default for HeuristicExtractor {
    fn default() -> Self {
        Self::with_verbs(DEFAULT_IMPERATIVE_VERBS.iter().copied())
    }
}

impl HeuristicExtractor {
    /// Create an extractor with the default verb set
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an extractor recognizing exactly the given verbs
    pub fn with_verbs<I, S>(verbs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            verbs: verbs
                .into_iter()
                .map(|v| v.as_ref().trim().to_lowercase())
                .filter(|v| !v.is_empty())
                .collect(),
        }
    }

    /// Extract candidate tags and action items from text
    ///
    /// # Examples
    ///
    /// ```
    /// use gleaner_extractor::HeuristicExtractor;
    ///
    /// let result = HeuristicExtractor::new()
    ///     .extract("- [ ] Buy milk\nTODO: call mom\nMeeting notes #errands");
    /// assert_eq!(result.tags, vec!["errands"]);
    /// assert_eq!(result.action_items, vec!["Buy milk", "call mom"]);
    /// ```
    pub fn extract(&self, text: &str) -> ExtractionResult {
        let normalized = normalize(text);
        let candidates = normalized
            .lines
            .iter()
            .filter_map(|line| self.classify_line(line))
            .map(|(_, item)| item);

        let result = ExtractionResult::from_candidates(&normalized.tag_tokens, candidates);
        debug!(
            lines = normalized.lines.len(),
            tags = result.tags.len(),
            action_items = result.action_items.len(),
            "Heuristic extraction complete"
        );
        result
    }

    /// Classify one trimmed line, returning the rule and the candidate text
    ///
    /// A matching marker with nothing after it yields no candidate.
    pub fn classify_line<'a>(&self, line: &'a str) -> Option<(LineMarker, &'a str)> {
        let marker_rules: [(&Regex, LineMarker); 4] = [
            (&CHECKBOX_RE, LineMarker::Checkbox),
            (&BULLET_RE, LineMarker::Bullet),
            (&NUMBERED_RE, LineMarker::Numbered),
            (&KEYWORD_RE, LineMarker::Keyword),
        ];

        for (re, marker) in marker_rules {
            if let Some(m) = re.find(line) {
                let rest = line[m.end()..].trim();
                return (!rest.is_empty()).then_some((marker, rest));
            }
        }

        if self.starts_with_verb(line) {
            return Some((LineMarker::ImperativeVerb, line));
        }
        None
    }

    fn starts_with_verb(&self, line: &str) -> bool {
        let word: String = line
            .chars()
            .take_while(|c| c.is_alphabetic() || *c == '\'')
            .collect();
        !word.is_empty() && self.verbs.contains(&word.to_lowercase())
    }
}

/// Strip every leading list marker and keyword prefix from a candidate
///
/// Used to clean up model output that echoes markers back, e.g.
/// `"1. - TODO: ship it"` becomes `"ship it"`.
pub fn strip_markers(text: &str) -> &str {
    let mut current = text.trim();
    loop {
        let stripped = [&*CHECKBOX_RE, &*BULLET_RE, &*NUMBERED_RE, &*KEYWORD_RE]
            .iter()
            .find_map(|re| re.find(current).map(|m| current[m.end()..].trim_start()));
        match stripped {
            Some(rest) if rest.len() < current.len() => current = rest.trim(),
            _ => return current,
        }
    }
}
