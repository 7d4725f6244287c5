//! Note module

use crate::ids::NoteId;
use crate::tag::Tag;

/// A note as seen by the extraction pipeline
///
/// Notes are owned by the surrounding application. The pipeline only reads
/// `id` and `content` and changes which tags are attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    /// Unique identifier
    pub id: NoteId,

    /// Short title
    pub title: String,

    /// Free-form body text
    pub content: String,

    /// When this note was created (unix seconds)
    pub created_at: u64,

    /// Tags currently attached to this note
    pub tags: Vec<Tag>,
}

impl Note {
    /// Whether a tag with the same case-folded name is attached
    pub fn has_tag(&self, name: &str) -> bool {
        let key = crate::tag::fold_tag_name(name);
        self.tags.iter().any(|t| t.key() == key)
    }
}
