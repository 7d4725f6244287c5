//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use gleaner_domain::{ActionItem, AppliedExtractionSummary, ExtractionResult, Note, Tag};
use serde_json::{json, Value};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format an extraction result.
    pub fn format_extraction(&self, result: &ExtractionResult) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&extraction_json(result))?),
            OutputFormat::Table => {
                if result.is_empty() {
                    return Ok(self.colorize("Nothing found.", "yellow"));
                }
                let mut builder = Builder::default();
                builder.push_record(["Kind", "Value"]);
                for tag in &result.tags {
                    builder.push_record(["tag".to_string(), format!("#{}", tag)]);
                }
                for item in &result.action_items {
                    builder.push_record(["action item", item.as_str()]);
                }
                Ok(render(builder))
            }
        }
    }

    /// Format a note with its action items.
    pub fn format_note(&self, note: &Note, items: &[ActionItem]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let value = json!({
                    "id": note.id.to_string(),
                    "title": note.title,
                    "content": note.content,
                    "created_at": note.created_at,
                    "tags": note.tags.iter().map(tag_json).collect::<Vec<_>>(),
                    "action_items": items.iter().map(action_item_json).collect::<Vec<_>>(),
                });
                Ok(serde_json::to_string_pretty(&value)?)
            }
            OutputFormat::Table => {
                let tags = note
                    .tags
                    .iter()
                    .map(|t| format!("#{}", t.name))
                    .collect::<Vec<_>>()
                    .join(" ");

                let mut out = format!(
                    "{} {}\n{} {}\n",
                    self.colorize("ID:", "cyan"),
                    note.id,
                    self.colorize("Title:", "cyan"),
                    note.title
                );
                if !tags.is_empty() {
                    out.push_str(&format!("{} {}\n", self.colorize("Tags:", "cyan"), tags));
                }
                if !note.content.is_empty() {
                    out.push('\n');
                    out.push_str(&note.content);
                    out.push('\n');
                }
                if !items.is_empty() {
                    out.push('\n');
                    out.push_str(&self.action_items_table(items));
                }
                Ok(out)
            }
        }
    }

    /// Format a list of notes.
    pub fn format_notes(&self, notes: &[Note]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let value: Vec<Value> = notes
                    .iter()
                    .map(|n| {
                        json!({
                            "id": n.id.to_string(),
                            "title": n.title,
                            "created_at": n.created_at,
                            "tags": n.tags.iter().map(|t| t.name.clone()).collect::<Vec<_>>(),
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&value)?)
            }
            OutputFormat::Table => {
                if notes.is_empty() {
                    return Ok(self.colorize("No notes found.", "yellow"));
                }
                let mut builder = Builder::default();
                builder.push_record(["ID", "Title", "Tags"]);
                for note in notes {
                    let tags = note
                        .tags
                        .iter()
                        .map(|t| t.name.as_str())
                        .collect::<Vec<_>>()
                        .join(", ");
                    builder.push_record([note.id.to_string(), note.title.clone(), tags]);
                }
                Ok(render(builder))
            }
        }
    }

    /// Format tags.
    pub fn format_tags(&self, tags: &[Tag]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let value: Vec<Value> = tags.iter().map(tag_json).collect();
                Ok(serde_json::to_string_pretty(&value)?)
            }
            OutputFormat::Table => {
                if tags.is_empty() {
                    return Ok(self.colorize("No tags found.", "yellow"));
                }
                let mut builder = Builder::default();
                builder.push_record(["ID", "Name"]);
                for tag in tags {
                    builder.push_record([tag.id.to_string(), tag.name.clone()]);
                }
                Ok(render(builder))
            }
        }
    }

    /// Format the outcome of an apply call.
    pub fn format_summary(
        &self,
        extracted: &ExtractionResult,
        summary: &AppliedExtractionSummary,
    ) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let value = json!({
                    "extracted": extraction_json(extracted),
                    "created_tags": summary.created_tags.iter().map(tag_json).collect::<Vec<_>>(),
                    "attached_tags": summary.attached_tags.iter().map(tag_json).collect::<Vec<_>>(),
                    "created_action_items": summary
                        .created_action_items
                        .iter()
                        .map(action_item_json)
                        .collect::<Vec<_>>(),
                });
                Ok(serde_json::to_string_pretty(&value)?)
            }
            OutputFormat::Table => {
                if summary.is_noop() {
                    return Ok(self.info("Nothing new to apply."));
                }
                let mut out = self.success(&format!(
                    "Created {} tag(s), attached {} tag(s), created {} action item(s)",
                    summary.created_tags.len(),
                    summary.attached_tags.len(),
                    summary.created_action_items.len()
                ));
                if !summary.created_action_items.is_empty() {
                    out.push('\n');
                    out.push_str(&self.action_items_table(&summary.created_action_items));
                }
                Ok(out)
            }
        }
    }

    fn action_items_table(&self, items: &[ActionItem]) -> String {
        let mut builder = Builder::default();
        builder.push_record(["ID", "Done", "Description"]);
        for item in items {
            let done = if item.completed { "x" } else { " " };
            builder.push_record([item.id.to_string(), done.to_string(), item.description.clone()]);
        }
        render(builder)
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format note creation result.
    pub fn note_created(&self, note: &Note) -> String {
        match self.format {
            OutputFormat::Json => json!({ "id": note.id.to_string() }).to_string(),
            OutputFormat::Table => self.success(&format!("Note created: {}", note.id)),
        }
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}

fn render(builder: Builder) -> String {
    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));
    table.to_string()
}

fn extraction_json(result: &ExtractionResult) -> Value {
    json!({
        "tags": result.tags,
        "action_items": result.action_items,
    })
}

fn tag_json(tag: &Tag) -> Value {
    json!({
        "id": tag.id.to_string(),
        "name": tag.name,
        "created_at": tag.created_at,
    })
}

fn action_item_json(item: &ActionItem) -> Value {
    json!({
        "id": item.id.to_string(),
        "description": item.description,
        "completed": item.completed,
        "created_at": item.created_at,
        "note_id": item.note_id.map(|id| id.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use gleaner_domain::{ActionItemId, NoteId, TagId};

    fn sample_result() -> ExtractionResult {
        ExtractionResult::from_candidates(["errands"], ["Buy milk", "call mom"])
    }

    fn sample_tag() -> Tag {
        Tag {
            id: TagId::new(),
            name: "errands".to_string(),
            created_at: 1_700_000_000,
        }
    }

    #[test]
    fn test_extraction_json_shape() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_extraction(&sample_result()).unwrap();
        let value: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["tags"], json!(["errands"]));
        assert_eq!(value["action_items"], json!(["Buy milk", "call mom"]));
    }

    #[test]
    fn test_extraction_table() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_extraction(&sample_result()).unwrap();
        assert!(output.contains("#errands"));
        assert!(output.contains("Buy milk"));
        assert!(output.contains("Kind"));
    }

    #[test]
    fn test_empty_extraction() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_extraction(&ExtractionResult::default()).unwrap();
        assert_eq!(output, "Nothing found.");
    }

    #[test]
    fn test_summary_json() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let note_id = NoteId::new();
        let summary = AppliedExtractionSummary {
            created_tags: vec![sample_tag()],
            attached_tags: vec![sample_tag()],
            created_action_items: vec![ActionItem {
                id: ActionItemId::new(),
                description: "Buy milk".to_string(),
                completed: false,
                created_at: 1_700_000_000,
                note_id: Some(note_id),
            }],
        };

        let output = formatter.format_summary(&sample_result(), &summary).unwrap();
        let value: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["created_tags"][0]["name"], "errands");
        assert_eq!(value["created_action_items"][0]["note_id"], note_id.to_string());
        assert_eq!(value["extracted"]["tags"], json!(["errands"]));
    }

    #[test]
    fn test_noop_summary_table() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter
            .format_summary(&ExtractionResult::default(), &AppliedExtractionSummary::default())
            .unwrap();
        assert!(output.contains("Nothing new"));
    }

    #[test]
    fn test_empty_tags() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert!(formatter.format_tags(&[]).unwrap().contains("No tags found"));
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.success("test"), "✓ test");
        assert_eq!(formatter.error("bad"), "✗ bad");
    }
}
