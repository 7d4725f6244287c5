//! Note command implementation.

use crate::cli::{NoteAction, NoteArgs};
use crate::commands::{parse_note_id, read_text};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use gleaner_domain::traits::NoteStore;
use gleaner_store::SqliteStore;

/// Execute a note subcommand.
pub fn execute_note(
    args: NoteArgs,
    store: &mut SqliteStore,
    formatter: &Formatter,
) -> Result<String> {
    match args.action {
        NoteAction::Create {
            title,
            content,
            file,
        } => {
            let content = match (content, file) {
                (None, None) => String::new(),
                (content, file) => read_text(content, file.as_deref(), false)?,
            };
            let note = store.create_note(&title, &content)?;
            Ok(formatter.note_created(&note))
        }
        NoteAction::Show { id } => {
            let id = parse_note_id(&id)?;
            let note = store
                .get_note(id)?
                .ok_or_else(|| CliError::NotFound(format!("note {}", id)))?;
            let items = store.note_action_items(id)?;
            formatter.format_note(&note, &items)
        }
        NoteAction::List => formatter.format_notes(&store.list_notes()?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use gleaner_domain::NoteId;

    #[test]
    fn test_create_then_show() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let formatter = Formatter::new(OutputFormat::Json, false);

        let created = execute_note(
            NoteArgs {
                action: NoteAction::Create {
                    title: "Groceries".into(),
                    content: Some("- [ ] Buy milk".into()),
                    file: None,
                },
            },
            &mut store,
            &formatter,
        )
        .unwrap();
        let id = serde_json::from_str::<serde_json::Value>(&created).unwrap()["id"]
            .as_str()
            .unwrap()
            .to_string();

        let shown = execute_note(
            NoteArgs {
                action: NoteAction::Show { id: id.clone() },
            },
            &mut store,
            &formatter,
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&shown).unwrap();
        assert_eq!(value["id"], id);
        assert_eq!(value["title"], "Groceries");
        assert_eq!(value["content"], "- [ ] Buy milk");
    }

    #[test]
    fn test_show_unknown_note() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let formatter = Formatter::new(OutputFormat::Table, false);

        let result = execute_note(
            NoteArgs {
                action: NoteAction::Show {
                    id: NoteId::new().to_string(),
                },
            },
            &mut store,
            &formatter,
        );
        assert!(matches!(result, Err(CliError::NotFound(_))));
    }
}
