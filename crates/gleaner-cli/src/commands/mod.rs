//! Command implementations.
//!
//! Each command returns its rendered output; `main` prints it.

pub mod apply;
pub mod extract;
pub mod note;
pub mod tags;

pub use self::apply::execute_apply;
pub use self::extract::execute_extract;
pub use self::note::execute_note;
pub use self::tags::execute_tags;

use crate::error::{CliError, Result};
use gleaner_domain::NoteId;
use std::fs;
use std::io::{self, Read};
use std::path::Path;

/// Read text from exactly one of: an inline value, a file, or stdin.
pub(crate) fn read_text(
    inline: Option<String>,
    file: Option<&Path>,
    stdin: bool,
) -> Result<String> {
    match (inline, file, stdin) {
        (Some(text), None, false) => Ok(text),
        (None, Some(path), false) => Ok(fs::read_to_string(path)?),
        (None, None, true) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
        (None, None, false) => Err(CliError::InvalidInput(
            "Provide text, --file or --stdin".to_string(),
        )),
        _ => Err(CliError::InvalidInput(
            "Text, --file and --stdin are mutually exclusive".to_string(),
        )),
    }
}

/// Parse a note ID argument.
pub(crate) fn parse_note_id(raw: &str) -> Result<NoteId> {
    NoteId::from_string(raw).map_err(CliError::InvalidInput)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_inline_text() {
        assert_eq!(read_text(Some("hi".into()), None, false).unwrap(), "hi");
    }

    #[test]
    fn test_read_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("note.md");
        fs::write(&path, "- [ ] Buy milk").unwrap();
        assert_eq!(read_text(None, Some(&path), false).unwrap(), "- [ ] Buy milk");
    }

    #[test]
    fn test_no_source_is_error() {
        assert!(matches!(
            read_text(None, None, false),
            Err(CliError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_parse_note_id() {
        let id = NoteId::new();
        assert_eq!(parse_note_id(&id.to_string()).unwrap(), id);
        assert!(parse_note_id("not-an-id").is_err());
    }
}
