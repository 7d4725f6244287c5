//! Tags command implementation.

use crate::error::Result;
use crate::output::Formatter;
use gleaner_domain::traits::NoteStore;
use gleaner_store::SqliteStore;

/// Execute the tags command.
pub fn execute_tags(store: &SqliteStore, formatter: &Formatter) -> Result<String> {
    let tags = store.list_tags()?;
    formatter.format_tags(&tags)
}
