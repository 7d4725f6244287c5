//! Gleaner Storage Layer
//!
//! Implements the `NoteStore` trait on SQLite.
//!
//! # Architecture
//!
//! - `notes`, `tags`, `note_tags` and `action_items` tables (see `schema.sql`)
//! - Tag names are unique under case-folding, enforced by a unique index on
//!   the folded `name_key` column
//! - Applying an extraction result is one `IMMEDIATE` transaction, run by
//!   the [`ReconciliationEngine`]
//!
//! # Examples
//!
//! ```
//! use gleaner_domain::traits::NoteStore;
//! use gleaner_domain::ExtractionResult;
//! use gleaner_store::SqliteStore;
//!
//! let mut store = SqliteStore::open_in_memory().unwrap();
//! let note = store.create_note("Groceries", "- [ ] Buy milk #errands").unwrap();
//!
//! let result = ExtractionResult::from_candidates(["errands"], ["Buy milk"]);
//! let summary = store.apply_extraction(note.id, &result).unwrap();
//! assert_eq!(summary.created_tags.len(), 1);
//! assert_eq!(summary.created_action_items.len(), 1);
//! ```

#![warn(missing_docs)]

mod reconcile;

pub use reconcile::{ReconcileConfig, ReconciliationEngine, MAX_TAG_RESOLVE_ATTEMPTS};

use gleaner_domain::traits::NoteStore;
use gleaner_domain::{
    ActionItem, ActionItemId, AppliedExtractionSummary, ExtractionResult, Note, NoteId, Tag,
    TagId, ValidationError,
};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use thiserror::Error;
use tracing::{error, info};

/// How long a connection waits on a locked database before giving up
pub const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Input rejected by a domain invariant; nothing was written
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Note not found
    #[error("Note not found: {0}")]
    NoteNotFound(NoteId),

    /// A uniqueness race could not be resolved within the retry budget
    ///
    /// Raised inside an apply; callers see it wrapped in `ApplyTransaction`.
    #[error("Reconciliation conflict: {0}")]
    Conflict(String),

    /// The apply transaction failed and was rolled back
    ///
    /// Wraps the `Database` or `Conflict` error that aborted it.
    #[error("Apply transaction failed and was rolled back: {0}")]
    ApplyTransaction(#[source] Box<StoreError>),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// SQLite-based implementation of NoteStore
///
/// SQLite connections are not thread-safe. Each thread should open its own
/// SqliteStore on the same file; writers are serialized by SQLite.
pub struct SqliteStore {
    conn: Connection,
    engine: ReconciliationEngine,
}

impl SqliteStore {
    /// Open (or create) a store at the given path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use gleaner_store::SqliteStore;
    ///
    /// let store = SqliteStore::new("gleaner.db").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|e| {
            error!(event = "db_open", status = "error", path = %path.display(), error = %e);
            e
        })?;
        let store = Self::bootstrap(conn)?;
        info!(event = "db_open", status = "ok", path = %path.display());
        Ok(store)
    }

    /// Open a private in-memory store
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let store = Self::bootstrap(Connection::open_in_memory()?)?;
        info!(event = "db_open", status = "ok", mode = "memory");
        Ok(store)
    }

    /// Replace the reconciliation settings
    pub fn with_reconcile_config(mut self, config: ReconcileConfig) -> Self {
        self.engine = ReconciliationEngine::new(config);
        self
    }

    /// The active reconciliation settings
    pub fn reconcile_config(&self) -> &ReconcileConfig {
        self.engine.config()
    }

    fn bootstrap(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch(include_str!("schema.sql"))?;
        Ok(Self {
            conn,
            engine: ReconciliationEngine::default(),
        })
    }

    /// All notes, newest first
    pub fn list_notes(&self) -> Result<Vec<Note>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, content, created_at FROM notes
             ORDER BY created_at DESC, rowid DESC",
        )?;
        let notes = stmt
            .query_map([], note_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        notes
            .into_iter()
            .map(|mut note| {
                note.tags = self.note_tags(note.id)?;
                Ok(note)
            })
            .collect()
    }

    /// Number of tag rows whose folded name equals the folded `name`
    pub fn count_tags_named(&self, name: &str) -> Result<usize, StoreError> {
        let key = gleaner_domain::tag::fold_tag_name(name);
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM tags WHERE name_key = ?1",
            params![key],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}

impl NoteStore for SqliteStore {
    type Error = StoreError;

    fn create_note(&mut self, title: &str, content: &str) -> Result<Note, Self::Error> {
        let title = title.trim();
        if title.is_empty() {
            return Err(StoreError::InvalidData("Note title must not be blank".to_string()));
        }

        let note = Note {
            id: NoteId::new(),
            title: title.to_string(),
            content: content.to_string(),
            created_at: now_secs(),
            tags: Vec::new(),
        };

        self.conn.execute(
            "INSERT INTO notes (id, title, content, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                id_to_bytes(note.id.value()),
                &note.title,
                &note.content,
                note.created_at as i64,
            ],
        )?;
        info!(event = "note_created", note_id = %note.id);

        Ok(note)
    }

    fn get_note(&self, id: NoteId) -> Result<Option<Note>, Self::Error> {
        let note = self
            .conn
            .query_row(
                "SELECT id, title, content, created_at FROM notes WHERE id = ?1",
                params![id_to_bytes(id.value())],
                note_from_row,
            )
            .optional()?;

        match note {
            Some(mut note) => {
                note.tags = self.note_tags(id)?;
                Ok(Some(note))
            }
            None => Ok(None),
        }
    }

    fn note_tags(&self, id: NoteId) -> Result<Vec<Tag>, Self::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT t.id, t.name, t.created_at
             FROM tags t JOIN note_tags nt ON nt.tag_id = t.id
             WHERE nt.note_id = ?1
             ORDER BY t.name_key",
        )?;
        let tags = stmt
            .query_map(params![id_to_bytes(id.value())], tag_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tags)
    }

    fn note_action_items(&self, id: NoteId) -> Result<Vec<ActionItem>, Self::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT id, description, completed, created_at, note_id
             FROM action_items WHERE note_id = ?1
             ORDER BY created_at, rowid",
        )?;
        let items = stmt
            .query_map(params![id_to_bytes(id.value())], action_item_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }

    fn list_tags(&self) -> Result<Vec<Tag>, Self::Error> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, created_at FROM tags ORDER BY name_key")?;
        let tags = stmt
            .query_map([], tag_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tags)
    }

    fn apply_extraction(
        &mut self,
        note_id: NoteId,
        result: &ExtractionResult,
    ) -> Result<AppliedExtractionSummary, Self::Error> {
        self.engine.apply(&mut self.conn, note_id, result)
    }
}

/// Current time in unix seconds
pub(crate) fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Convert an identifier value to bytes for storage
pub(crate) fn id_to_bytes(value: u128) -> Vec<u8> {
    value.to_be_bytes().to_vec()
}

/// Convert stored bytes back to an identifier value
pub(crate) fn bytes_to_id(bytes: &[u8]) -> Result<u128, StoreError> {
    let arr: [u8; 16] = bytes.try_into().map_err(|_| {
        StoreError::InvalidData(format!("Expected 16 bytes for id, got {}", bytes.len()))
    })?;
    Ok(u128::from_be_bytes(arr))
}

fn id_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<u128> {
    let bytes: Vec<u8> = row.get(idx)?;
    bytes_to_id(&bytes)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Blob, Box::new(e)))
}

fn note_from_row(row: &Row<'_>) -> rusqlite::Result<Note> {
    Ok(Note {
        id: NoteId::from_value(id_column(row, 0)?),
        title: row.get(1)?,
        content: row.get(2)?,
        created_at: row.get::<_, i64>(3)? as u64,
        tags: Vec::new(),
    })
}

/// Map `id, name, created_at` to a Tag
pub(crate) fn tag_from_row(row: &Row<'_>) -> rusqlite::Result<Tag> {
    Ok(Tag {
        id: TagId::from_value(id_column(row, 0)?),
        name: row.get(1)?,
        created_at: row.get::<_, i64>(2)? as u64,
    })
}

fn action_item_from_row(row: &Row<'_>) -> rusqlite::Result<ActionItem> {
    let note_id: Option<Vec<u8>> = row.get(4)?;
    let note_id = match note_id {
        Some(bytes) => Some(NoteId::from_value(bytes_to_id(&bytes).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(4, Type::Blob, Box::new(e))
        })?)),
        None => None,
    };

    Ok(ActionItem {
        id: ActionItemId::from_value(id_column(row, 0)?),
        description: row.get(1)?,
        completed: row.get(2)?,
        created_at: row.get::<_, i64>(3)? as u64,
        note_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_bytes_round_trip() {
        let id = NoteId::new();
        let bytes = id_to_bytes(id.value());
        assert_eq!(bytes.len(), 16);
        assert_eq!(bytes_to_id(&bytes).unwrap(), id.value());
    }

    #[test]
    fn test_bad_id_length() {
        assert!(matches!(bytes_to_id(&[1, 2, 3]), Err(StoreError::InvalidData(_))));
    }

    #[test]
    fn test_blank_title_rejected() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        assert!(matches!(
            store.create_note("  ", "body"),
            Err(StoreError::InvalidData(_))
        ));
    }

    #[test]
    fn test_list_notes_newest_first() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let first = store.create_note("first", "").unwrap();
        let second = store.create_note("second", "").unwrap();

        let ids: Vec<NoteId> = store.list_notes().unwrap().iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }
}
