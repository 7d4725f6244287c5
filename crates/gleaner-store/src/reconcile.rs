//! Applying extraction results to a note
//!
//! One call to [`ReconciliationEngine::apply`] runs inside a single
//! `BEGIN IMMEDIATE` transaction. Any error drops the transaction, which
//! rolls back every tag, attachment and action item written so far.
//!
//! Tags are resolved insert-first: the insert is attempted, and a violation
//! of the unique `name_key` index turns into a select of the existing row.
//! Check-then-insert would leave a window for two writers to both miss.

use crate::{id_to_bytes, now_secs, tag_from_row, StoreError};
use gleaner_domain::action_item::validate_description;
use gleaner_domain::tag::{clean_tag_name, fold_tag_name, validate_tag_name};
use gleaner_domain::{
    ActionItem, ActionItemId, AppliedExtractionSummary, ExtractionResult, NoteId, Tag, TagId,
    ValidationError,
};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Transaction, TransactionBehavior};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// How many times a tag insert is retried after losing a uniqueness race
pub const MAX_TAG_RESOLVE_ATTEMPTS: usize = 3;

/// Settings for applying extraction results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileConfig {
    /// Skip action items whose trimmed text already exists on the note
    pub skip_existing_action_items: bool,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            skip_existing_action_items: true,
        }
    }
}

/// Persists extraction results against notes
#[derive(Debug, Clone, Default)]
pub struct ReconciliationEngine {
    config: ReconcileConfig,
}

impl ReconciliationEngine {
    /// Create an engine with the given settings
    pub fn new(config: ReconcileConfig) -> Self {
        Self { config }
    }

    /// The active settings
    pub fn config(&self) -> &ReconcileConfig {
        &self.config
    }

    /// Apply an extraction result to a note as one atomic unit
    ///
    /// Attaching a tag that is already attached is a no-op. Validation
    /// errors and storage errors leave the database unchanged.
    pub fn apply(
        &self,
        conn: &mut Connection,
        note_id: NoteId,
        result: &ExtractionResult,
    ) -> Result<AppliedExtractionSummary, StoreError> {
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|e| rolled_back(e.into()))?;

        match self.apply_in(&tx, note_id, result) {
            Ok(summary) => {
                tx.commit().map_err(|e| rolled_back(e.into()))?;
                info!(
                    event = "apply_extraction",
                    status = "ok",
                    note_id = %note_id,
                    created_tags = summary.created_tags.len(),
                    attached_tags = summary.attached_tags.len(),
                    created_action_items = summary.created_action_items.len(),
                );
                Ok(summary)
            }
            Err(e) => {
                // Dropping the transaction rolls it back
                drop(tx);
                warn!(event = "apply_extraction", status = "rolled_back", note_id = %note_id, error = %e);
                Err(rolled_back(e))
            }
        }
    }

    fn apply_in(
        &self,
        tx: &Transaction<'_>,
        note_id: NoteId,
        result: &ExtractionResult,
    ) -> Result<AppliedExtractionSummary, StoreError> {
        let note_key = id_to_bytes(note_id.value());

        let exists = tx
            .query_row("SELECT 1 FROM notes WHERE id = ?1", params![&note_key], |_| Ok(()))
            .optional()?;
        if exists.is_none() {
            return Err(StoreError::NoteNotFound(note_id));
        }

        let now = now_secs();
        let mut summary = AppliedExtractionSummary::default();

        for raw in &result.tags {
            let name = clean_tag_name(raw).ok_or(ValidationError::BlankTagName)?;
            let name = validate_tag_name(&name)?;

            let (tag, created) = resolve_tag(tx, &name, now)?;
            if created {
                summary.created_tags.push(tag.clone());
            }

            let attached = tx.execute(
                "INSERT OR IGNORE INTO note_tags (note_id, tag_id, created_at) VALUES (?1, ?2, ?3)",
                params![&note_key, id_to_bytes(tag.id.value()), now as i64],
            )?;
            if attached == 1 {
                summary.attached_tags.push(tag);
            }
        }

        let mut seen: HashSet<String> = if self.config.skip_existing_action_items {
            existing_descriptions(tx, &note_key)?
        } else {
            HashSet::new()
        };

        for raw in &result.action_items {
            let description = validate_description(raw)?;
            if !seen.insert(description.clone()) {
                debug!(event = "action_item_skipped", note_id = %note_id, description = %description);
                continue;
            }

            let item = ActionItem {
                id: ActionItemId::new(),
                description,
                completed: false,
                created_at: now,
                note_id: Some(note_id),
            };
            tx.execute(
                "INSERT INTO action_items (id, description, completed, created_at, note_id)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    id_to_bytes(item.id.value()),
                    &item.description,
                    item.completed,
                    item.created_at as i64,
                    &note_key,
                ],
            )?;
            summary.created_action_items.push(item);
        }

        Ok(summary)
    }
}

/// Classify an error that aborted an apply
///
/// Validation errors and an unknown note are returned as-is; storage
/// failures and unresolved conflicts become `ApplyTransaction`.
fn rolled_back(error: StoreError) -> StoreError {
    match error {
        StoreError::Database(_) | StoreError::Conflict(_) => {
            StoreError::ApplyTransaction(Box::new(error))
        }
        other => other,
    }
}

/// Find or create the tag whose folded name matches `name`
///
/// Returns the tag and whether this call created it.
fn resolve_tag(tx: &Transaction<'_>, name: &str, now: u64) -> Result<(Tag, bool), StoreError> {
    let key = fold_tag_name(name);

    for attempt in 1..=MAX_TAG_RESOLVE_ATTEMPTS {
        let tag = Tag {
            id: TagId::new(),
            name: name.to_string(),
            created_at: now,
        };

        let inserted = tx.execute(
            "INSERT INTO tags (id, name, name_key, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![id_to_bytes(tag.id.value()), &tag.name, &key, now as i64],
        );

        match inserted {
            Ok(_) => {
                debug!(event = "tag_created", tag = %tag.name);
                return Ok((tag, true));
            }
            Err(e) if is_unique_violation(&e) => {
                if let Some(existing) = find_tag_by_key(tx, &key)? {
                    return Ok((existing, false));
                }
                // The conflicting row vanished before the select; try again
                debug!(event = "tag_conflict_retry", tag = %name, attempt);
            }
            Err(e) => return Err(e.into()),
        }
    }

    Err(StoreError::Conflict(format!(
        "could not resolve tag '{}' after {} attempts",
        name, MAX_TAG_RESOLVE_ATTEMPTS
    )))
}

fn find_tag_by_key(tx: &Transaction<'_>, key: &str) -> Result<Option<Tag>, StoreError> {
    let tag = tx
        .query_row(
            "SELECT id, name, created_at FROM tags WHERE name_key = ?1",
            params![key],
            tag_from_row,
        )
        .optional()?;
    Ok(tag)
}

fn existing_descriptions(
    tx: &Transaction<'_>,
    note_key: &[u8],
) -> Result<HashSet<String>, StoreError> {
    let mut stmt = tx.prepare("SELECT description FROM action_items WHERE note_id = ?1")?;
    let descriptions = stmt
        .query_map(params![note_key], |row| row.get::<_, String>(0))?
        .collect::<Result<HashSet<_>, _>>()?;
    Ok(descriptions)
}

fn is_unique_violation(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(err, _)
            if err.code == ErrorCode::ConstraintViolation
                && (err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                    || err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY)
    )
}
