//! Apply command implementation.
//!
//! Runs in two phases: extraction first, with no transaction open, then a
//! single transactional apply. The model call never holds a database lock.

use crate::cli::ApplyArgs;
use crate::commands::parse_note_id;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use gleaner_domain::traits::{LlmProvider, NoteStore};
use gleaner_extractor::ExtractionOrchestrator;
use gleaner_llm::LlmError;
use gleaner_store::SqliteStore;
use tracing::debug;

/// Execute the apply command.
pub async fn execute_apply<L>(
    args: ApplyArgs,
    store: &mut SqliteStore,
    orchestrator: &ExtractionOrchestrator<L>,
    formatter: &Formatter,
) -> Result<String>
where
    L: LlmProvider<Error = LlmError> + Send + Sync + 'static,
{
    let note_id = parse_note_id(&args.note_id)?;
    let note = store
        .get_note(note_id)?
        .ok_or_else(|| CliError::NotFound(format!("note {}", note_id)))?;

    let extracted = orchestrator.extract(&note.content, args.mode.into()).await?;
    debug!(
        note_id = %note_id,
        tags = extracted.tags.len(),
        action_items = extracted.action_items.len(),
        "Extraction finished, applying"
    );

    let summary = store.apply_extraction(note_id, &extracted)?;
    formatter.format_summary(&extracted, &summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ModeArg;
    use crate::config::OutputFormat;
    use gleaner_extractor::{BackendKind, ExtractorConfig, FallbackPolicy};
    use gleaner_llm::MockProvider;

    fn args(note_id: &str, mode: ModeArg) -> ApplyArgs {
        ApplyArgs {
            note_id: note_id.to_string(),
            mode,
        }
    }

    #[tokio::test]
    async fn test_apply_rule_backend() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let note = store
            .create_note("n", "- [ ] Buy milk\nTODO: call mom\nMeeting notes #errands")
            .unwrap();
        let orchestrator =
            ExtractionOrchestrator::new(ExtractorConfig::rule_only(), MockProvider::default())
                .unwrap();
        let formatter = Formatter::new(OutputFormat::Json, false);
        let id = note.id.to_string();

        let output = execute_apply(args(&id, ModeArg::Rule), &mut store, &orchestrator, &formatter)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["created_tags"][0]["name"], "errands");
        assert_eq!(value["created_action_items"].as_array().unwrap().len(), 2);

        // Second run attaches nothing new
        let output = execute_apply(args(&id, ModeArg::Rule), &mut store, &orchestrator, &formatter)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert!(value["attached_tags"].as_array().unwrap().is_empty());
        assert_eq!(store.note_tags(note.id).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_note_with_overlong_hashtag_still_applies() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let content = format!("- [ ] Buy milk\n#{} #errands", "a".repeat(51));
        let note = store.create_note("n", &content).unwrap();
        let orchestrator =
            ExtractionOrchestrator::new(ExtractorConfig::rule_only(), MockProvider::default())
                .unwrap();
        let formatter = Formatter::new(OutputFormat::Json, false);

        execute_apply(args(&note.id.to_string(), ModeArg::Rule), &mut store, &orchestrator, &formatter)
            .await
            .unwrap();

        let tags: Vec<String> = store
            .note_tags(note.id)
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(tags, vec!["errands"]);
        assert_eq!(store.note_action_items(note.id).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_backend_failure_writes_nothing() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let note = store.create_note("n", "- [ ] Buy milk #errands").unwrap();
        let config = ExtractorConfig::new(BackendKind::Llm, FallbackPolicy::Propagate);
        let provider = MockProvider::new("not json at all");
        let orchestrator = ExtractionOrchestrator::new(config, provider).unwrap();
        let formatter = Formatter::new(OutputFormat::Table, false);

        let id = note.id.to_string();

        let result =
            execute_apply(args(&id, ModeArg::Default), &mut store, &orchestrator, &formatter).await;

        assert!(matches!(result, Err(CliError::Extractor(_))));
        assert!(store.list_tags().unwrap().is_empty());
        assert!(store.note_action_items(note.id).unwrap().is_empty());
    }
}
