//! Extract command implementation.

use crate::cli::ExtractArgs;
use crate::commands::read_text;
use crate::error::Result;
use crate::output::Formatter;
use gleaner_domain::traits::LlmProvider;
use gleaner_extractor::ExtractionOrchestrator;
use gleaner_llm::LlmError;

/// Execute the extract command. Nothing is persisted.
pub async fn execute_extract<L>(
    args: ExtractArgs,
    orchestrator: &ExtractionOrchestrator<L>,
    formatter: &Formatter,
) -> Result<String>
where
    L: LlmProvider<Error = LlmError> + Send + Sync + 'static,
{
    let text = read_text(args.text, args.file.as_deref(), args.stdin)?;
    let result = orchestrator.extract(&text, args.mode.into()).await?;
    formatter.format_extraction(&result)
}
