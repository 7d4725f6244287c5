//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use gleaner_extractor::ExtractionMode;
use std::path::PathBuf;

/// Gleaner CLI - Extract tags and action items from notes.
#[derive(Debug, Parser)]
#[command(name = "gleaner")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Database file path
    #[arg(long, global = true, env = "GLEANER_DB")]
    pub db: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract tags and action items from text without saving anything
    Extract(ExtractArgs),

    /// Manage notes
    Note(NoteArgs),

    /// Extract from a note's content and attach the results to it
    Apply(ApplyArgs),

    /// List all tags
    Tags,
}

/// Extraction backend argument.
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum ModeArg {
    /// Rule-based extraction
    Rule,
    /// LLM-backed extraction
    Llm,
    /// Backend from configuration
    #[default]
    Default,
}

/// Arguments for the extract command.
#[derive(Debug, Parser)]
pub struct ExtractArgs {
    /// Text to extract from
    pub text: Option<String>,

    /// Read text from a file
    #[arg(short = 'i', long, conflicts_with_all = ["text", "stdin"])]
    pub file: Option<PathBuf>,

    /// Read text from stdin
    #[arg(long, conflicts_with = "text")]
    pub stdin: bool,

    /// Extraction backend
    #[arg(short, long, value_enum, default_value = "default")]
    pub mode: ModeArg,
}

/// Arguments for note management.
#[derive(Debug, Parser)]
pub struct NoteArgs {
    #[command(subcommand)]
    pub action: NoteAction,
}

/// Note management actions.
#[derive(Debug, Subcommand)]
pub enum NoteAction {
    /// Create a note
    Create {
        /// Note title
        #[arg(short, long)]
        title: String,

        /// Note content
        #[arg(long, conflicts_with = "file")]
        content: Option<String>,

        /// Read content from a file
        #[arg(short = 'i', long)]
        file: Option<PathBuf>,
    },

    /// Show a note with its tags and action items
    Show {
        /// Note ID
        id: String,
    },

    /// List all notes
    List,
}

/// Arguments for the apply command.
#[derive(Debug, Parser)]
pub struct ApplyArgs {
    /// Note ID
    pub note_id: String,

    /// Extraction backend
    #[arg(short, long, value_enum, default_value = "default")]
    pub mode: ModeArg,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
        }
    }
}

impl From<ModeArg> for ExtractionMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Rule => ExtractionMode::Rule,
            ModeArg::Llm => ExtractionMode::Llm,
            ModeArg::Default => ExtractionMode::Default,
        }
    }
}
