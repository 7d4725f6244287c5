//! Gleaner CLI - Extract tags and action items from notes.

use clap::Parser;
use gleaner_cli::commands;
use gleaner_cli::config::OutputFormat;
use gleaner_cli::{Cli, Command, Config, Formatter};
use gleaner_extractor::ExtractionOrchestrator;
use gleaner_store::SqliteStore;
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Config may not have loaded, so only --no-color is honored here
    let errors = Formatter::new(OutputFormat::Table, !cli.no_color);
    if let Err(e) = run(cli).await {
        eprintln!("{}", errors.error(&e.to_string()));
        std::process::exit(1);
    }
}

/// Log to stderr; `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> gleaner_cli::Result<()> {
    let mut config = Config::load(cli.config.as_deref())?;
    config.apply_env_overrides()?;

    let format = cli.format.map(Into::into).unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    let output = match cli.command {
        Command::Extract(args) => {
            let orchestrator = ExtractionOrchestrator::with_ollama(config.extractor.clone())?;
            commands::execute_extract(args, &orchestrator, &formatter).await?
        }
        Command::Note(args) => {
            let mut store = open_store(cli.db, &config)?;
            commands::execute_note(args, &mut store, &formatter)?
        }
        Command::Tags => {
            let store = open_store(cli.db, &config)?;
            commands::execute_tags(&store, &formatter)?
        }
        Command::Apply(args) => {
            let mut store = open_store(cli.db, &config)?;
            let orchestrator = ExtractionOrchestrator::with_ollama(config.extractor.clone())?;
            commands::execute_apply(args, &mut store, &orchestrator, &formatter).await?
        }
    };

    println!("{}", output);
    Ok(())
}

fn open_store(db: Option<PathBuf>, config: &Config) -> gleaner_cli::Result<SqliteStore> {
    let db_path = db.unwrap_or_else(|| config.database_path.clone());
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(SqliteStore::new(&db_path)?.with_reconcile_config(config.reconcile.into()))
}
