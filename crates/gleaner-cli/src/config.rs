//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use gleaner_extractor::ExtractorConfig;
use gleaner_store::ReconcileConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// SQLite database location
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    /// Extraction settings
    ///
    /// When the section is absent the rule backend is used and LLM errors
    /// are returned. When present, `fallback` must be set.
    #[serde(default = "ExtractorConfig::rule_only")]
    pub extractor: ExtractorConfig,

    /// Apply settings
    #[serde(default)]
    pub reconcile: ReconcileSettings,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,
}

/// Settings for applying extraction results.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ReconcileSettings {
    /// Skip action items already present on the note
    #[serde(default = "default_true")]
    pub skip_existing_action_items: bool,
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
}

impl Config {
    /// Get the default configuration file path.
    pub fn path() -> Result<PathBuf> {
        Ok(gleaner_home()?.join("config.toml"))
    }

    /// Load configuration from `path`, or the default location
    ///
    /// A missing file at the default location yields the default
    /// configuration; a missing file at an explicit path is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let path = Self::path()?;
                if path.exists() {
                    Self::from_file(&path)?
                } else {
                    Self::default()
                }
            }
        };
        config.extractor.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Ok(toml::from_str(&contents)?)
    }

    /// Apply `GLEANER_*` environment overrides to the extractor settings.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.extractor.apply_env_overrides()?;
        self.extractor.validate()?;
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            extractor: ExtractorConfig::rule_only(),
            reconcile: ReconcileSettings::default(),
            settings: Settings::default(),
        }
    }
}

impl Default for ReconcileSettings {
    fn default() -> Self {
        Self {
            skip_existing_action_items: true,
        }
    }
}

impl From<ReconcileSettings> for ReconcileConfig {
    fn from(settings: ReconcileSettings) -> Self {
        ReconcileConfig {
            skip_existing_action_items: settings.skip_existing_action_items,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

fn gleaner_home() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
    Ok(home.join(".gleaner"))
}

fn default_database_path() -> PathBuf {
    gleaner_home()
        .unwrap_or_else(|_| PathBuf::from(".gleaner"))
        .join("gleaner.db")
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

#[cfg(test)]
mod tests {
    use super::*;
    use gleaner_extractor::{BackendKind, FallbackPolicy};

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.settings.color);
        assert_eq!(config.settings.format, OutputFormat::Table);
        assert_eq!(config.extractor.default_backend, BackendKind::Rule);
        assert!(config.reconcile.skip_existing_action_items);
        assert!(config.database_path.ends_with("gleaner.db"));
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.extractor, ExtractorConfig::rule_only());
    }

    #[test]
    fn test_extractor_section_requires_fallback() {
        let result: std::result::Result<Config, _> = toml::from_str(
            r#"
            [extractor]
            default_backend = "llm"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_full_file() {
        let config: Config = toml::from_str(
            r#"
            database_path = "/tmp/notes.db"

            [extractor]
            default_backend = "llm"
            fallback = "rule"

            [extractor.llm]
            model = "qwen2.5:7b"
            timeout_secs = 10

            [reconcile]
            skip_existing_action_items = false

            [settings]
            format = "json"
            color = false
            "#,
        )
        .unwrap();

        assert_eq!(config.database_path, PathBuf::from("/tmp/notes.db"));
        assert_eq!(config.extractor.fallback, FallbackPolicy::Rule);
        assert_eq!(config.extractor.llm.model, "qwen2.5:7b");
        assert!(!config.reconcile.skip_existing_action_items);
        assert_eq!(config.settings.format, OutputFormat::Json);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.extractor = ExtractorConfig::llm_with_fallback();
        fs::write(&path, toml::to_string_pretty(&config).unwrap()).unwrap();

        let loaded = Config::load(Some(&path)).unwrap();
        assert_eq!(loaded.extractor, config.extractor);
    }

    #[test]
    fn test_explicit_missing_path_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load(Some(&dir.path().join("missing.toml")));
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn test_bad_endpoint_fails_at_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
            [extractor]
            default_backend = "llm"
            fallback = "rule"

            [extractor.llm]
            endpoint = "ftp://gpu-box:21"
            "#,
        )
        .unwrap();

        assert!(matches!(
            Config::load(Some(&path)),
            Err(CliError::Extractor(_))
        ));
    }
}
