//! Simulator configuration.
//!
//! Loaded from `~/.dispatch-sim/config.toml`. Every key is optional; a missing
//! file means all defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::controller::DraftPolicy;
use crate::export::RowLayout;
use crate::scenarios::Preset;

/// Environment variable holding the Sheets access token, unless overridden.
pub const DEFAULT_TOKEN_ENV: &str = "DISPATCH_SIM_SHEETS_TOKEN";

/// Simulator configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    /// Built-in scenario book used when `scenarios` is not set.
    pub preset: Preset,

    /// Path to a custom scenario book. Takes precedence over `preset`.
    pub scenarios: Option<PathBuf>,

    /// Whether each round starts from its own seed or from the last answer.
    pub draft_policy: DraftPolicy,

    /// Start at round 1 instead of showing the intro.
    pub skip_intro: bool,

    /// Pause after each submission, in milliseconds. Purely cosmetic.
    pub pacing_ms: u64,

    pub export: ExportConfig,
}

/// Where and how the final row is exported.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ExportConfig {
    pub sink: Sink,

    pub layout: RowLayout,

    /// JSONL file for the `file` sink. Defaults to `~/.dispatch-sim/responses.jsonl`.
    pub file: Option<PathBuf>,

    pub sheets: SheetsConfig,
}

/// Export destinations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Sink {
    /// A Google spreadsheet.
    Sheets,

    /// A local JSONL file.
    #[default]
    File,

    /// Export is switched off; every attempt reports so.
    Disabled,
}

/// Google Sheets settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct SheetsConfig {
    pub spreadsheet_id: Option<String>,

    /// Worksheet title. When unset, the spreadsheet's first worksheet is used.
    pub worksheet: Option<String>,

    /// Name of the environment variable holding the bearer token.
    pub token_env: String,

    pub endpoint: String,

    pub timeout_secs: u64,
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            spreadsheet_id: None,
            worksheet: None,
            token_env: DEFAULT_TOKEN_ENV.to_string(),
            endpoint: "https://sheets.googleapis.com/v4".to_string(),
            timeout_secs: 30,
        }
    }
}

impl Config {
    /// Load config from `~/.dispatch-sim/config.toml`, or defaults if absent.
    pub fn load() -> Result<Self, String> {
        match Self::path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load config from a specific file, or defaults if it doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let contents = match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(format!("failed to read {}: {e}", path.display())),
        };

        toml::from_str(&contents).map_err(|e| format!("invalid config at {}: {e}", path.display()))
    }

    /// The simulator's home directory: `~/.dispatch-sim/`.
    pub fn home() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".dispatch-sim"))
    }

    /// The config file path: `~/.dispatch-sim/config.toml`.
    pub fn path() -> Option<PathBuf> {
        Self::home().map(|h| h.join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();

        assert_eq!(config.preset, Preset::Dispatch);
        assert_eq!(config.draft_policy, DraftPolicy::ScenarioDefault);
        assert!(!config.skip_intro);
        assert_eq!(config.export.sink, Sink::File);
        assert_eq!(config.export.layout, RowLayout::Columns);
        assert_eq!(config.export.sheets.token_env, DEFAULT_TOKEN_ENV);
    }

    #[test]
    fn parses_kebab_case_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
preset = "code-editor"
draft-policy = "carry-over"
skip-intro = true
pacing-ms = 250

[export]
sink = "sheets"
layout = "json"

[export.sheets]
spreadsheet-id = "abc"
token-env = "MY_TOKEN"
"#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();

        assert_eq!(config.preset, Preset::CodeEditor);
        assert_eq!(config.draft_policy, DraftPolicy::CarryOver);
        assert!(config.skip_intro);
        assert_eq!(config.pacing_ms, 250);
        assert_eq!(config.export.sink, Sink::Sheets);
        assert_eq!(config.export.layout, RowLayout::Json);
        assert_eq!(config.export.sheets.spreadsheet_id.as_deref(), Some("abc"));
        assert_eq!(config.export.sheets.token_env, "MY_TOKEN");
        // Unset keys keep their defaults.
        assert_eq!(config.export.sheets.timeout_secs, 30);
    }

    #[test]
    fn invalid_config_names_the_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "draft-policy = \"sometimes\"").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.contains("invalid config"));
        assert!(err.contains("config.toml"));
    }
}
