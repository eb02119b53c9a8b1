//! Scenario books: the static round-to-scenario mapping.
//!
//! A book is loaded once at startup, either from a built-in preset or from a
//! TOML file, validated, and then only ever read:
//!
//! ```toml
//! default-draft = "..."
//!
//! [[scenario]]
//! round = 1
//! title = "..."
//! status = "..."
//! message = "..."
//! ```

use std::{fs, io, path::Path};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::model::Scenario;

const DISPATCH: &str = include_str!("scenarios/dispatch.toml");
const CODE_EDITOR: &str = include_str!("scenarios/code-editor.toml");

/// Errors that can occur while loading or reading a scenario book.
#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    #[error("no scenario registered for round {0}")]
    UnknownRound(u32),

    #[error("scenario book has no scenarios")]
    Empty,

    #[error("scenario rounds must run 1, 2, 3...: expected round {expected}, found {found}")]
    NonContiguous { expected: u32, found: u32 },

    #[error("scenario for round {0} has an empty title")]
    EmptyTitle(u32),

    #[error("invalid scenario book: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = core::result::Result<T, ScenarioError>;

/// Built-in scenario books.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Preset {
    /// Prompt-writing rounds: one system prompt edited across the session.
    #[default]
    Dispatch,

    /// Code-edit rounds: sample code per round, answered with instructions.
    CodeEditor,
}

/// On-disk shape of a book.
#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
struct BookFile {
    #[serde(default)]
    default_draft: String,

    #[serde(default, rename = "scenario")]
    scenarios: Vec<Scenario>,
}

/// A validated, read-only set of scenarios numbered `1..=N`.
#[derive(Debug, Clone)]
pub struct ScenarioBook {
    default_draft: String,
    scenarios: Vec<Scenario>,
}

impl ScenarioBook {
    /// Build a book from scenarios, checking that rounds run `1..=N`.
    ///
    /// Scenarios may arrive in any order; they are sorted by round first.
    pub fn new(default_draft: impl Into<String>, mut scenarios: Vec<Scenario>) -> Result<Self> {
        if scenarios.is_empty() {
            return Err(ScenarioError::Empty);
        }
        scenarios.sort_by_key(|s| s.round);

        for (expected, scenario) in (1..).zip(&scenarios) {
            if scenario.round != expected {
                return Err(ScenarioError::NonContiguous {
                    expected,
                    found: scenario.round,
                });
            }
            if scenario.title.trim().is_empty() {
                return Err(ScenarioError::EmptyTitle(scenario.round));
            }
        }

        let default_draft: String = default_draft.into();
        Ok(Self {
            default_draft: default_draft.trim().to_string(),
            scenarios,
        })
    }

    /// Parse a book from TOML text.
    pub fn from_toml(text: &str) -> Result<Self> {
        let file: BookFile = toml::from_str(text)?;
        Self::new(file.default_draft, file.scenarios)
    }

    /// Read and parse a book from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    /// One of the built-in books.
    pub fn preset(preset: Preset) -> Result<Self> {
        match preset {
            Preset::Dispatch => Self::from_toml(DISPATCH),
            Preset::CodeEditor => Self::from_toml(CODE_EDITOR),
        }
    }

    /// Number of active rounds, `N`.
    pub fn rounds(&self) -> u32 {
        // Rounds are contiguous from 1, so the last one is the count.
        self.scenarios.last().map_or(0, |s| s.round)
    }

    /// The scenario registered for `round`.
    pub fn lookup(&self, round: u32) -> Result<&Scenario> {
        round
            .checked_sub(1)
            .and_then(|i| usize::try_from(i).ok())
            .and_then(|i| self.scenarios.get(i))
            .ok_or(ScenarioError::UnknownRound(round))
    }

    /// The fixed draft a fresh session starts from.
    pub fn default_draft(&self) -> &str {
        &self.default_draft
    }

    /// The text a round's input starts from when drafts don't carry over.
    ///
    /// Falls back from the scenario's own draft to its sample code, then to
    /// the book's default draft.
    pub fn seed_for(&self, round: u32) -> Result<&str> {
        let scenario = self.lookup(round)?;
        Ok(scenario
            .draft
            .as_deref()
            .or(scenario.sample.as_deref())
            .unwrap_or(&self.default_draft))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Scenario> {
        self.scenarios.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    fn scenario(round: u32) -> Scenario {
        Scenario {
            round,
            title: format!("Round {round}"),
            icon: None,
            status: "status".into(),
            metrics: vec![],
            message: "message".into(),
            sample: None,
            variables: vec![],
            draft: None,
        }
    }

    #[test]
    fn presets_have_five_rounds() {
        for preset in [Preset::Dispatch, Preset::CodeEditor] {
            let book = ScenarioBook::preset(preset).unwrap();
            assert_eq!(book.rounds(), 5, "{preset:?}");
        }
    }

    #[test]
    fn dispatch_preset_seeds_from_default_draft() {
        let book = ScenarioBook::preset(Preset::Dispatch).unwrap();
        assert!(book.default_draft().starts_with("[System Role]"));
        for round in 1..=book.rounds() {
            assert_eq!(book.seed_for(round).unwrap(), book.default_draft());
        }
    }

    #[test]
    fn code_editor_preset_carries_samples_and_variables() {
        let book = ScenarioBook::preset(Preset::CodeEditor).unwrap();
        for scenario in book.iter() {
            assert!(scenario.sample.is_some(), "round {}", scenario.round);
            assert!(!scenario.variables.is_empty(), "round {}", scenario.round);
        }
        // An explicit empty draft wins over the sample code.
        assert_eq!(book.seed_for(1).unwrap(), "");
    }

    #[test]
    fn sorts_unordered_scenarios() {
        let book = ScenarioBook::new("", vec![scenario(2), scenario(1)]).unwrap();
        assert_eq!(book.lookup(1).unwrap().title, "Round 1");
        assert_eq!(book.rounds(), 2);
    }

    #[test]
    fn rejects_empty_book() {
        let err = ScenarioBook::new("", vec![]).unwrap_err();
        assert!(matches!(err, ScenarioError::Empty));
    }

    #[test]
    fn rejects_gap_in_rounds() {
        let err = ScenarioBook::new("", vec![scenario(1), scenario(3)]).unwrap_err();
        assert!(matches!(
            err,
            ScenarioError::NonContiguous {
                expected: 2,
                found: 3
            }
        ));
    }

    #[test]
    fn rejects_book_not_starting_at_one() {
        let err = ScenarioBook::new("", vec![scenario(0), scenario(1)]).unwrap_err();
        assert!(matches!(err, ScenarioError::NonContiguous { .. }));
    }

    #[test]
    fn rejects_blank_title() {
        let mut s = scenario(1);
        s.title = "  ".into();
        let err = ScenarioBook::new("", vec![s]).unwrap_err();
        assert!(matches!(err, ScenarioError::EmptyTitle(1)));
    }

    #[test]
    fn lookup_outside_range_is_unknown_round() {
        let book = ScenarioBook::new("", vec![scenario(1)]).unwrap();
        assert!(matches!(book.lookup(0), Err(ScenarioError::UnknownRound(0))));
        assert!(matches!(book.lookup(2), Err(ScenarioError::UnknownRound(2))));
    }

    #[test]
    fn seed_prefers_sample_over_default() {
        let mut s = scenario(1);
        s.sample = Some("print(1)".into());
        let book = ScenarioBook::new("default", vec![s, scenario(2)]).unwrap();
        assert_eq!(book.seed_for(1).unwrap(), "print(1)");
        assert_eq!(book.seed_for(2).unwrap(), "default");
    }

    #[test]
    fn loads_book_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("book.toml");
        fs::write(
            &path,
            r#"
default-draft = "Start here"

[[scenario]]
round = 1
title = "Only round"
status = "Calm"
message = "Say something"

[[scenario.metrics]]
label = "Revenue"
value = "Flat"
"#,
        )
        .unwrap();

        let book = ScenarioBook::load(&path).unwrap();
        assert_eq!(book.rounds(), 1);
        assert_eq!(book.default_draft(), "Start here");
        assert_eq!(book.lookup(1).unwrap().metrics[0].value, "Flat");
    }

    #[test]
    fn reports_malformed_toml() {
        let err = ScenarioBook::from_toml("[[scenario]]\nround = \"one\"").unwrap_err();
        assert!(matches!(err, ScenarioError::Parse(_)));
    }
}
