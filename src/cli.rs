//! CLI interface for the simulator.
//!
//! - `dispatch-sim run` — drive one participant session in this terminal.
//! - `dispatch-sim scenarios` — list the rounds of a scenario book.
//! - `dispatch-sim config` — show the config path and effective settings.
//!
//! Flags override the config file; the config file overrides built-in defaults.

mod format;

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::config::Config;
use crate::controller::{Controller, ControllerOptions, DraftPolicy};
use crate::participant::resolve_participant;
use crate::scenarios::{Preset, ScenarioBook};
use crate::session::SessionStore;
use crate::{export, terminal};

use format::{format_book_header, format_round_summary};

/// Dispatch simulator — a five-round prompt-writing questionnaire.
#[derive(Debug, Parser)]
#[command(name = "dispatch-sim", after_long_help = USAGE_HELP)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

const USAGE_HELP: &str = r#"Running a session:
  1. dispatch-sim scenarios --preset code-editor
     → check the rounds the participant will see
  2. dispatch-sim run --as P-017 --preset code-editor
  3. at the end, press 'e' to export; retry as often as needed

Config lives in ~/.dispatch-sim/config.toml. See `dispatch-sim config`."#;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run one questionnaire session in this terminal.
    Run {
        /// Participant identifier. Generated when omitted and
        /// DISPATCH_SIM_PARTICIPANT is unset.
        #[arg(long = "as")]
        participant: Option<String>,

        #[command(flatten)]
        book: BookArgs,

        /// Start each round from the previous answer instead of the round's own seed.
        #[arg(long)]
        carry_over: bool,

        /// Start at round 1 without the intro screen.
        #[arg(long)]
        skip_intro: bool,
    },

    /// List the rounds of a scenario book.
    Scenarios {
        #[command(flatten)]
        book: BookArgs,
    },

    /// Show the config file path and the effective settings as JSON.
    Config,
}

/// Which scenario book to use.
#[derive(Debug, Args)]
pub struct BookArgs {
    /// Built-in scenario book.
    #[arg(long, value_enum, conflicts_with = "scenarios")]
    preset: Option<Preset>,

    /// Path to a TOML scenario book.
    #[arg(long)]
    scenarios: Option<PathBuf>,
}

impl BookArgs {
    /// Resolve the book: flag path, flag preset, config path, config preset.
    fn load(&self, config: &Config) -> Result<ScenarioBook, String> {
        let path = match (&self.scenarios, self.preset) {
            (Some(path), _) => Some(path),
            (None, Some(_)) => None,
            (None, None) => config.scenarios.as_ref(),
        };

        match path {
            Some(path) => ScenarioBook::load(path)
                .map_err(|e| format!("failed to load scenarios from {}: {e}", path.display())),
            None => {
                let preset = self.preset.unwrap_or(config.preset);
                ScenarioBook::preset(preset)
                    .map_err(|e| format!("built-in preset {preset:?} is invalid: {e}"))
            }
        }
    }
}

/// Run the CLI, returning an error message on failure.
pub fn run(config: &Config) -> Result<(), String> {
    let cli = Cli::parse();

    match cli.command {
        Command::Run {
            participant,
            book,
            carry_over,
            skip_intro,
        } => {
            let book = book.load(config)?;
            let options = ControllerOptions {
                draft_policy: if carry_over {
                    DraftPolicy::CarryOver
                } else {
                    config.draft_policy
                },
                skip_intro: skip_intro || config.skip_intro,
                layout: config.export.layout,
            };
            cmd_run(config, &book, options, participant.as_deref())
        }
        Command::Scenarios { book } => {
            cmd_scenarios(&book.load(config)?);
            Ok(())
        }
        Command::Config => cmd_config(config),
    }
}

fn cmd_run(
    config: &Config,
    book: &ScenarioBook,
    options: ControllerOptions,
    participant: Option<&str>,
) -> Result<(), String> {
    let settings = Controller::session_settings(book, options)
        .map_err(|e| format!("failed to prepare session: {e}"))?;
    let exporter = export::from_config(&config.export);

    let mut store = SessionStore::new(settings);
    let session = store.initialize(|| resolve_participant(participant));
    tracing::info!(
        participant = session.participant(),
        rounds = book.rounds(),
        destination = %exporter.describe(),
        "starting session"
    );

    let mut controller = Controller::new(book, session, exporter.as_ref(), options);
    terminal::run(
        &mut controller,
        io::stdin().lock(),
        io::stdout().lock(),
        Duration::from_millis(config.pacing_ms),
    )
    .map_err(|e| format!("terminal error: {e}"))?;

    if let Some(session) = store.session() {
        tracing::info!(
            answered = session.records().len(),
            phase = %session.phase(),
            "session ended"
        );
    }
    Ok(())
}

fn cmd_scenarios(book: &ScenarioBook) {
    println!("{}", format_book_header(book));
    for scenario in book.iter() {
        println!("{}", format_round_summary(scenario));
    }
}

fn cmd_config(config: &Config) -> Result<(), String> {
    match Config::path() {
        Some(path) if path.exists() => eprintln!("Config: {}", path.display()),
        Some(path) => eprintln!("Config: {} (not found, using defaults)", path.display()),
        None => eprintln!("Config: home directory unknown, using defaults"),
    }

    let json = serde_json::to_string_pretty(config)
        .map_err(|e| format!("failed to serialize config: {e}"))?;
    println!("{json}");
    Ok(())
}
