mod cli;
mod config;
mod controller;
mod export;
mod model;
mod participant;
mod scenarios;
mod session;
mod terminal;

use std::fs::{self, OpenOptions};
use std::process;

use config::Config;

fn main() {
    init_logging();

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = cli::run(&config) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

/// Log to `~/.dispatch-sim/logs/dispatch-sim.log` so the terminal stays clean.
///
/// Logging is skipped when the log file can't be opened.
fn init_logging() {
    let Some(dir) = Config::home().map(|h| h.join("logs")) else {
        return;
    };
    if fs::create_dir_all(&dir).is_err() {
        return;
    }
    let Ok(log_file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("dispatch-sim.log"))
    else {
        return;
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .init();
}
