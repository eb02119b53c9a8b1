//! Export: shaping a session's responses into one row and appending it to a
//! tabular store.
//!
//! Every sink implements [`Exporter`]. Sinks report failures as
//! [`ExportError`]; the controller turns the outcome into an [`ExportReport`]
//! so nothing escapes the export action.

mod file;
mod sheets;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::config::{ExportConfig, Sink};
use crate::session::Session;

pub use file::FileExporter;
pub use sheets::SheetsExporter;

/// Errors that can occur while exporting a row.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("export not configured: {0}")]
    NotConfigured(String),

    #[error("no access token: set the {0} environment variable")]
    MissingToken(String),

    #[error("authentication failed: {0}")]
    Unauthorized(String),

    #[error("remote resource not found: {0}")]
    NotFound(String),

    #[error("remote service returned {status}: {message}")]
    Remote { status: u16, message: String },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = core::result::Result<T, ExportError>;

/// How responses are laid out in the exported row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RowLayout {
    /// `[timestamp, participant, response_1, ..., response_N]`.
    #[default]
    Columns,

    /// `[timestamp, participant, <JSON array of records>]`.
    Json,
}

/// One row destined for the tabular store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ExportRow {
    cells: Vec<String>,
}

impl ExportRow {
    /// Shape a session's log into a row.
    ///
    /// With [`RowLayout::Columns`] the row always has `2 + N` cells: rounds
    /// without a response are written as empty strings.
    pub fn build(session: &Session, layout: RowLayout, exported_at: Timestamp) -> Result<Self> {
        let mut cells = vec![exported_at.to_string(), session.participant().to_string()];

        match layout {
            RowLayout::Columns => {
                cells.extend((1..=session.rounds()).map(|round| {
                    session
                        .response(round)
                        .map(|r| r.content.clone())
                        .unwrap_or_default()
                }));
            }
            RowLayout::Json => cells.push(serde_json::to_string(session.records())?),
        }

        Ok(Self { cells })
    }

    pub fn cells(&self) -> &[String] {
        &self.cells
    }
}

/// A destination that accepts exported rows.
pub trait Exporter {
    /// Short human-readable name of the destination.
    fn describe(&self) -> String;

    /// Append one row to the destination.
    fn append_row(&self, row: &ExportRow) -> Result<()>;
}

/// Outcome of one export attempt, ready to show to the participant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub success: bool,
    pub diagnostic: String,
}

impl ExportReport {
    pub fn from_result(destination: &str, result: &Result<()>) -> Self {
        match result {
            Ok(()) => Self {
                success: true,
                diagnostic: format!("responses saved to {destination}"),
            },
            Err(e) => Self {
                success: false,
                diagnostic: format!("could not save to {destination}: {e}"),
            },
        }
    }
}

/// Sink used when export is switched off.
pub struct DisabledExporter;

impl Exporter for DisabledExporter {
    fn describe(&self) -> String {
        "nowhere".to_string()
    }

    fn append_row(&self, _row: &ExportRow) -> Result<()> {
        Err(ExportError::NotConfigured("export sink is disabled".into()))
    }
}

/// Build the exporter selected by configuration.
pub fn from_config(config: &ExportConfig) -> Box<dyn Exporter> {
    match config.sink {
        Sink::Sheets => Box::new(SheetsExporter::new(config.sheets.clone())),
        Sink::File => match config.file.clone().or_else(FileExporter::default_path) {
            Some(path) => Box::new(FileExporter::new(path)),
            None => Box::new(DisabledExporter),
        },
        Sink::Disabled => Box::new(DisabledExporter),
    }
}
