//! File sink: append rows to a local JSONL file, one JSON array per line.

use std::{fs, io::Write, path::PathBuf};

use super::{ExportRow, Exporter, Result};

/// Appends each row to a local JSONL file.
pub struct FileExporter {
    path: PathBuf,
}

impl FileExporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the default file: `~/.dispatch-sim/responses.jsonl`.
    pub fn default_path() -> Option<PathBuf> {
        crate::config::Config::home().map(|h| h.join("responses.jsonl"))
    }
}

impl Exporter for FileExporter {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn append_row(&self, row: &ExportRow) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut line = serde_json::to_string(row)?;
        line.push('\n');
        file.write_all(line.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::path::Path;

    use jiff::Timestamp;
    use tempfile::TempDir;

    use crate::export::RowLayout;
    use crate::session::{SessionSettings, SessionStore};

    fn sample_row() -> ExportRow {
        let mut store = SessionStore::new(SessionSettings {
            rounds: 2,
            initial_round: 1,
            default_draft: String::new(),
        });
        let session = store.initialize(|| "p".into());
        session
            .append_record(1, "first answer", None, Timestamp::now())
            .unwrap();
        ExportRow::build(session, RowLayout::Columns, Timestamp::now()).unwrap()
    }

    fn read_rows(path: &Path) -> Vec<Vec<String>> {
        fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn appends_one_line_per_row() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("responses.jsonl");
        let exporter = FileExporter::new(&path);
        let row = sample_row();

        exporter.append_row(&row).unwrap();
        exporter.append_row(&row).unwrap();

        let rows = read_rows(&path);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], row.cells());
        assert_eq!(rows[0][2], "first answer");
        assert_eq!(rows[0][3], "");
    }

    #[test]
    fn creates_missing_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("out.jsonl");
        let exporter = FileExporter::new(&path);

        exporter.append_row(&sample_row()).unwrap();

        assert_eq!(read_rows(&path).len(), 1);
    }

    #[test]
    fn reports_unwritable_destination() {
        let dir = TempDir::new().unwrap();
        // A directory where the file should be.
        let exporter = FileExporter::new(dir.path());

        let err = exporter.append_row(&sample_row()).unwrap_err();
        assert!(matches!(err, crate::export::ExportError::Io(_)));
    }
}
