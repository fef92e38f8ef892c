//! CSV exports of the lab journal workbook.
//!
//! Layout: one header row, then `Name, Project, Description, Notes`. Rows
//! with fewer than two cells are ignored.

use std::path::PathBuf;

use super::{Journal, JournalEntry, JournalSource};
use crate::error::{IndexError, Result};

#[derive(Debug, Clone)]
pub struct CsvJournal {
    path: PathBuf,
}

impl CsvJournal {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl JournalSource for CsvJournal {
    fn load(&self) -> Result<Journal> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(&self.path)
            .map_err(|error| {
                IndexError::JournalUnavailable(format!(
                    "failed to open {}: {error}",
                    self.path.display()
                ))
            })?;

        let mut entries = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|error| {
                IndexError::JournalUnavailable(format!(
                    "failed to read {}: {error}",
                    self.path.display()
                ))
            })?;
            let cells: Vec<&str> = record.iter().collect();
            if let Some(entry) = JournalEntry::from_cells(&cells) {
                entries.push(entry);
            }
        }

        tracing::debug!(
            path = %self.path.display(),
            rows = entries.len(),
            "loaded journal csv"
        );
        Ok(Journal::from_entries(entries))
    }

    fn describe(&self) -> String {
        format!("csv journal {}", self.path.display())
    }
}
