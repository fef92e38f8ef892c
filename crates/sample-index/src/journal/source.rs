//! Journal sources.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::{CsvJournal, Journal, JsonJournal, XlsxJournal};
use crate::error::{IndexError, Result};

/// Supplies a fresh journal snapshot at the start of each refresh.
pub trait JournalSource: Send + Sync {
    fn load(&self) -> Result<Journal>;

    /// Human-readable origin, used in logs.
    fn describe(&self) -> String;
}

/// A fixed, in-memory journal.
#[derive(Debug, Clone, Default)]
pub struct StaticJournal {
    journal: Journal,
}

impl StaticJournal {
    pub fn new(journal: Journal) -> Self {
        Self { journal }
    }
}

impl JournalSource for StaticJournal {
    fn load(&self) -> Result<Journal> {
        Ok(self.journal.clone())
    }

    fn describe(&self) -> String {
        format!("static journal ({} samples)", self.journal.len())
    }
}

/// A configured journal in a format no source can read. Every load reports
/// the journal as unavailable, so refreshes fall back to an empty journal.
#[derive(Debug, Clone)]
pub struct UnsupportedJournal {
    path: PathBuf,
}

impl UnsupportedJournal {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl JournalSource for UnsupportedJournal {
    fn load(&self) -> Result<Journal> {
        Err(IndexError::JournalUnavailable(format!(
            "unsupported journal format: {} (expected .xlsx, .xls, .csv or .json)",
            self.path.display()
        )))
    }

    fn describe(&self) -> String {
        format!("unsupported journal {}", self.path.display())
    }
}

/// Picks a journal source from a configured path.
///
/// `None` yields an empty static journal. `.xlsx`/`.xls` paths are read as
/// the journal workbook, `.csv` paths as workbook exports and `.json` paths as
/// journal caches.
pub fn journal_source_for_path(path: Option<&Path>) -> Arc<dyn JournalSource> {
    let Some(path) = path else {
        return Arc::new(StaticJournal::default());
    };
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    let path = PathBuf::from(path);
    match extension.as_deref() {
        Some("xlsx") | Some("xls") => Arc::new(XlsxJournal::new(path)),
        Some("csv") => Arc::new(CsvJournal::new(path)),
        Some("json") => Arc::new(JsonJournal::new(path)),
        _ => {
            tracing::warn!(
                path = %path.display(),
                "unsupported journal format; samples will be uncategorized"
            );
            Arc::new(UnsupportedJournal::new(path))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::tests::entry;

    #[test]
    fn static_journal_returns_its_contents() {
        let source = StaticJournal::new(Journal::from_entries([entry("A", "Lipids", "")]));
        let journal = source.load().expect("load");
        assert_eq!(journal.lookup("A").project, "Lipids");
    }

    #[test]
    fn missing_path_means_empty_journal() {
        let source = journal_source_for_path(None);
        assert!(source.load().expect("load").is_empty());
    }

    #[test]
    fn source_is_selected_by_extension() {
        let csv = journal_source_for_path(Some(Path::new("/tmp/lab_journal.CSV")));
        assert!(csv.describe().contains("csv"));
        let json = journal_source_for_path(Some(Path::new("/tmp/journal.json")));
        assert!(json.describe().contains("json"));
        let xlsx = journal_source_for_path(Some(Path::new("/tmp/lab_journal.xlsx")));
        assert!(xlsx.describe().contains("xlsx"));
        let xls = journal_source_for_path(Some(Path::new("/tmp/lab_journal.xls")));
        assert!(xls.describe().contains("xlsx"));
    }

    #[test]
    fn unknown_format_degrades_to_unavailable() {
        let source = journal_source_for_path(Some(Path::new("/tmp/lab_journal.ods")));
        let err = source.load().unwrap_err();
        assert!(matches!(err, IndexError::JournalUnavailable(_)));
    }
}
