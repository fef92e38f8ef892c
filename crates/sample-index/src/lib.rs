//! Sample index for laboratory result files.
//!
//! This crate turns a directory of result files into samples:
//! - File name parsing into sample identifier and label
//! - Journal metadata lookup (project, description)
//! - Grouping files per sample with main-file selection
//! - An atomically swapped snapshot for concurrent readers
//! - Scheduled and on-demand refresh

pub mod aggregate;
pub mod collection;
pub mod error;
pub mod index;
pub mod journal;
pub mod kinds;
pub mod parser;
pub mod refresh;
pub mod scheduler;
pub mod snapshot;
pub mod types;

// Re-export main types
pub use collection::{DirectoryCollection, FileCollection, DEFAULT_URL_PREFIX};
pub use error::{IndexError, Result};
pub use index::SampleIndex;
pub use journal::{
    journal_source_for_path, CsvJournal, Journal, JournalEntry, JournalSource, JsonJournal,
    StaticJournal, UnsupportedJournal, XlsxJournal, SAMPLES_SHEET,
};
pub use kinds::{SupportedKinds, KNOWN_EXTENSIONS};
pub use parser::{parse_file_name, LABEL_SEPARATOR};
pub use refresh::{RefreshController, RefreshReport, RefreshState, RefreshStatus, RefreshTrigger};
pub use scheduler::{RefreshScheduler, DEFAULT_REFRESH_INTERVAL};
pub use snapshot::SampleSnapshot;
pub use types::{
    FileEntry, FileKind, GraphRef, ParsedFile, ProjectInfo, SampleMetadata, SampleRecord,
    MAIN_LABEL, UNCATEGORIZED,
};
