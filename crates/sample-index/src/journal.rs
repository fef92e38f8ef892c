//! Lab journal metadata.
//!
//! The journal maps sample identifiers to project and description. It is
//! loaded wholesale at the start of every refresh and never mutated by the
//! index.
//!
//! - `cache` - JSON save/load of a whole journal
//! - `csv_export` - CSV exports of the journal workbook
//! - `workbook` - the journal workbook itself (`.xlsx`, `.xls`)
//! - `source` - `JournalSource` trait and path-based selection

mod cache;
mod csv_export;
mod source;
mod workbook;

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{ProjectInfo, SampleMetadata, UNCATEGORIZED};

pub use cache::JsonJournal;
pub use csv_export::CsvJournal;
pub use source::{journal_source_for_path, JournalSource, StaticJournal, UnsupportedJournal};
pub use workbook::{XlsxJournal, SAMPLES_SHEET};

/// One journal row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    #[serde(alias = "name")]
    pub sample_id: String,
    #[serde(default)]
    pub project: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub notes: String,
}

impl JournalEntry {
    /// Builds an entry from one sheet row laid out as
    /// `Name, Project, Description, Notes`. Rows with fewer than two cells or
    /// an empty name yield `None`.
    pub fn from_cells<S: AsRef<str>>(cells: &[S]) -> Option<Self> {
        if cells.len() < 2 || cells[0].as_ref().is_empty() {
            return None;
        }
        let cell = |index: usize| {
            cells
                .get(index)
                .map(|value| value.as_ref().to_string())
                .unwrap_or_default()
        };
        Some(Self {
            sample_id: cell(0),
            project: cell(1),
            description: cell(2),
            notes: cell(3),
        })
    }
}

/// A loaded journal snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Journal {
    #[serde(default)]
    samples: HashMap<String, JournalEntry>,
    #[serde(default)]
    projects: BTreeMap<String, ProjectInfo>,
    #[serde(default, alias = "last_updated")]
    loaded_at: Option<DateTime<Utc>>,
}

impl Journal {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a journal from rows. Later rows for the same sample replace
    /// earlier ones.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = JournalEntry>,
    {
        let mut journal = Self::empty();
        for entry in entries {
            journal.insert(entry);
        }
        journal.loaded_at = Some(Utc::now());
        journal
    }

    fn insert(&mut self, entry: JournalEntry) {
        if !entry.project.is_empty() && !self.projects.contains_key(&entry.project) {
            self.projects
                .insert(entry.project.clone(), ProjectInfo::from_name(&entry.project));
        }
        self.samples.insert(entry.sample_id.clone(), entry);
    }

    /// Resolves metadata for a sample. Matching is exact; unknown samples get
    /// the uncategorized defaults.
    pub fn lookup(&self, sample_id: &str) -> SampleMetadata {
        match self.samples.get(sample_id) {
            Some(entry) if !entry.project.is_empty() => SampleMetadata {
                project: entry.project.clone(),
                description: entry.description.clone(),
            },
            Some(entry) => SampleMetadata {
                project: UNCATEGORIZED.to_string(),
                description: entry.description.clone(),
            },
            None => SampleMetadata::default(),
        }
    }

    pub fn entry(&self, sample_id: &str) -> Option<&JournalEntry> {
        self.samples.get(sample_id)
    }

    /// Projects sorted by name, always including the uncategorized bucket.
    pub fn projects(&self) -> Vec<ProjectInfo> {
        let mut projects: Vec<ProjectInfo> = self
            .projects
            .values()
            .filter(|project| project.name != UNCATEGORIZED)
            .cloned()
            .collect();
        projects.push(ProjectInfo::uncategorized());
        projects.sort_by(|a, b| a.name.cmp(&b.name));
        projects
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.loaded_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(super) fn entry(sample_id: &str, project: &str, description: &str) -> JournalEntry {
        JournalEntry {
            sample_id: sample_id.to_string(),
            project: project.to_string(),
            description: description.to_string(),
            notes: String::new(),
        }
    }

    #[test]
    fn lookup_returns_journal_metadata() {
        let journal = Journal::from_entries([entry("A_001", "Lipids", "extract 1")]);
        let metadata = journal.lookup("A_001");
        assert_eq!(metadata.project, "Lipids");
        assert_eq!(metadata.description, "extract 1");
    }

    #[test]
    fn unknown_sample_is_uncategorized() {
        let journal = Journal::from_entries([entry("A_001", "Lipids", "")]);
        assert_eq!(journal.lookup("B_002"), SampleMetadata::default());
    }

    #[test]
    fn lookup_is_exact_match_only() {
        let journal = Journal::from_entries([entry("A_001", "Lipids", "")]);
        assert_eq!(journal.lookup("A_00").project, UNCATEGORIZED);
        assert_eq!(journal.lookup("A_0011").project, UNCATEGORIZED);
        assert_eq!(journal.lookup("a_001").project, UNCATEGORIZED);
    }

    #[test]
    fn empty_project_resolves_to_uncategorized() {
        let journal = Journal::from_entries([entry("A_001", "", "blank")]);
        let metadata = journal.lookup("A_001");
        assert_eq!(metadata.project, UNCATEGORIZED);
        assert_eq!(metadata.description, "blank");
    }

    #[test]
    fn projects_are_sorted_and_include_uncategorized() {
        let journal = Journal::from_entries([
            entry("A", "Proteins", ""),
            entry("B", "Lipids", ""),
            entry("C", "Lipids", ""),
        ]);
        let names: Vec<String> = journal.projects().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["Lipids", "Proteins", UNCATEGORIZED]);
        assert_eq!(journal.projects()[0].description, "Project Lipids");
    }

    #[test]
    fn row_cells_map_to_entry() {
        let entry = JournalEntry::from_cells(&["A_001", "Lipids", "extract"]).expect("entry");
        assert_eq!(entry.sample_id, "A_001");
        assert_eq!(entry.description, "extract");
        assert!(entry.notes.is_empty());
        assert!(JournalEntry::from_cells(&["A_001"]).is_none());
        assert!(JournalEntry::from_cells(&["", "Lipids"]).is_none());
    }

    #[test]
    fn empty_journal_lists_only_uncategorized() {
        let projects = Journal::empty().projects();
        assert_eq!(projects, vec![ProjectInfo::uncategorized()]);
    }
}
