//! Folding parsed files into sample records.
//!
//! Aggregation is two-phase: every sample accumulates in a [`SampleBuilder`]
//! during one pass, and the builders are frozen into immutable
//! [`SampleRecord`]s when the pass finishes.
//!
//! ## Main-file selection
//!
//! The first file of a sample whose name carried no label separator is main.
//! When a sample only has labelled files, the first file in scan order becomes
//! main. That fallback depends on scan order alone and says nothing about
//! which file is semantically representative.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::collection::FileCollection;
use crate::journal::Journal;
use crate::kinds::SupportedKinds;
use crate::parser::parse_entry;
use crate::snapshot::SampleSnapshot;
use crate::types::{FileEntry, GraphRef, ParsedFile, SampleMetadata, SampleRecord};

/// Files collected for one sample during a pass.
#[derive(Debug)]
struct SampleBuilder {
    metadata: SampleMetadata,
    files: Vec<GraphRef>,
    natural_main: Option<usize>,
    earliest_modified: Option<DateTime<Utc>>,
}

impl SampleBuilder {
    fn new(metadata: SampleMetadata) -> Self {
        Self {
            metadata,
            files: Vec::new(),
            natural_main: None,
            earliest_modified: None,
        }
    }

    fn push(&mut self, parsed: ParsedFile, file: PendingFile) {
        if parsed.natural_main && self.natural_main.is_none() {
            self.natural_main = Some(self.files.len());
        }
        if let Some(modified) = file.modified_at {
            self.earliest_modified = Some(match self.earliest_modified {
                Some(current) => current.min(modified),
                None => modified,
            });
        }
        self.files.push(GraphRef {
            label: parsed.label,
            file_name: file.file_name,
            location: file.location,
            kind: parsed.kind,
            extension: parsed.extension,
            is_main: false,
        });
    }

    fn freeze(mut self, sample_id: String, built_at: DateTime<Utc>) -> SampleRecord {
        let main_index = self.natural_main.unwrap_or(0);
        if let Some(main) = self.files.get_mut(main_index) {
            main.is_main = true;
        }
        SampleRecord {
            sample_id,
            project: self.metadata.project,
            description: self.metadata.description,
            has_multiple: self.files.len() > 1,
            files: self.files,
            created_at: self.earliest_modified.unwrap_or(built_at),
        }
    }
}

/// Location data of a file that passed parsing.
#[derive(Debug, Clone)]
pub struct PendingFile {
    pub file_name: String,
    pub location: String,
    pub modified_at: Option<DateTime<Utc>>,
}

/// Accumulates one scan pass.
#[derive(Debug)]
pub struct Aggregator<'a> {
    journal: &'a Journal,
    builders: HashMap<String, SampleBuilder>,
}

impl<'a> Aggregator<'a> {
    pub fn new(journal: &'a Journal) -> Self {
        Self {
            journal,
            builders: HashMap::new(),
        }
    }

    /// Adds one parsed file. The journal is consulted only on the first file
    /// of each sample.
    pub fn push(&mut self, parsed: ParsedFile, file: PendingFile) {
        let journal = self.journal;
        self.builders
            .entry(parsed.sample_id.clone())
            .or_insert_with(|| SampleBuilder::new(journal.lookup(&parsed.sample_id)))
            .push(parsed, file);
    }

    /// Freezes every builder into a snapshot.
    pub fn finish(self, generation: u64, built_at: DateTime<Utc>) -> SampleSnapshot {
        let samples = self
            .builders
            .into_iter()
            .map(|(sample_id, builder)| {
                let record = builder.freeze(sample_id.clone(), built_at);
                (sample_id, record)
            })
            .collect();
        SampleSnapshot::new(samples, self.journal.projects(), generation, built_at)
    }
}

/// Outcome of aggregating one listing.
#[derive(Debug)]
pub struct AggregateOutcome {
    pub snapshot: SampleSnapshot,
    /// Entries seen in the listing.
    pub seen: usize,
    /// Entries that were not indexable.
    pub skipped: usize,
}

/// Runs parse, join and aggregate over a complete listing.
pub fn aggregate_entries(
    entries: Vec<FileEntry>,
    collection: &dyn FileCollection,
    journal: &Journal,
    kinds: &SupportedKinds,
    generation: u64,
) -> AggregateOutcome {
    let seen = entries.len();
    let mut skipped = 0;
    let mut aggregator = Aggregator::new(journal);

    for entry in entries {
        let Some(parsed) = parse_entry(&entry, kinds) else {
            tracing::debug!(name = %entry.name, "entry not indexable");
            skipped += 1;
            continue;
        };
        let file = PendingFile {
            location: collection.location_of(&entry),
            file_name: entry.name,
            modified_at: entry.modified_at,
        };
        aggregator.push(parsed, file);
    }

    AggregateOutcome {
        snapshot: aggregator.finish(generation, Utc::now()),
        seen,
        skipped,
    }
}
