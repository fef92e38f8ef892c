//! Immutable generations of the sample index.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::types::{ProjectInfo, SampleRecord};

/// One complete generation of the index.
///
/// Built from scratch by each refresh and never mutated after publication.
#[derive(Debug, Clone)]
pub struct SampleSnapshot {
    samples: HashMap<String, SampleRecord>,
    projects: Vec<ProjectInfo>,
    generation: u64,
    built_at: DateTime<Utc>,
}

impl SampleSnapshot {
    pub fn new(
        samples: HashMap<String, SampleRecord>,
        projects: Vec<ProjectInfo>,
        generation: u64,
        built_at: DateTime<Utc>,
    ) -> Self {
        Self {
            samples,
            projects,
            generation,
            built_at,
        }
    }

    /// The generation-0 snapshot served before the first refresh completes.
    pub fn empty() -> Self {
        Self::new(
            HashMap::new(),
            vec![ProjectInfo::uncategorized()],
            0,
            Utc::now(),
        )
    }

    pub fn get(&self, sample_id: &str) -> Option<&SampleRecord> {
        self.samples.get(sample_id)
    }

    /// All records ordered by sample identifier.
    pub fn sorted(&self) -> Vec<&SampleRecord> {
        let mut records: Vec<&SampleRecord> = self.samples.values().collect();
        records.sort_by(|a, b| a.sample_id.cmp(&b.sample_id));
        records
    }

    /// Records of one project ordered by sample identifier.
    pub fn in_project(&self, project: &str) -> Vec<&SampleRecord> {
        let mut records: Vec<&SampleRecord> = self
            .samples
            .values()
            .filter(|record| record.project == project)
            .collect();
        records.sort_by(|a, b| a.sample_id.cmp(&b.sample_id));
        records
    }

    pub fn projects(&self) -> &[ProjectInfo] {
        &self.projects
    }

    pub fn file_count(&self) -> usize {
        self.samples.values().map(|record| record.files.len()).sum()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn built_at(&self) -> DateTime<Utc> {
        self.built_at
    }
}
