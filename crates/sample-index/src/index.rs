//! The published sample index.
//!
//! Readers clone an `Arc` to the current [`SampleSnapshot`] under a short read
//! lock and then work on that generation without holding any lock. A refresh
//! builds its snapshot elsewhere and publishes it with [`SampleIndex::replace`],
//! which only swaps the `Arc`. A reader therefore sees one whole generation,
//! never a mix, and the previous generation stays alive for as long as some
//! reader still holds it.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{IndexError, Result};
use crate::snapshot::SampleSnapshot;
use crate::types::{ProjectInfo, SampleRecord};

#[derive(Debug)]
pub struct SampleIndex {
    current: RwLock<Arc<SampleSnapshot>>,
}

impl Default for SampleIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl SampleIndex {
    pub fn new() -> Self {
        Self::with_snapshot(SampleSnapshot::empty())
    }

    pub fn with_snapshot(snapshot: SampleSnapshot) -> Self {
        Self {
            current: RwLock::new(Arc::new(snapshot)),
        }
    }

    /// Returns the current generation.
    pub fn snapshot(&self) -> Arc<SampleSnapshot> {
        self.current.read().clone()
    }

    /// All records sorted by sample identifier.
    pub fn get_all(&self) -> Vec<SampleRecord> {
        self.snapshot().sorted().into_iter().cloned().collect()
    }

    pub fn get(&self, sample_id: &str) -> Result<SampleRecord> {
        self.snapshot()
            .get(sample_id)
            .cloned()
            .ok_or_else(|| IndexError::NotFound(sample_id.to_string()))
    }

    pub fn projects(&self) -> Vec<ProjectInfo> {
        self.snapshot().projects().to_vec()
    }

    pub fn samples_in_project(&self, project: &str) -> Vec<SampleRecord> {
        self.snapshot()
            .in_project(project)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Publishes a new generation and returns the one it replaced.
    pub fn replace(&self, snapshot: SampleSnapshot) -> Arc<SampleSnapshot> {
        let next = Arc::new(snapshot);
        std::mem::replace(&mut *self.current.write(), next)
    }

    pub fn generation(&self) -> u64 {
        self.current.read().generation()
    }

    pub fn len(&self) -> usize {
        self.current.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.read().is_empty()
    }
}
