//! Refresh controller.
//!
//! A refresh lists the file collection, parses and aggregates the entries
//! against a freshly loaded journal, and publishes the result with
//! [`SampleIndex::replace`]. Every trigger (timer, API, startup) goes through
//! the same rebuild routine.
//!
//! Refreshes are serialized on a FIFO-fair lane: a request that arrives while
//! another refresh runs waits for it and then performs its own rebuild.
//! A failed listing leaves the published snapshot untouched.

use std::sync::atomic::{AtomicU64, AtomicU8, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;

use crate::aggregate::aggregate_entries;
use crate::collection::FileCollection;
use crate::error::{IndexError, Result};
use crate::index::SampleIndex;
use crate::journal::{Journal, JournalSource};
use crate::kinds::SupportedKinds;

/// What caused a refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshTrigger {
    Startup,
    Scheduled,
    OnDemand,
}

impl RefreshTrigger {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Startup => "startup",
            Self::Scheduled => "scheduled",
            Self::OnDemand => "on_demand",
        }
    }
}

/// Refresh state.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[repr(u8)]
pub enum RefreshState {
    Idle = 0,
    Refreshing = 1,
    Ready = 2,
    Error = 3,
}

impl RefreshState {
    /// Loads the state from an atomic.
    pub fn load(atomic: &AtomicU8) -> Self {
        match atomic.load(Ordering::Relaxed) {
            1 => Self::Refreshing,
            2 => Self::Ready,
            3 => Self::Error,
            _ => Self::Idle,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Refreshing => "refreshing",
            Self::Ready => "ready",
            Self::Error => "error",
        }
    }
}

/// Summary of one successful refresh.
#[derive(Debug, Clone, Serialize)]
pub struct RefreshReport {
    pub generation: u64,
    pub trigger: RefreshTrigger,
    pub sample_count: usize,
    pub file_count: usize,
    pub skipped_entries: usize,
    pub journal_loaded: bool,
    pub duration_ms: u64,
    pub finished_at: DateTime<Utc>,
}

/// Counters describing the most recent refresh.
#[derive(Debug, Default)]
struct RefreshProgress {
    seen_entries: AtomicUsize,
    indexed_files: AtomicUsize,
    skipped_entries: AtomicUsize,
    completed: AtomicU64,
    failed: AtomicU64,
}

/// Point-in-time view of the controller for status reporting.
#[derive(Debug, Clone)]
pub struct RefreshStatus {
    pub state: RefreshState,
    pub generation: u64,
    pub sample_count: usize,
    pub seen_entries: usize,
    pub indexed_files: usize,
    pub skipped_entries: usize,
    pub completed_refreshes: u64,
    pub failed_refreshes: u64,
    pub last_started_at: Option<DateTime<Utc>>,
    pub last_finished_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub source: String,
}

#[derive(Debug, Default)]
struct RefreshTimes {
    started_at: Option<DateTime<Utc>>,
    finished_at: Option<DateTime<Utc>>,
    last_error: Option<String>,
}

pub struct RefreshController {
    index: Arc<SampleIndex>,
    collection: Arc<dyn FileCollection>,
    journal: Arc<dyn JournalSource>,
    kinds: SupportedKinds,
    lane: Arc<tokio::sync::Mutex<()>>,
    next_generation: AtomicU64,
    state: AtomicU8,
    progress: RefreshProgress,
    times: Mutex<RefreshTimes>,
}

impl std::fmt::Debug for RefreshController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshController")
            .field("collection", &self.collection.describe())
            .field("journal", &self.journal.describe())
            .field("state", &RefreshState::load(&self.state))
            .finish()
    }
}

impl RefreshController {
    pub fn new(
        index: Arc<SampleIndex>,
        collection: Arc<dyn FileCollection>,
        journal: Arc<dyn JournalSource>,
        kinds: SupportedKinds,
    ) -> Self {
        let next_generation = AtomicU64::new(index.generation() + 1);
        Self {
            index,
            collection,
            journal,
            kinds,
            lane: Arc::new(tokio::sync::Mutex::new(())),
            next_generation,
            state: AtomicU8::new(RefreshState::Idle as u8),
            progress: RefreshProgress::default(),
            times: Mutex::new(RefreshTimes::default()),
        }
    }

    pub fn index(&self) -> &Arc<SampleIndex> {
        &self.index
    }

    /// Runs one refresh and waits for it. The file-system work happens on the
    /// blocking pool so readers on the runtime are not held up.
    ///
    /// The lane is held by the blocking task itself, so a caller that stops
    /// waiting does not let the next refresh overlap the one still running.
    pub async fn refresh(self: &Arc<Self>, trigger: RefreshTrigger) -> Result<RefreshReport> {
        let lane = Arc::clone(&self.lane).lock_owned().await;
        let controller = Arc::clone(self);
        match tokio::task::spawn_blocking(move || {
            let _lane = lane;
            controller.rebuild(trigger)
        })
        .await
        {
            Ok(result) => result,
            Err(error) => {
                let error = IndexError::Internal(format!("refresh task failed: {error}"));
                self.record_failure(&error);
                tracing::error!(trigger = trigger.as_str(), %error, "sample refresh aborted");
                Err(error)
            }
        }
    }

    /// Blocking variant of [`refresh`](Self::refresh) for callers outside an
    /// async context. Must not be called from within the runtime.
    pub fn refresh_blocking(&self, trigger: RefreshTrigger) -> Result<RefreshReport> {
        let _lane = self.lane.blocking_lock();
        self.rebuild(trigger)
    }

    fn rebuild(&self, trigger: RefreshTrigger) -> Result<RefreshReport> {
        let started = Instant::now();
        self.state
            .store(RefreshState::Refreshing as u8, Ordering::Relaxed);
        self.times.lock().started_at = Some(Utc::now());
        tracing::info!(
            trigger = trigger.as_str(),
            source = %self.collection.describe(),
            "sample refresh started"
        );

        let entries = match self.collection.list() {
            Ok(entries) => entries,
            Err(error) => {
                self.record_failure(&error);
                tracing::warn!(
                    trigger = trigger.as_str(),
                    %error,
                    generation = self.index.generation(),
                    "sample refresh aborted; keeping previous snapshot"
                );
                return Err(error);
            }
        };

        let (journal, journal_loaded) = match self.journal.load() {
            Ok(journal) => {
                tracing::debug!(
                    journal = %self.journal.describe(),
                    entries = journal.len(),
                    loaded_at = ?journal.loaded_at(),
                    "journal loaded"
                );
                (journal, true)
            }
            Err(error) => {
                tracing::warn!(
                    journal = %self.journal.describe(),
                    %error,
                    "journal unavailable; samples fall back to uncategorized"
                );
                (Journal::empty(), false)
            }
        };

        let generation = self.next_generation.fetch_add(1, Ordering::SeqCst);
        let outcome = aggregate_entries(
            entries,
            self.collection.as_ref(),
            &journal,
            &self.kinds,
            generation,
        );
        let sample_count = outcome.snapshot.len();
        let file_count = outcome.snapshot.file_count();
        let finished_at = outcome.snapshot.built_at();

        self.index.replace(outcome.snapshot);

        self.progress
            .seen_entries
            .store(outcome.seen, Ordering::Relaxed);
        self.progress
            .indexed_files
            .store(file_count, Ordering::Relaxed);
        self.progress
            .skipped_entries
            .store(outcome.skipped, Ordering::Relaxed);
        self.progress.completed.fetch_add(1, Ordering::Relaxed);
        {
            let mut times = self.times.lock();
            times.finished_at = Some(finished_at);
            times.last_error = None;
        }
        self.state.store(RefreshState::Ready as u8, Ordering::Relaxed);

        let report = RefreshReport {
            generation,
            trigger,
            sample_count,
            file_count,
            skipped_entries: outcome.skipped,
            journal_loaded,
            duration_ms: started.elapsed().as_millis() as u64,
            finished_at,
        };
        tracing::info!(
            trigger = trigger.as_str(),
            generation,
            samples = sample_count,
            files = file_count,
            skipped = outcome.skipped,
            journal_loaded,
            duration_ms = report.duration_ms,
            "sample refresh finished"
        );
        Ok(report)
    }

    fn record_failure(&self, error: &IndexError) {
        self.progress.failed.fetch_add(1, Ordering::Relaxed);
        {
            let mut times = self.times.lock();
            times.finished_at = Some(Utc::now());
            times.last_error = Some(error.to_string());
        }
        self.state.store(RefreshState::Error as u8, Ordering::Relaxed);
    }

    pub fn status(&self) -> RefreshStatus {
        let times = self.times.lock();
        let snapshot = self.index.snapshot();
        RefreshStatus {
            state: RefreshState::load(&self.state),
            generation: snapshot.generation(),
            sample_count: snapshot.len(),
            seen_entries: self.progress.seen_entries.load(Ordering::Relaxed),
            indexed_files: self.progress.indexed_files.load(Ordering::Relaxed),
            skipped_entries: self.progress.skipped_entries.load(Ordering::Relaxed),
            completed_refreshes: self.progress.completed.load(Ordering::Relaxed),
            failed_refreshes: self.progress.failed.load(Ordering::Relaxed),
            last_started_at: times.started_at,
            last_finished_at: times.finished_at,
            last_error: times.last_error.clone(),
            source: self.collection.describe(),
        }
    }
}
