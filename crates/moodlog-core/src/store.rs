//! # Store Module
//!
//! The session's single source of truth: the current record set plus the
//! refresh lifecycle around it.
//!
//! - The record set is replaced wholesale, never merged or patched
//! - A failed refresh leaves the record set untouched and raises an error flag
//! - Derived views (counts, trend, filter, export) are computed on demand
//! - Nothing is persisted; the store lives and dies with the session
//!
//! ## Single Writer
//!
//! Only the refresh lifecycle methods (`begin_refresh`, `complete_refresh`,
//! `fail_refresh`) take `&mut self`. Every read goes through `&self`.

use crate::aggregate::Aggregation;
use crate::dashboard::Dashboard;
use crate::export::{CsvExport, export_csv};
use crate::filter::{FilteredView, Keyword};
use crate::ingestor::IngestReport;
use crate::{MoodError, MoodRecord, RecordShapeWarning, RefreshFailure, SyncState};
use chrono::{DateTime, Utc};

/// The in-memory mood set and its sync state.
#[derive(Debug, Clone, Default)]
pub struct MoodStore {
    /// Current records in producer order.
    records: Vec<MoodRecord>,
    /// Warnings from the ingest that produced `records`.
    warnings: Vec<RecordShapeWarning>,
    state: SyncState,
    /// Set once any refresh has succeeded.
    loaded: bool,
    last_error: Option<RefreshFailure>,
    last_refreshed: Option<DateTime<Utc>>,
    /// Bumped on every wholesale replacement.
    generation: u64,
}

impl MoodStore {
    /// Create an empty, uninitialized store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store already holding a record set, as if one refresh succeeded.
    #[must_use]
    pub fn with_records(records: Vec<MoodRecord>) -> Self {
        let mut store = Self::new();
        store.complete_refresh(IngestReport {
            records,
            warnings: Vec::new(),
        });
        store
    }

    // =========================================================================
    // REFRESH LIFECYCLE
    // =========================================================================

    /// Enter `Loading`.
    ///
    /// Returns `MoodError::RefreshInProgress` if a refresh is already loading;
    /// the state is left unchanged in that case.
    pub fn begin_refresh(&mut self) -> Result<(), MoodError> {
        if self.state == SyncState::Loading {
            return Err(MoodError::RefreshInProgress);
        }
        self.state = SyncState::Loading;
        Ok(())
    }

    /// Replace the record set with a freshly ingested log and enter `Ready`.
    pub fn complete_refresh(&mut self, report: IngestReport) {
        self.records = report.records;
        self.warnings = report.warnings;
        self.state = SyncState::Ready;
        self.loaded = true;
        self.last_error = None;
        self.last_refreshed = Some(Utc::now());
        self.generation = self.generation.saturating_add(1);
    }

    /// Record a failed refresh.
    ///
    /// The record set is kept. The store becomes `Stale` if it was ever
    /// loaded, `Failed` otherwise.
    pub fn fail_refresh(&mut self, failure: RefreshFailure) {
        self.state = if self.loaded {
            SyncState::Stale
        } else {
            SyncState::Failed
        };
        self.last_error = Some(failure);
    }

    // =========================================================================
    // STATE ACCESS
    // =========================================================================

    #[must_use]
    pub fn state(&self) -> SyncState {
        self.state
    }

    /// Whether any refresh has ever succeeded.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// The error flag from the latest failed refresh, cleared by the next success.
    #[must_use]
    pub fn last_error(&self) -> Option<&RefreshFailure> {
        self.last_error.as_ref()
    }

    #[must_use]
    pub fn last_refreshed(&self) -> Option<DateTime<Utc>> {
        self.last_refreshed
    }

    /// Number of wholesale replacements so far.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn records(&self) -> &[MoodRecord] {
        &self.records
    }

    #[must_use]
    pub fn warnings(&self) -> &[RecordShapeWarning] {
        &self.warnings
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    // =========================================================================
    // DERIVED VIEWS
    // =========================================================================

    /// Counts, trend, percentages and summary over the current record set.
    #[must_use]
    pub fn aggregate(&self) -> Aggregation {
        Aggregation::compute(&self.records)
    }

    /// The full dashboard snapshot.
    #[must_use]
    pub fn dashboard(&self) -> Dashboard {
        Dashboard::from_records(&self.records)
    }

    /// Records whose message contains `keyword`.
    #[must_use]
    pub fn filter(&self, keyword: &Keyword) -> FilteredView<'_> {
        FilteredView::new(&self.records, keyword)
    }

    /// CSV export of the whole record set.
    pub fn export(&self) -> Result<CsvExport, MoodError> {
        export_csv(&self.records)
    }
}

// =============================================================================
// TESTS
// =============================================================================
