//! # Sync Controller
//!
//! The single writer of the mood store. `refresh()` pulls the complete log,
//! validates it and replaces the store wholesale, or records the failure
//! and leaves the previous record set in place.
//!
//! ## Lifecycle
//!
//! ```text
//! Uninitialized ──▶ Loading ──▶ Ready
//!                      │
//!                      └──────▶ Failed   (never loaded)
//! Ready/Stale ────▶ Loading ──▶ Ready
//!                      │
//!                      └──────▶ Stale    (previous data kept, error raised)
//! ```
//!
//! There is no retry and no polling; every refresh is caller-triggered.
//! A refresh requested while one is loading is rejected with
//! [`RefreshError::InProgress`].

use crate::source::{LogSource, SourceError};
use moodlog_core::{FailureKind, Ingestor, MoodError, MoodStore, RefreshFailure};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{RwLock, RwLockReadGuard};

/// Why a refresh did not replace the store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RefreshError {
    /// Transport failure or non-success status.
    #[error("Fetch failed: {0}")]
    Fetch(#[from] SourceError),

    /// The body was not an ordered record collection.
    #[error("{0}")]
    Malformed(MoodError),

    /// Another refresh is still loading.
    #[error("A refresh is already in progress")]
    InProgress,

    /// The refresh task died before reporting back.
    #[error("Refresh task aborted: {0}")]
    Aborted(String),
}

impl RefreshError {
    /// The flag recorded on the store for this failure.
    #[must_use]
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Self::Fetch(_) | Self::Aborted(_) => Some(FailureKind::Fetch),
            Self::Malformed(_) => Some(FailureKind::MalformedResponse),
            Self::InProgress => None,
        }
    }
}

/// Summary of a successful refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshOutcome {
    pub records: usize,
    /// Records downgraded to the unrecognized category.
    pub downgraded: usize,
    pub warnings: usize,
    pub generation: u64,
}

/// Read-only handle to the store a [`SyncController`] writes.
///
/// Only shared read guards can be obtained, so the refresh lifecycle
/// (`begin_refresh`, `complete_refresh`, `fail_refresh`) stays private to
/// the controller:
///
/// ```compile_fail
/// # async fn tamper(reader: moodlog::sync::StoreReader) {
/// use moodlog_core::{FailureKind, RefreshFailure};
/// reader
///     .read()
///     .await
///     .fail_refresh(RefreshFailure::new(FailureKind::Fetch, "not allowed"));
/// # }
/// ```
#[derive(Clone)]
pub struct StoreReader(Arc<RwLock<MoodStore>>);

impl StoreReader {
    /// Wait for a shared read guard.
    pub async fn read(&self) -> RwLockReadGuard<'_, MoodStore> {
        self.0.read().await
    }
}

/// Owns the write side of the store.
#[derive(Clone)]
pub struct SyncController {
    source: Arc<dyn LogSource>,
    store: Arc<RwLock<MoodStore>>,
}

impl SyncController {
    /// Create a controller over a fresh, uninitialized store.
    pub fn new(source: Arc<dyn LogSource>) -> Self {
        Self::with_store(source, MoodStore::new())
    }

    /// Create a controller over an existing store.
    pub fn with_store(source: Arc<dyn LogSource>, store: MoodStore) -> Self {
        Self {
            source,
            store: Arc::new(RwLock::new(store)),
        }
    }

    /// Read-only handle to the store.
    #[must_use]
    pub fn reader(&self) -> StoreReader {
        StoreReader(Arc::clone(&self.store))
    }

    /// Fetch the log and replace the store.
    ///
    /// The fetch runs on its own task, so dropping the returned future (for
    /// example when an HTTP client disconnects) does not strand the store in
    /// `Loading`: the in-flight refresh completes and applies its result.
    pub async fn refresh(&self) -> Result<RefreshOutcome, RefreshError> {
        self.store
            .write()
            .await
            .begin_refresh()
            .map_err(|_| RefreshError::InProgress)?;

        tracing::info!("Refreshing mood log from {}", self.source.describe());

        let source = Arc::clone(&self.source);
        let store = Arc::clone(&self.store);
        let task = tokio::spawn(async move { Self::fetch_and_apply(source.as_ref(), &store).await });

        match task.await {
            Ok(result) => result,
            Err(join_err) => {
                let err = RefreshError::Aborted(join_err.to_string());
                tracing::error!("{}", err);
                self.store
                    .write()
                    .await
                    .fail_refresh(RefreshFailure::new(FailureKind::Fetch, err.to_string()));
                Err(err)
            }
        }
    }

    async fn fetch_and_apply(
        source: &dyn LogSource,
        store: &RwLock<MoodStore>,
    ) -> Result<RefreshOutcome, RefreshError> {
        // No lock is held across the network await.
        let parsed = match source.fetch_log().await {
            Ok(body) => Ingestor::parse_log(&body).map_err(RefreshError::Malformed),
            Err(e) => Err(RefreshError::Fetch(e)),
        };

        let mut store = store.write().await;
        match parsed {
            Ok(report) => {
                for warning in &report.warnings {
                    tracing::warn!("Downgraded {}", warning);
                }
                let downgraded = report.downgraded_count();
                let warnings = report.warnings.len();
                store.complete_refresh(report);
                let outcome = RefreshOutcome {
                    records: store.len(),
                    downgraded,
                    warnings,
                    generation: store.generation(),
                };
                tracing::info!(
                    "Mood log refreshed: {} records ({} unrecognized)",
                    outcome.records,
                    outcome.downgraded
                );
                Ok(outcome)
            }
            Err(err) => {
                let kind = err.failure_kind().unwrap_or(FailureKind::Fetch);
                store.fail_refresh(RefreshFailure::new(kind, err.to_string()));
                tracing::warn!(
                    "Mood log refresh failed ({}), keeping {} previous records: {}",
                    store.state(),
                    store.len(),
                    err
                );
                Err(err)
            }
        }
    }
}
