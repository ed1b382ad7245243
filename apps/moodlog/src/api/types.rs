//! # API Request/Response Types
//!
//! This module defines the JSON structures for the dashboard API.

use crate::sync::{RefreshError, RefreshOutcome};
use chrono::{DateTime, Utc};
use moodlog_core::{Dashboard, MoodCategory, MoodRecord, MoodStore, RefreshFailure, SyncState};
use serde::{Deserialize, Serialize};

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// STATUS RESPONSE
// =============================================================================

/// Store status response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub state: SyncState,
    pub loaded: bool,
    pub record_count: usize,
    pub warning_count: usize,
    pub generation: u64,
    pub last_refreshed: Option<DateTime<Utc>>,
    pub last_error: Option<RefreshFailure>,
}

impl From<&MoodStore> for StatusResponse {
    fn from(store: &MoodStore) -> Self {
        Self {
            state: store.state(),
            loaded: store.is_loaded(),
            record_count: store.len(),
            warning_count: store.warnings().len(),
            generation: store.generation(),
            last_refreshed: store.last_refreshed(),
            last_error: store.last_error().cloned(),
        }
    }
}

// =============================================================================
// SUMMARY RESPONSE
// =============================================================================

/// Dashboard snapshot plus the sync state it was computed under.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub state: SyncState,
    pub last_error: Option<RefreshFailure>,
    pub dashboard: Dashboard,
}

impl From<&MoodStore> for SummaryResponse {
    fn from(store: &MoodStore) -> Self {
        Self {
            state: store.state(),
            last_error: store.last_error().cloned(),
            dashboard: store.dashboard(),
        }
    }
}

// =============================================================================
// RECORDS
// =============================================================================

/// One row of the history table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordJson {
    pub timestamp: Option<String>,
    pub message: Option<String>,
    pub mood: Option<String>,
    pub compound_score: Option<f64>,
    /// Whether the record counts toward the charts.
    pub recognized: bool,
    /// Row shading category.
    pub tone: MoodCategory,
}

impl From<&MoodRecord> for RecordJson {
    fn from(record: &MoodRecord) -> Self {
        Self {
            timestamp: record.timestamp().map(str::to_string),
            message: record.message().map(str::to_string),
            mood: record.mood().map(str::to_string),
            compound_score: record.compound_score(),
            recognized: record.is_recognized(),
            tone: record.display_tone(),
        }
    }
}

/// Full history response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordsResponse {
    pub state: SyncState,
    pub count: usize,
    pub records: Vec<RecordJson>,
}

/// Query string of the filter and export endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterQuery {
    #[serde(default)]
    pub keyword: Option<String>,
}

/// Keyword search response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterResponse {
    pub keyword: String,
    /// `false` when the keyword was blank and the full history was returned.
    pub applied: bool,
    pub count: usize,
    pub records: Vec<RecordJson>,
}

// =============================================================================
// REFRESH RESPONSE
// =============================================================================

/// Result of `POST /refresh`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub success: bool,
    pub state: SyncState,
    pub record_count: usize,
    pub downgraded: usize,
    pub generation: u64,
    pub error: Option<String>,
}

impl RefreshResponse {
    pub fn success(outcome: RefreshOutcome, state: SyncState) -> Self {
        Self {
            success: true,
            state,
            record_count: outcome.records,
            downgraded: outcome.downgraded,
            generation: outcome.generation,
            error: None,
        }
    }

    pub fn error(err: &RefreshError, store: &MoodStore) -> Self {
        Self {
            success: false,
            state: store.state(),
            record_count: store.len(),
            downgraded: 0,
            generation: store.generation(),
            error: Some(err.to_string()),
        }
    }
}

// =============================================================================
// GENERIC ERROR
// =============================================================================

/// Error body for endpoints whose success response is not JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { error: msg.into() }
    }
}
