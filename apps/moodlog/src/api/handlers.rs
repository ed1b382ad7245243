//! # API Endpoint Handlers
//!
//! This module implements the actual HTTP endpoint handlers. Every read
//! handler takes the store's read lock; only `refresh_handler` goes through
//! the sync controller.

use super::{
    AppState,
    types::{
        ErrorResponse, FilterQuery, FilterResponse, HealthResponse, RecordJson, RecordsResponse,
        RefreshResponse, StatusResponse, SummaryResponse,
    },
};
use crate::sync::RefreshError;
use axum::{
    Json,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use moodlog_core::{Keyword, MoodError, export_csv};

/// Longest keyword accepted in a query string, in bytes.
pub const MAX_QUERY_KEYWORD_BYTES: usize = 256;

/// Turn the `keyword` query parameter into a search term.
///
/// `Ok(None)` for a missing or blank keyword; `400` for one over
/// [`MAX_QUERY_KEYWORD_BYTES`].
fn query_keyword(raw: Option<&str>) -> Result<Option<Keyword>, Response> {
    let Some(raw) = raw.filter(|k| !k.trim().is_empty()) else {
        return Ok(None);
    };
    if raw.len() > MAX_QUERY_KEYWORD_BYTES {
        let msg = format!(
            "keyword length {} exceeds maximum {} bytes",
            raw.len(),
            MAX_QUERY_KEYWORD_BYTES
        );
        return Err((StatusCode::BAD_REQUEST, Json(ErrorResponse::new(msg))).into_response());
    }
    Keyword::new(raw).map(Some).map_err(|e| {
        (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(e.to_string()))).into_response()
    })
}

// =============================================================================
// HEALTH HANDLER
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

// =============================================================================
// STATUS HANDLER
// =============================================================================

/// Get sync state and store metadata.
pub async fn status_handler(State(state): State<AppState>) -> impl IntoResponse {
    let store = state.store.read().await;
    (StatusCode::OK, Json(StatusResponse::from(&*store)))
}

// =============================================================================
// SUMMARY HANDLER
// =============================================================================

/// Get counts, percentages, trend and summary label.
pub async fn summary_handler(State(state): State<AppState>) -> impl IntoResponse {
    let store = state.store.read().await;
    (StatusCode::OK, Json(SummaryResponse::from(&*store)))
}

// =============================================================================
// RECORDS HANDLERS
// =============================================================================

/// Get the full history in producer order.
pub async fn records_handler(State(state): State<AppState>) -> impl IntoResponse {
    let store = state.store.read().await;
    let records: Vec<RecordJson> = store.records().iter().map(RecordJson::from).collect();
    let response = RecordsResponse {
        state: store.state(),
        count: records.len(),
        records,
    };
    (StatusCode::OK, Json(response))
}

/// Keyword search.
///
/// A missing or blank keyword is not a search: the full history comes back
/// with `applied: false`.
pub async fn filter_handler(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
) -> Response {
    let keyword = match query_keyword(query.keyword.as_deref()) {
        Ok(keyword) => keyword,
        Err(rejection) => return rejection,
    };
    let store = state.store.read().await;

    let records: Vec<RecordJson> = match &keyword {
        Some(keyword) => store
            .filter(keyword)
            .records()
            .iter()
            .map(|&r| RecordJson::from(r))
            .collect(),
        None => store.records().iter().map(RecordJson::from).collect(),
    };

    let response = FilterResponse {
        keyword: query.keyword.unwrap_or_default(),
        applied: keyword.is_some(),
        count: records.len(),
        records,
    };
    (StatusCode::OK, Json(response)).into_response()
}

// =============================================================================
// EXPORT HANDLER
// =============================================================================

/// Download the history (or a keyword-filtered view of it) as CSV.
pub async fn export_handler(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
) -> Response {
    let keyword = match query_keyword(query.keyword.as_deref()) {
        Ok(keyword) => keyword,
        Err(rejection) => return rejection,
    };
    let store = state.store.read().await;

    let result = match &keyword {
        Some(keyword) => export_csv(store.filter(keyword).records().iter().copied()),
        None => store.export(),
    };

    match result {
        Ok(export) => {
            tracing::info!("Exported {} mood records", export.row_count);
            let disposition = format!("attachment; filename=\"{}\"", state.export_filename);
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                export.content,
            )
                .into_response()
        }
        Err(e @ MoodError::EmptyExport) => {
            (StatusCode::NOT_FOUND, Json(ErrorResponse::new(e.to_string()))).into_response()
        }
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(format!("Export failed: {}", e))),
        )
            .into_response(),
    }
}

// =============================================================================
// REFRESH HANDLER
// =============================================================================

/// Pull the log from the backend and replace the store.
pub async fn refresh_handler(State(state): State<AppState>) -> impl IntoResponse {
    let result = state.sync.refresh().await;
    let store = state.store.read().await;

    match result {
        Ok(outcome) => (
            StatusCode::OK,
            Json(RefreshResponse::success(outcome, store.state())),
        ),
        Err(err) => {
            let status = match err {
                RefreshError::InProgress => StatusCode::CONFLICT,
                RefreshError::Fetch(_) | RefreshError::Malformed(_) => StatusCode::BAD_GATEWAY,
                RefreshError::Aborted(_) => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (status, Json(RefreshResponse::error(&err, &store)))
        }
    }
}
