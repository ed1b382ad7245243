//! Integration tests for the dashboard HTTP API.
//!
//! Uses axum-test to drive the router without binding a socket.

#![allow(clippy::unwrap_used, clippy::panic, clippy::float_arithmetic)]

mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use common::{GatedSource, REFERENCE_LOG, ScriptedSource};
use moodlog::api::{
    AppState, ErrorResponse, FilterResponse, HealthResponse, MAX_QUERY_KEYWORD_BYTES,
    RecordsResponse, RefreshResponse, StatusResponse, SummaryResponse, create_router,
};
use moodlog::config::ServerConfig;
use moodlog::source::SourceError;
use moodlog::sync::SyncController;
use moodlog_core::{FailureKind, MoodCategory, SummaryLabel, SyncState};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

fn unlimited() -> ServerConfig {
    ServerConfig {
        rate_limit: 0,
        ..ServerConfig::default()
    }
}

fn server_with(responses: Vec<Result<Vec<u8>, SourceError>>) -> TestServer {
    let sync = SyncController::new(Arc::new(ScriptedSource::new(responses)));
    let state = AppState::new(sync, "mood_log.csv");
    TestServer::new(create_router(state, &unlimited())).unwrap()
}

/// Server whose store has already loaded the reference log.
async fn loaded_server(more: Vec<Result<Vec<u8>, SourceError>>) -> TestServer {
    let mut responses = vec![ScriptedSource::body(REFERENCE_LOG)];
    responses.extend(more);
    let server = server_with(responses);
    server.post("/refresh").await.assert_status_ok();
    server
}

// =============================================================================
// HEALTH / STATUS
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let server = server_with(vec![]);
    let response = server.get("/health").await;
    response.assert_status_ok();
    let health: HealthResponse = response.json();
    assert_eq!(health.status, "ok");
}

#[tokio::test]
async fn test_status_before_any_refresh() {
    let server = server_with(vec![]);
    let status: StatusResponse = server.get("/status").await.json();
    assert_eq!(status.state, SyncState::Uninitialized);
    assert!(!status.loaded);
    assert_eq!(status.record_count, 0);
    assert!(status.last_error.is_none());
}

// =============================================================================
// SUMMARY
// =============================================================================

#[tokio::test]
async fn test_summary_of_reference_log() {
    let server = loaded_server(vec![]).await;
    let response = server.get("/summary").await;
    response.assert_status_ok();

    let summary: SummaryResponse = response.json();
    let dashboard = summary.dashboard;
    assert_eq!(summary.state, SyncState::Ready);
    assert_eq!(dashboard.total_records, 3);
    assert_eq!(dashboard.unrecognized_records, 1);
    assert_eq!(dashboard.counts.get(MoodCategory::Positive), 1);
    assert_eq!(dashboard.counts.get(MoodCategory::Negative), 1);
    assert_eq!(dashboard.counts.get(MoodCategory::Neutral), 0);
    assert!((dashboard.percentages.get(MoodCategory::Positive) - 50.0).abs() < 1e-9);
    assert_eq!(dashboard.summary, SummaryLabel::Mixed);
    let values: Vec<i8> = dashboard.trend.iter().map(|p| p.value).collect();
    assert_eq!(values, vec![1, -1]);
}

#[tokio::test]
async fn test_summary_of_empty_store_has_zero_percentages() {
    let server = server_with(vec![ScriptedSource::body("[]")]);
    server.post("/refresh").await.assert_status_ok();

    let summary: SummaryResponse = server.get("/summary").await.json();
    assert_eq!(summary.dashboard.total_records, 0);
    for category in MoodCategory::ALL {
        assert_eq!(summary.dashboard.percentages.get(category), 0.0);
    }
    assert_eq!(summary.dashboard.summary, SummaryLabel::Mixed);
}

// =============================================================================
// RECORDS / FILTER
// =============================================================================

#[tokio::test]
async fn test_records_keep_producer_order_and_tone() {
    let server = loaded_server(vec![]).await;
    let records: RecordsResponse = server.get("/records").await.json();

    assert_eq!(records.count, 3);
    let messages: Vec<_> = records
        .records
        .iter()
        .map(|r| r.message.as_deref().unwrap())
        .collect();
    assert_eq!(messages, vec!["I feel great today", "I'm anxious", "meh"]);
    assert!(!records.records[2].recognized);
    assert_eq!(records.records[2].tone, MoodCategory::Neutral);
    assert_eq!(records.records[2].mood.as_deref(), Some("bogus"));
}

#[tokio::test]
async fn test_filter_is_case_insensitive() {
    let server = loaded_server(vec![]).await;
    let response = server.get("/records/filter?keyword=ANXIOUS").await;
    response.assert_status_ok();

    let filtered: FilterResponse = response.json();
    assert!(filtered.applied);
    assert_eq!(filtered.count, 1);
    assert_eq!(filtered.records[0].message.as_deref(), Some("I'm anxious"));
}

#[tokio::test]
async fn test_filter_blank_keyword_returns_everything() {
    let server = loaded_server(vec![]).await;
    let filtered: FilterResponse = server.get("/records/filter?keyword=").await.json();
    assert!(!filtered.applied);
    assert_eq!(filtered.count, 3);
}

#[tokio::test]
async fn test_filter_overlong_keyword_is_bad_request() {
    let server = loaded_server(vec![]).await;
    let keyword = "a".repeat(MAX_QUERY_KEYWORD_BYTES + 1);
    let response = server
        .get(&format!("/records/filter?keyword={keyword}"))
        .await;
    response.assert_status_bad_request();

    let response = server.get(&format!("/export?keyword={keyword}")).await;
    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_filter_keyword_at_limit_is_accepted() {
    let server = loaded_server(vec![]).await;
    let keyword = "a".repeat(MAX_QUERY_KEYWORD_BYTES);
    let filtered: FilterResponse = server
        .get(&format!("/records/filter?keyword={keyword}"))
        .await
        .json();
    assert!(filtered.applied);
    assert_eq!(filtered.count, 0);
}

// =============================================================================
// EXPORT
// =============================================================================

#[tokio::test]
async fn test_export_csv_with_download_headers() {
    let server = loaded_server(vec![]).await;
    let response = server.get("/export").await;
    response.assert_status_ok();

    let content_type = response.header("content-type");
    assert!(content_type.to_str().unwrap().starts_with("text/csv"));
    let disposition = response.header("content-disposition");
    assert_eq!(
        disposition.to_str().unwrap(),
        "attachment; filename=\"mood_log.csv\""
    );

    let body = response.text();
    let lines: Vec<&str> = body.split('\n').collect();
    assert_eq!(lines[0], "timestamp,message,mood,compound_score");
    assert_eq!(
        lines[2],
        r#""2025-04-12 09:45:00","I'm anxious","negative","-0.6""#
    );
    assert_eq!(lines[3], r#""2025-04-12 10:05:00","meh","bogus","0""#);
    assert_eq!(lines.len(), 4);
}

#[tokio::test]
async fn test_export_filtered_view() {
    let server = loaded_server(vec![]).await;
    let body = server.get("/export?keyword=great").await.text();
    assert_eq!(body.lines().count(), 2);
    assert!(body.contains("I feel great today"));
}

#[tokio::test]
async fn test_export_nothing_is_not_found() {
    let server = loaded_server(vec![]).await;
    let response = server.get("/export?keyword=zebra").await;
    response.assert_status(StatusCode::NOT_FOUND);
    let error: ErrorResponse = response.json();
    assert!(!error.error.is_empty());
}

// =============================================================================
// REFRESH
// =============================================================================

#[tokio::test]
async fn test_refresh_failure_marks_data_stale() {
    let server = loaded_server(vec![ScriptedSource::unreachable()]).await;

    let response = server.post("/refresh").await;
    response.assert_status(StatusCode::BAD_GATEWAY);
    let refresh: RefreshResponse = response.json();
    assert!(!refresh.success);
    assert_eq!(refresh.state, SyncState::Stale);
    assert_eq!(refresh.record_count, 3);

    let summary: SummaryResponse = server.get("/summary").await.json();
    assert_eq!(summary.state, SyncState::Stale);
    assert_eq!(summary.dashboard.total_records, 3);
    assert_eq!(summary.last_error.unwrap().kind, FailureKind::Fetch);

    let raw: serde_json::Value = server.get("/status").await.json();
    let last_error = &raw["last_error"];
    assert_eq!(last_error["kind"], "fetch");
    assert!(last_error["message"].as_str().unwrap().contains("backend.test"));
    assert!(last_error["at"].is_string());
}

#[tokio::test]
async fn test_refresh_malformed_before_first_load_is_failed() {
    let server = server_with(vec![ScriptedSource::body("not json")]);
    let response = server.post("/refresh").await;
    response.assert_status(StatusCode::BAD_GATEWAY);

    let status: StatusResponse = server.get("/status").await.json();
    assert_eq!(status.state, SyncState::Failed);
    assert_eq!(
        status.last_error.unwrap().kind,
        FailureKind::MalformedResponse
    );
}

#[tokio::test]
async fn test_refresh_reports_downgraded_records() {
    let server = server_with(vec![ScriptedSource::body(REFERENCE_LOG)]);
    let refresh: RefreshResponse = server.post("/refresh").await.json();
    assert!(refresh.success);
    assert_eq!(refresh.record_count, 3);
    assert_eq!(refresh.downgraded, 1);
    assert_eq!(refresh.generation, 1);
}

#[tokio::test]
async fn test_refresh_while_loading_goes_through_guard() {
    let source = Arc::new(GatedSource::new(REFERENCE_LOG));
    let sync = SyncController::new(source.clone());
    let state = AppState::new(sync.clone(), "mood_log.csv");
    let reader = state.store.clone();
    let server = TestServer::new(create_router(state, &unlimited())).unwrap();

    let first = tokio::spawn(async move { sync.refresh().await });
    tokio::time::timeout(Duration::from_secs(5), async {
        while reader.read().await.state() != SyncState::Loading {
            tokio::task::yield_now().await;
        }
    })
    .await
    .unwrap();

    let status: StatusResponse = server.get("/status").await.json();
    assert_eq!(status.state, SyncState::Loading);
    server
        .post("/refresh")
        .await
        .assert_status(StatusCode::CONFLICT);

    source.release.notify_one();
    let outcome = first.await.unwrap().unwrap();
    assert_eq!(outcome.generation, 1);

    let store = reader.read().await;
    assert_eq!(store.state(), SyncState::Ready);
    assert_eq!(store.len(), 3);
}

// =============================================================================
// MIDDLEWARE
// =============================================================================

#[tokio::test]
async fn test_rate_limit_returns_429() {
    let sync = SyncController::new(Arc::new(ScriptedSource::new(vec![])));
    let state = AppState::new(sync, "mood_log.csv");
    let config = ServerConfig {
        rate_limit: 1,
        ..ServerConfig::default()
    };
    let server = TestServer::new(create_router(state, &config)).unwrap();

    server.get("/health").await.assert_status_ok();
    server
        .get("/health")
        .await
        .assert_status(StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_cors_allows_configured_origin() {
    let sync = SyncController::new(Arc::new(ScriptedSource::new(vec![])));
    let state = AppState::new(sync, "mood_log.csv");
    let config = ServerConfig {
        rate_limit: 0,
        cors_origins: Some(vec!["http://dashboard.test".to_string()]),
        ..ServerConfig::default()
    };
    let router = create_router(state, &config);

    let request = axum::http::Request::builder()
        .uri("/health")
        .header("origin", "http://dashboard.test")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "http://dashboard.test"
    );
}
