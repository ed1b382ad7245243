//! # Sentiment Backend Client
//!
//! The external log source the sync controller pulls from, plus the thin
//! submission call used by the `submit` command.
//!
//! - `GET  /mood-log`            → the complete log, as raw bytes
//! - `POST /analyze-sentiment`   → classify and log one message

use crate::config::SourceConfig;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Transport-level failures talking to the backend.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// Cannot reach the backend.
    #[error("Cannot connect to sentiment backend at {0}")]
    ConnectionFailed(String),

    /// The request did not complete within the configured timeout.
    #[error("Request to {0} timed out")]
    Timeout(String),

    /// The backend answered with a non-success status.
    #[error("Backend returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body could not be read or decoded.
    #[error("Unreadable response body: {0}")]
    Body(String),

    /// The request was rejected before being sent.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

// =============================================================================
// LOG SOURCE
// =============================================================================

/// Anything that can hand over the complete mood log.
///
/// Implementations return the raw body; validation is the engine's job.
#[async_trait]
pub trait LogSource: Send + Sync {
    /// Fetch the complete log.
    async fn fetch_log(&self) -> Result<Vec<u8>, SourceError>;

    /// Where the log comes from, for log lines.
    fn describe(&self) -> String;
}

// =============================================================================
// SENTIMENT ANALYSIS RESPONSE
// =============================================================================

/// VADER polarity scores as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentScores {
    pub neg: f64,
    pub neu: f64,
    pub pos: f64,
    pub compound: f64,
}

/// Result of `POST /analyze-sentiment`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentAnalysis {
    pub mood: String,
    pub scores: SentimentScores,
}

// =============================================================================
// HTTP CLIENT
// =============================================================================

/// HTTP client for the sentiment backend.
#[derive(Clone)]
pub struct HttpLogSource {
    http: reqwest::Client,
    base_url: String,
}

impl HttpLogSource {
    /// Build a client with the configured timeout.
    pub fn new(config: &SourceConfig) -> Result<Self, SourceError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SourceError::InvalidRequest(format!("HTTP client setup: {e}")))?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Map a reqwest error onto the source taxonomy.
    fn transport_error(&self, url: &str, err: &reqwest::Error) -> SourceError {
        if err.is_timeout() {
            SourceError::Timeout(url.to_string())
        } else if err.is_connect() || err.is_request() {
            SourceError::ConnectionFailed(format!("{url}: {err}"))
        } else {
            SourceError::Body(err.to_string())
        }
    }

    /// Reject non-success statuses, keeping the body for diagnostics.
    async fn check_status(
        &self,
        resp: reqwest::Response,
    ) -> Result<reqwest::Response, SourceError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(SourceError::Status {
            status: status.as_u16(),
            body,
        })
    }

    /// POST /analyze-sentiment → classify a message (the backend also logs it).
    pub async fn analyze(&self, message: &str) -> Result<SentimentAnalysis, SourceError> {
        if message.trim().is_empty() {
            return Err(SourceError::InvalidRequest(
                "message must not be blank".to_string(),
            ));
        }
        let url = self.url("/analyze-sentiment");
        let body = serde_json::json!({ "message": message });
        let resp = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error(&url, &e))?;
        self.check_status(resp)
            .await?
            .json::<SentimentAnalysis>()
            .await
            .map_err(|e| SourceError::Body(e.to_string()))
    }
}

#[async_trait]
impl LogSource for HttpLogSource {
    /// GET /mood-log
    async fn fetch_log(&self) -> Result<Vec<u8>, SourceError> {
        let url = self.url("/mood-log");
        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| self.transport_error(&url, &e))?;
        let bytes = self
            .check_status(resp)
            .await?
            .bytes()
            .await
            .map_err(|e| self.transport_error(&url, &e))?;
        Ok(bytes.to_vec())
    }

    fn describe(&self) -> String {
        self.url("/mood-log")
    }
}

// =============================================================================
// TESTS
// =============================================================================
