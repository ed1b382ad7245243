//! Scripted log sources shared by the integration tests.

#![allow(dead_code, clippy::unwrap_used)]

use async_trait::async_trait;
use moodlog::source::{LogSource, SourceError};
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::sync::Notify;

/// Two recognized entries and one with an unknown mood label.
pub const REFERENCE_LOG: &str = r#"[
    {"timestamp": "2025-04-12 09:15:00", "message": "I feel great today", "mood": "positive", "compound_score": 0.8},
    {"timestamp": "2025-04-12 09:45:00", "message": "I'm anxious", "mood": "negative", "compound_score": -0.6},
    {"timestamp": "2025-04-12 10:05:00", "message": "meh", "mood": "bogus", "compound_score": 0.0}
]"#;

/// Replays a fixed sequence of fetch results, then fails.
pub struct ScriptedSource {
    responses: Mutex<VecDeque<Result<Vec<u8>, SourceError>>>,
}

impl ScriptedSource {
    pub fn new(responses: Vec<Result<Vec<u8>, SourceError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
        }
    }

    pub fn body(body: &str) -> Result<Vec<u8>, SourceError> {
        Ok(body.as_bytes().to_vec())
    }

    pub fn unreachable() -> Result<Vec<u8>, SourceError> {
        Err(SourceError::ConnectionFailed("http://backend.test".to_string()))
    }
}

#[async_trait]
impl LogSource for ScriptedSource {
    async fn fetch_log(&self) -> Result<Vec<u8>, SourceError> {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(Self::unreachable)
    }

    fn describe(&self) -> String {
        "scripted".to_string()
    }
}

/// Blocks every fetch until `release` is notified.
pub struct GatedSource {
    pub release: Notify,
    body: Vec<u8>,
}

impl GatedSource {
    pub fn new(body: &str) -> Self {
        Self {
            release: Notify::new(),
            body: body.as_bytes().to_vec(),
        }
    }
}

#[async_trait]
impl LogSource for GatedSource {
    async fn fetch_log(&self) -> Result<Vec<u8>, SourceError> {
        self.release.notified().await;
        Ok(self.body.clone())
    }

    fn describe(&self) -> String {
        "gated".to_string()
    }
}
