//! # moodlog
//!
//! Dashboard service for a sentiment-analysis backend's mood log: pulls the
//! log, keeps the latest validated snapshot, and serves summaries, keyword
//! search and CSV export over HTTP or the command line.

pub mod api;
pub mod cli;
pub mod config;
pub mod source;
pub mod sync;
