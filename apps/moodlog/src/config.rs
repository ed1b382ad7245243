//! # Configuration
//!
//! Layered settings for the moodlog binary, lowest precedence first:
//!
//! 1. Built-in defaults
//! 2. TOML file (`moodlog.toml`, or `--config <path>`)
//! 3. Environment variables
//! 4. CLI flags (applied by the `cli` module)
//!
//! ## Environment Variables
//!
//! - `MOODLOG_SOURCE_URL`: Base URL of the sentiment backend
//! - `MOODLOG_TIMEOUT_SECS`: Request timeout for the backend
//! - `MOODLOG_CORS_ORIGINS`: Comma-separated allowed origins, or "*" for all
//! - `MOODLOG_RATE_LIMIT`: Requests per second (0 disables)
//! - `MOODLOG_EXPORT_FILENAME`: Suggested download filename

use moodlog_core::primitives::DEFAULT_EXPORT_FILENAME;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "moodlog.toml";

/// Errors while assembling the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: String, value: String },
}

// =============================================================================
// SECTIONS
// =============================================================================

/// Where the mood log comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourceConfig {
    /// Base URL of the sentiment backend (no trailing slash needed).
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            timeout_secs: 10,
        }
    }
}

/// HTTP dashboard API settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origins. `None` means localhost only; `["*"]` means any.
    pub cors_origins: Option<Vec<String>>,
    /// Requests per second, `0` disables rate limiting.
    pub rate_limit: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            cors_origins: None,
            rate_limit: 100,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    pub filename: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            filename: DEFAULT_EXPORT_FILENAME.to_string(),
        }
    }
}

/// Full application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub source: SourceConfig,
    pub server: ServerConfig,
    pub export: ExportConfig,
}

// =============================================================================
// LOADING
// =============================================================================

impl Config {
    /// Load defaults, then the TOML file, then the process environment.
    ///
    /// An explicit `path` must exist. Without one, `moodlog.toml` is read
    /// only if present.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.is_file() {
                    Self::from_file(default)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Parse a TOML file on top of the defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!("Loaded config file {}", path.display());
        Self::from_toml_str(&text)
    }

    /// Parse TOML text on top of the defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Overlay environment variables read through `lookup`.
    pub fn apply_env(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(url) = lookup("MOODLOG_SOURCE_URL") {
            self.source.base_url = url;
        }
        if let Some(raw) = lookup("MOODLOG_TIMEOUT_SECS") {
            self.source.timeout_secs = parse_number("MOODLOG_TIMEOUT_SECS", &raw)?;
        }
        if let Some(raw) = lookup("MOODLOG_CORS_ORIGINS") {
            self.server.cors_origins = Some(
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect(),
            );
        }
        if let Some(raw) = lookup("MOODLOG_RATE_LIMIT") {
            self.server.rate_limit = parse_number("MOODLOG_RATE_LIMIT", &raw)?;
        }
        if let Some(name) = lookup("MOODLOG_EXPORT_FILENAME") {
            self.export.filename = name;
        }
        Ok(())
    }

    /// Socket address string for the API server.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: raw.to_string(),
    })
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_point_at_local_backend() {
        let config = Config::default();
        assert_eq!(config.source.base_url, "http://127.0.0.1:5000");
        assert_eq!(config.export.filename, "mood_log.csv");
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config = Config::from_toml_str(
            r#"
            [source]
            base_url = "https://mood.example.org"
            "#,
        )
        .expect("parse");
        assert_eq!(config.source.base_url, "https://mood.example.org");
        assert_eq!(config.source.timeout_secs, 10);
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result = Config::from_toml_str("[source]\nbase_uri = \"x\"\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn env_overrides_file() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("MOODLOG_SOURCE_URL", "http://backend:5000"),
            ("MOODLOG_RATE_LIMIT", "0"),
            ("MOODLOG_CORS_ORIGINS", "http://a.test, http://b.test,"),
        ]);
        let mut config = Config::default();
        config
            .apply_env(|key| env.get(key).map(|v| v.to_string()))
            .expect("apply");

        assert_eq!(config.source.base_url, "http://backend:5000");
        assert_eq!(config.server.rate_limit, 0);
        assert_eq!(
            config.server.cors_origins,
            Some(vec!["http://a.test".to_string(), "http://b.test".to_string()])
        );
    }

    #[test]
    fn bad_env_number_is_an_error() {
        let mut config = Config::default();
        let result = config.apply_env(|key| {
            (key == "MOODLOG_TIMEOUT_SECS").then(|| "soon".to_string())
        });
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let result = Config::load(Some(&dir.path().join("absent.toml")));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
