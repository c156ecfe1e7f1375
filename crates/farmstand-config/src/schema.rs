//! Configuration sections.

use std::path::PathBuf;

use farmstand_telemetry::LogFormat;
use serde::{Deserialize, Serialize};

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Bind address.
    #[serde(default = "default_http_addr")]
    pub http_addr: String,

    /// Handler timeout in milliseconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,

    /// Time allowed for open connections to drain on shutdown.
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_secs: u64,

    /// Largest accepted request body.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_addr: default_http_addr(),
            request_timeout_ms: default_request_timeout(),
            shutdown_timeout_secs: default_shutdown_timeout(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

fn default_http_addr() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_request_timeout() -> u64 {
    30_000
}

fn default_shutdown_timeout() -> u64 {
    30
}

fn default_max_body_bytes() -> usize {
    1024 * 1024
}

/// Template settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ViewsConfig {
    /// Directory logical view names are resolved against.
    #[serde(default = "default_views_dir")]
    pub dir: PathBuf,
}

impl Default for ViewsConfig {
    fn default() -> Self {
        Self {
            dir: default_views_dir(),
        }
    }
}

fn default_views_dir() -> PathBuf {
    PathBuf::from("views")
}

/// Static asset settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct StaticFilesConfig {
    /// Public asset directory.
    #[serde(default = "default_public_dir")]
    pub dir: PathBuf,

    /// `Cache-Control: max-age` for assets.
    #[serde(default = "default_cache_max_age")]
    pub cache_max_age_secs: u64,
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            dir: default_public_dir(),
            cache_max_age_secs: default_cache_max_age(),
        }
    }
}

fn default_public_dir() -> PathBuf {
    PathBuf::from("public")
}

fn default_cache_max_age() -> u64 {
    3600
}

/// Record store settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// JSON seed loaded into the store at startup.
    #[serde(default)]
    pub seed_file: Option<PathBuf>,
}

/// Error page settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ErrorsConfig {
    /// Show internal error messages on the error page.
    #[serde(default)]
    pub expose_internal: bool,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Install a log subscriber at all.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Filter directive, overridden by `RUST_LOG`.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Include file and line in log lines.
    #[serde(default)]
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            format: LogFormat::default(),
            include_location: false,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.http_addr, "127.0.0.1:3000");
        assert_eq!(config.request_timeout_ms, 30_000);
        assert_eq!(config.max_body_bytes, 1_048_576);
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let result: Result<ServerConfig, _> = toml::from_str("http_adr = \"0.0.0.0:1\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_partial_section_fills_defaults() {
        let config: StaticFilesConfig = toml::from_str("dir = \"assets\"").unwrap();
        assert_eq!(config.dir, PathBuf::from("assets"));
        assert_eq!(config.cache_max_age_secs, 3600);
    }
}
