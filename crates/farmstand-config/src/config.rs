//! Root configuration.

use std::net::SocketAddr;

use farmstand_telemetry::{LogConfig, LogFormat};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::schema::{
    ErrorsConfig, LoggingConfig, ServerConfig, StaticFilesConfig, StoreConfig, ViewsConfig,
};

/// Complete configuration of the catalog server.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FarmstandConfig {
    /// HTTP server.
    #[serde(default)]
    pub server: ServerConfig,
    /// Templates.
    #[serde(default)]
    pub views: ViewsConfig,
    /// Static assets.
    #[serde(default)]
    pub static_files: StaticFilesConfig,
    /// Record store.
    #[serde(default)]
    pub store: StoreConfig,
    /// Error pages.
    #[serde(default)]
    pub errors: ErrorsConfig,
    /// Logging.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl FarmstandConfig {
    /// Local development settings: pretty debug logs, internal errors shown.
    #[must_use]
    pub fn development() -> Self {
        let mut config = Self::default();
        config.logging.level = "debug".to_string();
        config.logging.format = LogFormat::Pretty;
        config.logging.include_location = true;
        config.errors.expose_internal = true;
        config
    }

    /// Checks values that deserialize fine but cannot be used.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.socket_addr()?;

        if self.server.request_timeout_ms == 0 {
            return Err(ConfigError::invalid_value(
                "server.request_timeout_ms",
                "must be greater than zero",
            ));
        }
        if self.server.max_body_bytes == 0 {
            return Err(ConfigError::invalid_value(
                "server.max_body_bytes",
                "must be greater than zero",
            ));
        }
        if self.views.dir.as_os_str().is_empty() {
            return Err(ConfigError::invalid_value("views.dir", "must not be empty"));
        }
        if self.static_files.dir.as_os_str().is_empty() {
            return Err(ConfigError::invalid_value(
                "static_files.dir",
                "must not be empty",
            ));
        }
        farmstand_telemetry::logging::create_env_filter(&self.logging.level)
            .map_err(|e| ConfigError::invalid_value("logging.level", e.to_string()))?;

        Ok(())
    }

    /// Parses the bind address.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.server.http_addr.parse().map_err(|_| {
            ConfigError::invalid_value(
                "server.http_addr",
                format!("invalid socket address: {}", self.server.http_addr),
            )
        })
    }

    /// Converts the logging section for [`farmstand_telemetry::init_logging`].
    #[must_use]
    pub fn log_config(&self) -> LogConfig {
        LogConfig {
            enabled: self.logging.enabled,
            level: self.logging.level.clone(),
            format: self.logging.format,
            include_location: self.logging.include_location,
            ..LogConfig::default()
        }
    }
}
