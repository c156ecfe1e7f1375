//! Layered configuration loader.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use farmstand_telemetry::LogFormat;

use crate::{ConfigError, FarmstandConfig};

/// Prefix of environment overrides, e.g. `FARMSTAND__SERVER__HTTP_ADDR`.
pub const ENV_PREFIX: &str = "FARMSTAND";

/// Builds a [`FarmstandConfig`] from defaults, a file and the environment.
///
/// ```no_run
/// use farmstand_config::ConfigLoader;
///
/// # fn main() -> Result<(), farmstand_config::ConfigError> {
/// let config = ConfigLoader::new()
///     .with_optional_file("farmstand.toml")?
///     .with_dotenv()
///     .with_env_prefix("FARMSTAND")
///     .load()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct ConfigLoader {
    config: FarmstandConfig,
    env_prefix: Option<String>,
    env_vars: Option<Vec<(String, String)>>,
}

impl ConfigLoader {
    /// Starts from built-in defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from the development preset.
    #[must_use]
    pub fn with_development(mut self) -> Self {
        self.config = FarmstandConfig::development();
        self
    }

    /// Loads a `.toml` or `.json` file, replacing the current values.
    ///
    /// Sections and keys absent from the file take their defaults.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }
        let content = fs::read_to_string(path).map_err(|e| ConfigError::read_error(path, e))?;
        self.config = parse_file(&content, path)?;
        Ok(self)
    }

    /// Loads a file if it exists.
    pub fn with_optional_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            self.with_file(path)
        } else {
            Ok(self)
        }
    }

    /// Loads configuration text in the given format (`toml` or `json`).
    pub fn with_string(mut self, content: &str, format: &str) -> Result<Self, ConfigError> {
        self.config = match format.to_lowercase().as_str() {
            "toml" => toml::from_str(content)?,
            "json" => serde_json::from_str(content)?,
            _ => {
                return Err(ConfigError::validation_error(format!(
                    "unsupported configuration format: {format}"
                )))
            }
        };
        Ok(self)
    }

    /// Reads a `.env` file into the process environment if one exists.
    #[must_use]
    pub fn with_dotenv(self) -> Self {
        let _ = dotenvy::dotenv();
        self
    }

    /// Enables `PREFIX__SECTION__KEY` overrides.
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_uppercase());
        self
    }

    /// Uses `vars` instead of the process environment for overrides.
    #[must_use]
    pub fn with_env_vars<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env_vars = Some(
            vars.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    /// Applies environment overrides and validates.
    pub fn load(mut self) -> Result<FarmstandConfig, ConfigError> {
        if let Some(prefix) = self.env_prefix.take() {
            let vars = self
                .env_vars
                .take()
                .unwrap_or_else(|| env::vars().collect());
            for (key, value) in vars {
                if key.starts_with(&prefix) {
                    self.apply_env_var(&key, &value, &prefix)?;
                }
            }
        }

        self.config.validate()?;
        Ok(self.config)
    }

    fn apply_env_var(&mut self, key: &str, value: &str, prefix: &str) -> Result<(), ConfigError> {
        let Some(rest) = key.strip_prefix(prefix).and_then(|k| k.strip_prefix("__")) else {
            // FARMSTAND_CONFIG and similar single-underscore names are not overrides.
            return Ok(());
        };
        let parts: Vec<&str> = rest.split("__").collect();
        let config = &mut self.config;

        match parts.as_slice() {
            ["SERVER", "HTTP_ADDR"] => config.server.http_addr = value.to_string(),
            ["SERVER", "REQUEST_TIMEOUT_MS"] => {
                config.server.request_timeout_ms = parse_number(key, value)?;
            }
            ["SERVER", "SHUTDOWN_TIMEOUT_SECS"] => {
                config.server.shutdown_timeout_secs = parse_number(key, value)?;
            }
            ["SERVER", "MAX_BODY_BYTES"] => {
                config.server.max_body_bytes = parse_number(key, value)?;
            }
            ["VIEWS", "DIR"] => config.views.dir = PathBuf::from(value),
            ["STATIC_FILES", "DIR"] => config.static_files.dir = PathBuf::from(value),
            ["STATIC_FILES", "CACHE_MAX_AGE_SECS"] => {
                config.static_files.cache_max_age_secs = parse_number(key, value)?;
            }
            ["STORE", "SEED_FILE"] => {
                config.store.seed_file = (!value.is_empty()).then(|| PathBuf::from(value));
            }
            ["ERRORS", "EXPOSE_INTERNAL"] => {
                config.errors.expose_internal = parse_bool(value)
                    .ok_or_else(|| ConfigError::env_parse_error(key, "expected boolean"))?;
            }
            ["LOGGING", "ENABLED"] => {
                config.logging.enabled = parse_bool(value)
                    .ok_or_else(|| ConfigError::env_parse_error(key, "expected boolean"))?;
            }
            ["LOGGING", "LEVEL"] => config.logging.level = value.to_string(),
            ["LOGGING", "FORMAT"] => {
                config.logging.format = match value.to_lowercase().as_str() {
                    "json" => LogFormat::Json,
                    "pretty" => LogFormat::Pretty,
                    _ => {
                        return Err(ConfigError::env_parse_error(
                            key,
                            "expected 'json' or 'pretty'",
                        ))
                    }
                };
            }
            ["LOGGING", "INCLUDE_LOCATION"] => {
                config.logging.include_location = parse_bool(value)
                    .ok_or_else(|| ConfigError::env_parse_error(key, "expected boolean"))?;
            }
            _ => return Err(ConfigError::env_parse_error(key, "unknown configuration key")),
        }

        Ok(())
    }
}

fn parse_file(content: &str, path: &Path) -> Result<FarmstandConfig, ConfigError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase);

    match extension.as_deref() {
        Some("toml") => Ok(toml::from_str(content)?),
        Some("json") => Ok(serde_json::from_str(content)?),
        _ => Err(ConfigError::validation_error(format!(
            "unsupported configuration file format: {}",
            path.display()
        ))),
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::env_parse_error(key, "expected integer"))
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_loader_defaults() {
        let config = ConfigLoader::new().load().unwrap();
        assert_eq!(config.server.http_addr, "127.0.0.1:3000");
        assert_eq!(config.views.dir, PathBuf::from("views"));
    }

    #[test]
    fn test_loader_with_string_toml() {
        let toml = r#"
            [server]
            http_addr = "0.0.0.0:8080"

            [store]
            seed_file = "seed.json"
        "#;
        let config = ConfigLoader::new()
            .with_string(toml, "toml")
            .unwrap()
            .load()
            .unwrap();

        assert_eq!(config.server.http_addr, "0.0.0.0:8080");
        assert_eq!(config.server.request_timeout_ms, 30_000);
        assert_eq!(config.store.seed_file, Some(PathBuf::from("seed.json")));
    }

    #[test]
    fn test_loader_with_string_json() {
        let json = r#"{"logging": {"format": "pretty"}}"#;
        let config = ConfigLoader::new()
            .with_string(json, "json")
            .unwrap()
            .load()
            .unwrap();
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_loader_unknown_section_rejected() {
        let result = ConfigLoader::new().with_string("[database]\nurl = \"x\"", "toml");
        assert!(matches!(result, Err(ConfigError::TomlError(_))));
    }

    #[test]
    fn test_loader_with_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[views]\ndir = \"templates\"").unwrap();

        let config = ConfigLoader::new().with_file(file.path()).unwrap().load().unwrap();
        assert_eq!(config.views.dir, PathBuf::from("templates"));
    }

    #[test]
    fn test_loader_with_file_not_found() {
        let result = ConfigLoader::new().with_file("/nonexistent/farmstand.toml");
        assert!(matches!(result, Err(ConfigError::FileNotFound { .. })));

        let config = ConfigLoader::new()
            .with_optional_file("/nonexistent/farmstand.toml")
            .unwrap()
            .load()
            .unwrap();
        assert_eq!(config, FarmstandConfig::default());
    }

    #[test]
    fn test_env_overrides() {
        let config = ConfigLoader::new()
            .with_env_prefix(ENV_PREFIX)
            .with_env_vars([
                ("FARMSTAND__SERVER__HTTP_ADDR", "0.0.0.0:9000"),
                ("FARMSTAND__ERRORS__EXPOSE_INTERNAL", "yes"),
                ("FARMSTAND__LOGGING__FORMAT", "Pretty"),
                ("FARMSTAND__STORE__SEED_FILE", "/srv/seed.json"),
                ("FARMSTAND_CONFIG", "ignored.toml"),
                ("UNRELATED", "value"),
            ])
            .load()
            .unwrap();

        assert_eq!(config.server.http_addr, "0.0.0.0:9000");
        assert!(config.errors.expose_internal);
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert_eq!(config.store.seed_file, Some(PathBuf::from("/srv/seed.json")));
    }

    #[test]
    fn test_env_override_parse_errors() {
        let result = ConfigLoader::new()
            .with_env_prefix(ENV_PREFIX)
            .with_env_vars([("FARMSTAND__SERVER__REQUEST_TIMEOUT_MS", "soon")])
            .load();
        assert!(matches!(result, Err(ConfigError::EnvParseError { .. })));

        let result = ConfigLoader::new()
            .with_env_prefix(ENV_PREFIX)
            .with_env_vars([("FARMSTAND__SERVER__COLOUR", "blue")])
            .load();
        assert!(result.is_err());
    }

    #[test]
    fn test_env_override_still_validated() {
        let result = ConfigLoader::new()
            .with_env_prefix(ENV_PREFIX)
            .with_env_vars([("FARMSTAND__SERVER__HTTP_ADDR", "nowhere")])
            .load();
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }
}
