//! # Farmstand Config
//!
//! Typed configuration for the catalog server, loaded in layers:
//!
//! 1. built-in defaults
//! 2. a TOML or JSON file
//! 3. `FARMSTAND__SECTION__KEY` environment variables (a `.env` file is honoured)
//! 4. validation
//!
//! ```toml
//! [server]
//! http_addr = "127.0.0.1:3000"
//! request_timeout_ms = 30000
//!
//! [views]
//! dir = "views"
//!
//! [static_files]
//! dir = "public"
//!
//! [store]
//! seed_file = "seeds/catalog.json"
//!
//! [logging]
//! level = "info"
//! format = "pretty"
//! ```

#![doc(html_root_url = "https://docs.rs/farmstand-config/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::FarmstandConfig;
pub use error::ConfigError;
pub use loader::{ConfigLoader, ENV_PREFIX};
pub use schema::{
    ErrorsConfig, LoggingConfig, ServerConfig, StaticFilesConfig, StoreConfig, ViewsConfig,
};
pub use farmstand_telemetry::LogFormat;
