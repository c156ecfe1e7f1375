//! # Farmstand
//!
//! A server-rendered catalog of farms and the products they sell.
//!
//! [`build_app`] wires the route table, views, static assets and error
//! pages into a [`farmstand_server::App`]; the `farmstand` binary loads
//! configuration, seeds the store and serves it.

#![doc(html_root_url = "https://docs.rs/farmstand/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod routes;
mod state;

use std::sync::Arc;
use std::time::Duration;

use farmstand_config::FarmstandConfig;
use farmstand_server::{App, ServerConfig, StaticFiles, ViewRenderer};
use farmstand_store::{CatalogStore, MemoryStore, SeedData, StoreResult};

pub use state::AppState;

/// Crate version, reported by `/health`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Service name, reported by `/health`.
pub const SERVICE_NAME: &str = "farmstand";

/// Translates the `server` and `errors` sections for the HTTP server.
#[must_use]
pub fn server_config(config: &FarmstandConfig) -> ServerConfig {
    ServerConfig::builder()
        .http_addr(config.server.http_addr.clone())
        .request_timeout(Duration::from_millis(config.server.request_timeout_ms))
        .shutdown_timeout(Duration::from_secs(config.server.shutdown_timeout_secs))
        .max_body_bytes(config.server.max_body_bytes)
        .expose_internal_errors(config.errors.expose_internal)
        .service_name(SERVICE_NAME)
        .build()
}

/// Opens the memory store, seeded when a seed file is configured.
pub fn open_store(config: &FarmstandConfig) -> StoreResult<MemoryStore> {
    match &config.store.seed_file {
        Some(path) => MemoryStore::seeded(SeedData::from_file(path)?),
        None => Ok(MemoryStore::new()),
    }
}

/// Builds the application over `store`.
pub fn build_app(config: &FarmstandConfig, store: Arc<dyn CatalogStore>) -> App {
    let state = Arc::new(AppState::new(store));
    App::builder()
        .routes(routes::routes(state))
        .views(ViewRenderer::from_dir(&config.views.dir))
        .static_files(
            StaticFiles::new(&config.static_files.dir)
                .max_age(config.static_files.cache_max_age_secs),
        )
        .config(&server_config(config))
        .version(VERSION)
        .build()
}
