//! Shared application state.

use std::sync::Arc;

use farmstand_store::CatalogStore;

/// State handed to every route handler.
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn CatalogStore>,
}

impl AppState {
    /// Wraps a store.
    #[must_use]
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// The record store.
    pub fn store(&self) -> &dyn CatalogStore {
        self.store.as_ref()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}
