//! Shared setup for the route tests.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use farmstand::build_app;
use farmstand_config::FarmstandConfig;
use farmstand_core::RecordId;
use farmstand_store::{CatalogStore, MemoryStore, SeedData};
use farmstand_test::{TestClient, TestResponse};

pub const SEED: &str = r#"{
    "farms": [
        {
            "name": "Full Belly Farms",
            "city": "Guinda",
            "email": "hello@fullbelly.test",
            "products": [
                { "name": "Ruby Grapefruit", "price": 1.99, "category": "fruits" },
                { "name": "Organic Celery", "price": 1.5, "category": "vegetables" }
            ]
        }
    ],
    "products": [
        { "name": "Field Guide", "price": 12, "category": "books" }
    ]
}"#;

pub fn config() -> FarmstandConfig {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let mut config = FarmstandConfig::default();
    config.views.dir = root.join("views");
    config.static_files.dir = root.join("public");
    config
}

pub fn seeded_store() -> Arc<MemoryStore> {
    let seed = SeedData::from_json(SEED).unwrap();
    Arc::new(MemoryStore::seeded(seed).unwrap())
}

pub fn client(store: &Arc<MemoryStore>) -> TestClient {
    let store: Arc<dyn CatalogStore> = store.clone();
    TestClient::new(build_app(&config(), store))
}

/// Id at the end of a redirect such as `/products/{id}`.
pub fn redirected_id(response: &TestResponse, prefix: &str) -> RecordId {
    let location = response.location().expect("redirect location");
    location
        .strip_prefix(prefix)
        .expect("location prefix")
        .parse()
        .expect("record id")
}
