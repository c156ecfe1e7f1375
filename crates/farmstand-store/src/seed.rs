//! Seed data for [`crate::MemoryStore`].
//!
//! ```json
//! {
//!   "farms": [
//!     {
//!       "name": "Full Belly Farms",
//!       "city": "Guinda",
//!       "email": "hello@fullbelly.test",
//!       "products": [{ "name": "Ruby Grapefruit", "price": 1.99, "category": "fruits" }]
//!     }
//!   ],
//!   "products": [{ "name": "Field Guide", "price": 12, "category": "books" }]
//! }
//! ```

use std::path::Path;

use farmstand_core::{Category, FarmDraft, ProductDraft, RecordId};
use serde::Deserialize;

use crate::error::{StoreError, StoreResult};

/// Farms with nested products, plus products with no farm.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedData {
    /// Farms and their products.
    #[serde(default)]
    pub farms: Vec<FarmSeed>,
    /// Products that belong to no farm.
    #[serde(default)]
    pub products: Vec<ProductSeed>,
}

/// A farm and the products it sells.
#[derive(Debug, Clone, Deserialize)]
pub struct FarmSeed {
    /// Farm fields.
    #[serde(flatten)]
    pub farm: FarmDraft,
    /// Products of this farm.
    #[serde(default)]
    pub products: Vec<ProductSeed>,
}

/// Product fields without a farm reference.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductSeed {
    /// Product name.
    pub name: String,
    /// Price.
    pub price: f64,
    /// Category.
    pub category: Category,
}

impl ProductSeed {
    pub(crate) fn into_draft(self, farm: Option<RecordId>) -> ProductDraft {
        ProductDraft {
            name: self.name,
            price: self.price,
            category: self.category,
            farm,
        }
    }
}

impl SeedData {
    /// Parses seed data from JSON text.
    pub fn from_json(text: &str) -> StoreResult<Self> {
        serde_json::from_str(text).map_err(|e| StoreError::Seed {
            path: "<inline>".to_string(),
            message: e.to_string(),
        })
    }

    /// Reads and parses a seed file.
    pub fn from_file(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        let seed_error = |message: String| StoreError::Seed {
            path: path.display().to_string(),
            message,
        };
        let text = std::fs::read_to_string(path).map_err(|e| seed_error(e.to_string()))?;
        serde_json::from_str(&text).map_err(|e| seed_error(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CatalogStore, MemoryStore, ProductFilter};
    use std::io::Write;

    const SEED: &str = r#"{
        "farms": [
            {
                "name": "Full Belly Farms",
                "city": "Guinda",
                "products": [
                    { "name": "Ruby Grapefruit", "price": 1.99, "category": "fruits" },
                    { "name": "Organic Celery", "price": 1.5, "category": "vegetables" }
                ]
            }
        ],
        "products": [{ "name": "Field Guide", "price": 12, "category": "books" }]
    }"#;

    #[tokio::test]
    async fn test_seeded_store_links_products() {
        let store = MemoryStore::seeded(SeedData::from_json(SEED).unwrap()).unwrap();
        assert_eq!(store.farm_count().await, 1);
        assert_eq!(store.product_count().await, 3);

        let farms = store.list_farms().await.unwrap();
        assert_eq!(farms[0].products.len(), 2);

        let books = store.find_products(&ProductFilter::category("books")).await.unwrap();
        assert_eq!(books[0].farm, None);
    }

    #[test]
    fn test_seed_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SEED.as_bytes()).unwrap();

        let seed = SeedData::from_file(file.path()).unwrap();
        assert_eq!(seed.farms.len(), 1);
        assert_eq!(seed.products.len(), 1);
    }

    #[test]
    fn test_seed_rejects_unknown_category() {
        let err = SeedData::from_json(
            r#"{"products": [{ "name": "Goat", "price": 1, "category": "animal" }]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, StoreError::Seed { .. }));
    }

    #[test]
    fn test_missing_seed_file() {
        let err = SeedData::from_file("/definitely/not/here.json").unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }
}
