//! The store client interface.

use async_trait::async_trait;
use farmstand_core::{
    Category, Farm, FarmDraft, FarmWithProducts, Product, ProductDraft, ProductWithFarm, RecordId,
};

use crate::error::StoreResult;

/// Filter for [`CatalogStore::find_products`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ProductFilter {
    /// Every product.
    #[default]
    All,
    /// Products whose stored category equals this text exactly.
    Category(String),
}

impl ProductFilter {
    /// Builds a category filter, lowercasing the text the way stored
    /// categories are normalised.
    #[must_use]
    pub fn category(name: impl AsRef<str>) -> Self {
        Self::Category(name.as_ref().trim().to_lowercase())
    }

    /// Returns true if `category` passes the filter.
    #[must_use]
    pub fn matches(&self, category: Category) -> bool {
        match self {
            Self::All => true,
            Self::Category(name) => category.as_str() == name,
        }
    }
}

/// Document store operations used by the catalog routes.
///
/// Lookups return `Option` so callers handle absent records explicitly.
/// Writes re-apply the shared validation rules and reject product
/// references to farms that do not exist.
#[async_trait]
pub trait CatalogStore: Send + Sync + 'static {
    /// Lists products matching `filter` in insertion order.
    async fn find_products(&self, filter: &ProductFilter) -> StoreResult<Vec<Product>>;

    /// Fetches one product.
    async fn find_product(&self, id: &RecordId) -> StoreResult<Option<Product>>;

    /// Fetches one product with its farm reference resolved.
    async fn find_product_with_farm(&self, id: &RecordId) -> StoreResult<Option<ProductWithFarm>>;

    /// Inserts a product and links it into its farm's product list.
    async fn insert_product(&self, draft: ProductDraft) -> StoreResult<Product>;

    /// Replaces a product's fields, returning the updated document.
    async fn update_product(&self, id: &RecordId, draft: ProductDraft)
        -> StoreResult<Option<Product>>;

    /// Deletes a product, returning the document as it was.
    async fn delete_product(&self, id: &RecordId) -> StoreResult<Option<Product>>;

    /// Lists farms in insertion order.
    async fn list_farms(&self) -> StoreResult<Vec<Farm>>;

    /// Fetches one farm.
    async fn find_farm(&self, id: &RecordId) -> StoreResult<Option<Farm>>;

    /// Fetches one farm with its products resolved.
    async fn find_farm_with_products(&self, id: &RecordId)
        -> StoreResult<Option<FarmWithProducts>>;

    /// Inserts a farm.
    async fn insert_farm(&self, draft: FarmDraft) -> StoreResult<Farm>;

    /// Deletes a farm and every product that belongs to it.
    async fn delete_farm(&self, id: &RecordId) -> StoreResult<Option<Farm>>;
}
