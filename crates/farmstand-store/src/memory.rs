//! In-memory document store.

use async_trait::async_trait;
use farmstand_core::validation::{check_farm, check_product};
use farmstand_core::{
    Farm, FarmDraft, FarmWithProducts, Product, ProductDraft, ProductWithFarm, RecordId,
};
use indexmap::IndexMap;
use parking_lot::RwLock;

use crate::error::{StoreError, StoreResult};
use crate::seed::SeedData;
use crate::store::{CatalogStore, ProductFilter};

/// Both collections, mutated under one lock.
#[derive(Debug, Default)]
struct Collections {
    products: IndexMap<RecordId, Product>,
    farms: IndexMap<RecordId, Farm>,
}

impl Collections {
    fn ensure_farm(&self, farm: Option<RecordId>) -> StoreResult<()> {
        match farm {
            Some(farm) if !self.farms.contains_key(&farm) => {
                Err(StoreError::DanglingReference { farm })
            }
            _ => Ok(()),
        }
    }

    fn link(&mut self, farm: Option<RecordId>, product: RecordId) {
        if let Some(farm) = farm.and_then(|id| self.farms.get_mut(&id)) {
            if !farm.products.contains(&product) {
                farm.products.push(product);
            }
        }
    }

    fn unlink(&mut self, farm: Option<RecordId>, product: RecordId) {
        if let Some(farm) = farm.and_then(|id| self.farms.get_mut(&id)) {
            farm.products.retain(|p| *p != product);
        }
    }

    fn insert_product(&mut self, draft: ProductDraft) -> StoreResult<Product> {
        check_product(&draft).map_err(StoreError::Rejected)?;
        self.ensure_farm(draft.farm)?;

        let product = Product::from_draft(RecordId::new(), draft);
        self.link(product.farm, product.id);
        self.products.insert(product.id, product.clone());
        Ok(product)
    }

    fn update_product(
        &mut self,
        id: &RecordId,
        draft: ProductDraft,
    ) -> StoreResult<Option<Product>> {
        check_product(&draft).map_err(StoreError::Rejected)?;
        let Some(previous_farm) = self.products.get(id).map(|p| p.farm) else {
            return Ok(None);
        };
        self.ensure_farm(draft.farm)?;

        if previous_farm != draft.farm {
            self.unlink(previous_farm, *id);
            self.link(draft.farm, *id);
        }
        let updated = Product::from_draft(*id, draft);
        self.products.insert(*id, updated.clone());
        Ok(Some(updated))
    }

    fn delete_product(&mut self, id: &RecordId) -> Option<Product> {
        let product = self.products.shift_remove(id)?;
        self.unlink(product.farm, product.id);
        Some(product)
    }

    fn insert_farm(&mut self, draft: FarmDraft) -> StoreResult<Farm> {
        check_farm(&draft).map_err(StoreError::Rejected)?;
        let farm = Farm::from_draft(RecordId::new(), draft);
        self.farms.insert(farm.id, farm.clone());
        Ok(farm)
    }

    fn delete_farm(&mut self, id: &RecordId) -> Option<Farm> {
        let farm = self.farms.shift_remove(id)?;
        self.products.retain(|_, p| p.farm != Some(farm.id));
        Some(farm)
    }
}

/// A [`CatalogStore`] that keeps documents in process memory.
///
/// Each call takes the lock once, so a single call is atomic but separate
/// calls interleave freely and concurrent updates are last-write-wins.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store populated from seed data.
    pub fn seeded(seed: SeedData) -> StoreResult<Self> {
        let mut collections = Collections::default();

        for farm_seed in seed.farms {
            let farm = collections.insert_farm(farm_seed.farm)?;
            for product in farm_seed.products {
                collections.insert_product(product.into_draft(Some(farm.id)))?;
            }
        }
        for product in seed.products {
            collections.insert_product(product.into_draft(None))?;
        }

        tracing::info!(
            farms = collections.farms.len(),
            products = collections.products.len(),
            "Seeded memory store"
        );

        Ok(Self {
            inner: RwLock::new(collections),
        })
    }

    /// Returns the number of stored products.
    pub async fn product_count(&self) -> usize {
        self.inner.read().products.len()
    }

    /// Returns the number of stored farms.
    pub async fn farm_count(&self) -> usize {
        self.inner.read().farms.len()
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn find_products(&self, filter: &ProductFilter) -> StoreResult<Vec<Product>> {
        let inner = self.inner.read();
        Ok(inner
            .products
            .values()
            .filter(|p| filter.matches(p.category))
            .cloned()
            .collect())
    }

    async fn find_product(&self, id: &RecordId) -> StoreResult<Option<Product>> {
        Ok(self.inner.read().products.get(id).cloned())
    }

    async fn find_product_with_farm(&self, id: &RecordId) -> StoreResult<Option<ProductWithFarm>> {
        let inner = self.inner.read();
        Ok(inner.products.get(id).map(|product| ProductWithFarm {
            farm: product.farm.and_then(|f| inner.farms.get(&f).cloned()),
            product: product.clone(),
        }))
    }

    async fn insert_product(&self, draft: ProductDraft) -> StoreResult<Product> {
        let product = self.inner.write().insert_product(draft)?;
        tracing::debug!(product_id = %product.id, "Inserted product");
        Ok(product)
    }

    async fn update_product(
        &self,
        id: &RecordId,
        draft: ProductDraft,
    ) -> StoreResult<Option<Product>> {
        let updated = self.inner.write().update_product(id, draft)?;
        if updated.is_some() {
            tracing::debug!(product_id = %id, "Updated product");
        }
        Ok(updated)
    }

    async fn delete_product(&self, id: &RecordId) -> StoreResult<Option<Product>> {
        let deleted = self.inner.write().delete_product(id);
        if deleted.is_some() {
            tracing::debug!(product_id = %id, "Deleted product");
        }
        Ok(deleted)
    }

    async fn list_farms(&self) -> StoreResult<Vec<Farm>> {
        Ok(self.inner.read().farms.values().cloned().collect())
    }

    async fn find_farm(&self, id: &RecordId) -> StoreResult<Option<Farm>> {
        Ok(self.inner.read().farms.get(id).cloned())
    }

    async fn find_farm_with_products(
        &self,
        id: &RecordId,
    ) -> StoreResult<Option<FarmWithProducts>> {
        let inner = self.inner.read();
        Ok(inner.farms.get(id).map(|farm| FarmWithProducts {
            products: farm
                .products
                .iter()
                .filter_map(|p| inner.products.get(p).cloned())
                .collect(),
            farm: farm.clone(),
        }))
    }

    async fn insert_farm(&self, draft: FarmDraft) -> StoreResult<Farm> {
        let farm = self.inner.write().insert_farm(draft)?;
        tracing::debug!(farm_id = %farm.id, "Inserted farm");
        Ok(farm)
    }

    async fn delete_farm(&self, id: &RecordId) -> StoreResult<Option<Farm>> {
        let deleted = self.inner.write().delete_farm(id);
        if let Some(farm) = &deleted {
            tracing::debug!(farm_id = %id, products = farm.products.len(), "Deleted farm");
        }
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use farmstand_core::Category;

    fn draft(name: &str, category: Category, farm: Option<RecordId>) -> ProductDraft {
        ProductDraft {
            name: name.to_string(),
            price: 4.0,
            category,
            farm,
        }
    }

    fn farm_draft(name: &str) -> FarmDraft {
        FarmDraft {
            name: name.to_string(),
            city: Some("Hood River".to_string()),
            email: None,
        }
    }

    #[tokio::test]
    async fn test_insert_and_find_product() {
        let store = MemoryStore::new();
        let product = store
            .insert_product(draft("Pears", Category::Fruits, None))
            .await
            .unwrap();

        let found = store.find_product(&product.id).await.unwrap();
        assert_eq!(found, Some(product));
        assert_eq!(store.find_product(&RecordId::new()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_find_products_by_category() {
        let store = MemoryStore::new();
        store.insert_product(draft("Apples", Category::Fruits, None)).await.unwrap();
        store.insert_product(draft("Leeks", Category::Vegetables, None)).await.unwrap();
        store.insert_product(draft("Figs", Category::Fruits, None)).await.unwrap();

        let fruits = store.find_products(&ProductFilter::category("fruits")).await.unwrap();
        let names: Vec<&str> = fruits.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Apples", "Figs"]);

        let all = store.find_products(&ProductFilter::All).await.unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn test_store_rejects_invalid_documents() {
        let store = MemoryStore::new();
        let mut bad = draft("Eggs", Category::Meat, None);
        bad.price = -1.0;

        let err = store.insert_product(bad).await.unwrap_err();
        assert!(matches!(err, StoreError::Rejected(_)));
        assert_eq!(store.product_count().await, 0);
    }

    #[tokio::test]
    async fn test_dangling_farm_reference_rejected() {
        let store = MemoryStore::new();
        let missing = RecordId::new();
        let err = store
            .insert_product(draft("Rye", Category::Bread, Some(missing)))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DanglingReference { farm } if farm == missing));
    }

    #[tokio::test]
    async fn test_population_and_back_collection() {
        let store = MemoryStore::new();
        let farm = store.insert_farm(farm_draft("Orchard")).await.unwrap();
        let product = store
            .insert_product(draft("Cherries", Category::Fruits, Some(farm.id)))
            .await
            .unwrap();

        let populated = store.find_product_with_farm(&product.id).await.unwrap().unwrap();
        assert_eq!(populated.farm.as_ref().map(|f| f.id), Some(farm.id));

        let with_products = store.find_farm_with_products(&farm.id).await.unwrap().unwrap();
        assert_eq!(with_products.products, vec![product]);
        assert_eq!(with_products.farm.products.len(), 1);
    }

    #[tokio::test]
    async fn test_update_moves_product_between_farms() {
        let store = MemoryStore::new();
        let first = store.insert_farm(farm_draft("First")).await.unwrap();
        let second = store.insert_farm(farm_draft("Second")).await.unwrap();
        let product = store
            .insert_product(draft("Beets", Category::Vegetables, Some(first.id)))
            .await
            .unwrap();

        let updated = store
            .update_product(&product.id, draft("Golden Beets", Category::Vegetables, Some(second.id)))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "Golden Beets");
        assert_eq!(updated.id, product.id);

        let first = store.find_farm(&first.id).await.unwrap().unwrap();
        let second = store.find_farm(&second.id).await.unwrap().unwrap();
        assert!(first.products.is_empty());
        assert_eq!(second.products, vec![product.id]);
    }

    #[tokio::test]
    async fn test_update_missing_product_returns_none() {
        let store = MemoryStore::new();
        let result = store
            .update_product(&RecordId::new(), draft("Ghost", Category::Books, None))
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_delete_product_returns_prior_document() {
        let store = MemoryStore::new();
        let farm = store.insert_farm(farm_draft("Bakery")).await.unwrap();
        let product = store
            .insert_product(draft("Baguette", Category::Bread, Some(farm.id)))
            .await
            .unwrap();

        let deleted = store.delete_product(&product.id).await.unwrap().unwrap();
        assert_eq!(deleted.farm, Some(farm.id));
        assert!(store.find_product(&product.id).await.unwrap().is_none());
        assert!(store.find_farm(&farm.id).await.unwrap().unwrap().products.is_empty());
        assert!(store.delete_product(&product.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_farm_cascades() {
        let store = MemoryStore::new();
        let farm = store.insert_farm(farm_draft("Ranch")).await.unwrap();
        store.insert_product(draft("Brisket", Category::Meat, Some(farm.id))).await.unwrap();
        let kept = store.insert_product(draft("Atlas", Category::Books, None)).await.unwrap();

        let deleted = store.delete_farm(&farm.id).await.unwrap();
        assert!(deleted.is_some());
        assert_eq!(store.farm_count().await, 0);
        assert_eq!(store.find_products(&ProductFilter::All).await.unwrap(), vec![kept]);
    }
}
