//! Product pages.

use std::sync::Arc;

use farmstand_core::validation::{validate_product, ProductInput};
use farmstand_core::{paths, CatalogError, Farm, Product, ProductWithFarm, RecordId, ALL_PRODUCTS_LABEL};
use farmstand_server::{HandlerResult, Reply, RequestContext};
use farmstand_store::ProductFilter;
use serde::{Deserialize, Serialize};

use super::categories;
use crate::state::AppState;

const PRODUCT_NOT_FOUND: &str = "Product Not Found";

#[derive(Debug, Default, Deserialize)]
struct ListQuery {
    category: Option<String>,
}

#[derive(Serialize)]
struct ListView {
    products: Vec<Product>,
    categories: Vec<&'static str>,
    category: String,
}

#[derive(Serialize)]
struct FormView {
    categories: Vec<&'static str>,
}

/// Detail, info and edit pages. `farm` is absent when the product has no
/// farm or its farm no longer exists.
#[derive(Serialize)]
struct ProductView {
    product: Product,
    farm: Option<Farm>,
    categories: Vec<&'static str>,
}

impl From<ProductWithFarm> for ProductView {
    fn from(found: ProductWithFarm) -> Self {
        Self {
            product: found.product,
            farm: found.farm,
            categories: categories(),
        }
    }
}

async fn find(state: &AppState, id: &RecordId) -> Result<ProductWithFarm, CatalogError> {
    state
        .store()
        .find_product_with_farm(id)
        .await?
        .ok_or_else(|| CatalogError::not_found(PRODUCT_NOT_FOUND))
}

/// `GET /products[?category=]`
pub async fn list(state: Arc<AppState>, ctx: RequestContext) -> HandlerResult {
    let query: ListQuery = ctx.query()?;
    let requested = query
        .category
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty());

    let (filter, category) = match requested {
        Some(name) => (ProductFilter::category(name), name.to_lowercase()),
        None => (ProductFilter::All, ALL_PRODUCTS_LABEL.to_string()),
    };
    let products = state.store().find_products(&filter).await?;

    Ok(Reply::view(
        "products/index.html",
        &ListView {
            products,
            categories: categories(),
            category,
        },
    ))
}

/// `GET /products/add`
pub async fn add_form(_: Arc<AppState>, _: RequestContext) -> HandlerResult {
    Ok(Reply::view(
        "products/add.html",
        &FormView {
            categories: categories(),
        },
    ))
}

/// `POST /products`
pub async fn create(state: Arc<AppState>, ctx: RequestContext) -> HandlerResult {
    let input: ProductInput = ctx.form()?;
    let draft = validate_product(&input)?;
    let product = state.store().insert_product(draft).await?;
    tracing::info!(product_id = %product.id, "product created");
    Ok(Reply::redirect(paths::product(&product.id)))
}

/// `GET /products/:id`
pub async fn show(state: Arc<AppState>, ctx: RequestContext) -> HandlerResult {
    let id = ctx.record_id("id")?;
    let found = find(&state, &id).await?;
    Ok(Reply::view("products/show.html", &ProductView::from(found)))
}

/// `GET /products/:id/info`
pub async fn info(state: Arc<AppState>, ctx: RequestContext) -> HandlerResult {
    let id = ctx.record_id("id")?;
    let found = find(&state, &id).await?;
    Ok(Reply::view("products/info.html", &ProductView::from(found)))
}

/// `GET /products/:id/edit`
pub async fn edit_form(state: Arc<AppState>, ctx: RequestContext) -> HandlerResult {
    let id = ctx.record_id("id")?;
    let found = find(&state, &id).await?;
    Ok(Reply::view("products/edit.html", &ProductView::from(found)))
}

/// `PUT /products/:id`
///
/// A submission without a farm keeps the product's current farm.
pub async fn update(state: Arc<AppState>, ctx: RequestContext) -> HandlerResult {
    let id = ctx.record_id("id")?;
    let input: ProductInput = ctx.form()?;
    let mut draft = validate_product(&input)?;

    let store = state.store();
    let current = store
        .find_product(&id)
        .await?
        .ok_or_else(|| CatalogError::not_found(PRODUCT_NOT_FOUND))?;
    if draft.farm.is_none() {
        draft.farm = current.farm;
    }

    let updated = store
        .update_product(&id, draft)
        .await?
        .ok_or_else(|| CatalogError::not_found(PRODUCT_NOT_FOUND))?;
    Ok(Reply::redirect(paths::product(&updated.id)))
}

/// `DELETE /products/:id`
///
/// Returns to the product's farm, or to the product list when it had none.
pub async fn delete(state: Arc<AppState>, ctx: RequestContext) -> HandlerResult {
    let id = ctx.record_id("id")?;
    let deleted = state
        .store()
        .delete_product(&id)
        .await?
        .ok_or_else(|| CatalogError::not_found(PRODUCT_NOT_FOUND))?;

    let target = match deleted.farm {
        Some(farm) => paths::farm(&farm),
        None => paths::products(),
    };
    Ok(Reply::redirect(target))
}
