//! Farm pages.

use std::sync::Arc;

use farmstand_core::validation::{validate_farm, validate_product, FarmInput, ProductInput};
use farmstand_core::{paths, CatalogError, Farm, Product, RecordId};
use farmstand_server::{HandlerResult, Reply, RequestContext};
use serde::Serialize;

use super::categories;
use crate::state::AppState;

const FARM_NOT_FOUND: &str = "Farm Not Found";

#[derive(Serialize)]
struct ListView {
    farms: Vec<Farm>,
}

#[derive(Serialize)]
struct ShowView {
    farm: Farm,
    products: Vec<Product>,
}

#[derive(Serialize)]
struct NewProductView {
    farm: Farm,
    categories: Vec<&'static str>,
}

async fn find(state: &AppState, id: &RecordId) -> Result<Farm, CatalogError> {
    state
        .store()
        .find_farm(id)
        .await?
        .ok_or_else(|| CatalogError::not_found(FARM_NOT_FOUND))
}

/// `GET /farms`
pub async fn list(state: Arc<AppState>, _: RequestContext) -> HandlerResult {
    let farms = state.store().list_farms().await?;
    Ok(Reply::view("farms/index.html", &ListView { farms }))
}

/// `GET /farms/new`
pub async fn new_form(_: Arc<AppState>, _: RequestContext) -> HandlerResult {
    Ok(Reply::view("farms/new.html", &()))
}

/// `POST /farms`
pub async fn create(state: Arc<AppState>, ctx: RequestContext) -> HandlerResult {
    let input: FarmInput = ctx.form()?;
    let draft = validate_farm(&input)?;
    let farm = state.store().insert_farm(draft).await?;
    tracing::info!(farm_id = %farm.id, "farm created");
    Ok(Reply::redirect(paths::farm(&farm.id)))
}

/// `GET /farms/:id`
pub async fn show(state: Arc<AppState>, ctx: RequestContext) -> HandlerResult {
    let id = ctx.record_id("id")?;
    let found = state
        .store()
        .find_farm_with_products(&id)
        .await?
        .ok_or_else(|| CatalogError::not_found(FARM_NOT_FOUND))?;
    Ok(Reply::view(
        "farms/show.html",
        &ShowView {
            farm: found.farm,
            products: found.products,
        },
    ))
}

/// `DELETE /farms/:id`, removing the farm's products with it.
pub async fn delete(state: Arc<AppState>, ctx: RequestContext) -> HandlerResult {
    let id = ctx.record_id("id")?;
    let farm = state
        .store()
        .delete_farm(&id)
        .await?
        .ok_or_else(|| CatalogError::not_found(FARM_NOT_FOUND))?;
    tracing::info!(farm_id = %farm.id, products = farm.products.len(), "farm deleted");
    Ok(Reply::redirect(paths::farms()))
}

/// `GET /farms/:id/products/new`
pub async fn new_product_form(state: Arc<AppState>, ctx: RequestContext) -> HandlerResult {
    let id = ctx.record_id("id")?;
    let farm = find(&state, &id).await?;
    Ok(Reply::view(
        "farms/new_product.html",
        &NewProductView {
            farm,
            categories: categories(),
        },
    ))
}

/// `POST /farms/:id/products`
pub async fn create_product(state: Arc<AppState>, ctx: RequestContext) -> HandlerResult {
    let id = ctx.record_id("id")?;
    let farm = find(&state, &id).await?;

    let input: ProductInput = ctx.form()?;
    let mut draft = validate_product(&input)?;
    draft.farm = Some(farm.id);

    let product = state.store().insert_product(draft).await?;
    tracing::info!(product_id = %product.id, farm_id = %farm.id, "product created");
    Ok(Reply::redirect(paths::farm(&farm.id)))
}
