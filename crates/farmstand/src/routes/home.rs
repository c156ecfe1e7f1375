//! Landing pages.

use std::sync::Arc;

use farmstand_core::paths;
use farmstand_server::{HandlerResult, Reply, RequestContext};
use farmstand_store::ProductFilter;
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
struct HomeView {
    farm_count: usize,
    product_count: usize,
}

/// `GET /`
pub async fn root(_: Arc<AppState>, _: RequestContext) -> HandlerResult {
    Ok(Reply::redirect(paths::home()))
}

/// `GET /home`
pub async fn home(state: Arc<AppState>, _: RequestContext) -> HandlerResult {
    let farm_count = state.store().list_farms().await?.len();
    let product_count = state
        .store()
        .find_products(&ProductFilter::All)
        .await?
        .len();
    Ok(Reply::view(
        "home.html",
        &HomeView {
            farm_count,
            product_count,
        },
    ))
}
