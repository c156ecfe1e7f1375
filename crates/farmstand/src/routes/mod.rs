//! Route table.
//!
//! | Method | Path | Handler |
//! |---|---|---|
//! | GET | `/` | [`home::root`] |
//! | GET | `/home` | [`home::home`] |
//! | GET | `/products` | [`products::list`] |
//! | GET | `/products/add` | [`products::add_form`] |
//! | POST | `/products` | [`products::create`] |
//! | GET | `/products/:id` | [`products::show`] |
//! | GET | `/products/:id/info` | [`products::info`] |
//! | GET | `/products/:id/edit` | [`products::edit_form`] |
//! | PUT | `/products/:id` | [`products::update`] |
//! | DELETE | `/products/:id` | [`products::delete`] |
//! | GET | `/farms` | [`farms::list`] |
//! | GET | `/farms/new` | [`farms::new_form`] |
//! | POST | `/farms` | [`farms::create`] |
//! | GET | `/farms/:id` | [`farms::show`] |
//! | DELETE | `/farms/:id` | [`farms::delete`] |
//! | GET | `/farms/:id/products/new` | [`farms::new_product_form`] |
//! | POST | `/farms/:id/products` | [`farms::create_product`] |

pub mod farms;
pub mod home;
pub mod products;

use std::sync::Arc;

use farmstand_core::Category;
use farmstand_server::Routes;

use crate::state::AppState;

/// Registers every route.
pub fn routes(state: Arc<AppState>) -> Routes<AppState> {
    Routes::new(state)
        .get("/", home::root)
        .get("/home", home::home)
        .scope("/products", |r| {
            r.get("/", products::list)
                .get("/add", products::add_form)
                .post("/", products::create)
                .get("/:id", products::show)
                .get("/:id/info", products::info)
                .get("/:id/edit", products::edit_form)
                .put("/:id", products::update)
                .delete("/:id", products::delete)
        })
        .scope("/farms", |r| {
            r.get("/", farms::list)
                .get("/new", farms::new_form)
                .post("/", farms::create)
                .get("/:id", farms::show)
                .delete("/:id", farms::delete)
                .get("/:id/products/new", farms::new_product_form)
                .post("/:id/products", farms::create_product)
        })
}

/// Category names for form selects and filters.
pub(crate) fn categories() -> Vec<&'static str> {
    Category::names()
}

#[cfg(test)]
mod tests {
    use super::*;
    use farmstand_store::MemoryStore;

    #[test]
    fn test_every_route_registered() {
        let state = Arc::new(AppState::new(Arc::new(MemoryStore::new())));
        assert_eq!(routes(state).len(), 17);
    }
}
