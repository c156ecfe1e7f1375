//! # Farmstand Store
//!
//! The record store client used by the catalog routes.
//!
//! [`CatalogStore`] exposes find-by-filter, find-by-id, insert, update,
//! delete and reference population for products and farms. [`MemoryStore`]
//! is the bundled implementation: an in-process document store that keeps
//! insertion order and can be seeded from a JSON file.
//!
//! ```rust
//! use farmstand_core::{Category, ProductDraft};
//! use farmstand_store::{CatalogStore, MemoryStore, ProductFilter};
//!
//! # tokio_test::block_on(async {
//! let store = MemoryStore::new();
//! let product = store
//!     .insert_product(ProductDraft {
//!         name: "Plums".to_string(),
//!         price: 3.0,
//!         category: Category::Fruits,
//!         farm: None,
//!     })
//!     .await?;
//!
//! let fruits = store.find_products(&ProductFilter::category("fruits")).await?;
//! assert_eq!(fruits, vec![product]);
//! # Ok::<(), farmstand_store::StoreError>(())
//! # }).unwrap();
//! ```

#![doc(html_root_url = "https://docs.rs/farmstand-store/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod memory;
mod seed;
mod store;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use seed::{FarmSeed, ProductSeed, SeedData};
pub use store::{CatalogStore, ProductFilter};
