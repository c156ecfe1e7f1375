//! # Farmstand Core
//!
//! Shared domain types for the farmstand catalog:
//!
//! - [`Product`], [`Farm`] and their write drafts
//! - [`Category`], the single enumerated category set
//! - [`RecordId`], UUID v7 record identifiers
//! - [`validation`], pure validators used by both request handling and the store
//! - [`CatalogError`] with its total [`CatalogError::classify`] mapping
//! - [`paths`], absolute resource paths used for redirects and links

#![doc(html_root_url = "https://docs.rs/farmstand-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod id;
mod model;
pub mod paths;
pub mod validation;

pub use error::{CatalogError, CatalogResult, ErrorClass, ErrorKind, FieldErrors};
pub use id::RecordId;
pub use model::{
    Category, Farm, FarmDraft, FarmWithProducts, Product, ProductDraft, ProductWithFarm,
    ALL_PRODUCTS_LABEL,
};
pub use paths::ResourcePath;
