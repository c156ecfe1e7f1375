//! Radix tree router for the farmstand catalog server.
//!
//! Routes map a path pattern and an HTTP method to an endpoint of any type.
//! The server stores type-erased handlers as endpoints; tests in this crate
//! use plain strings.
//!
//! Path patterns accept named parameters in either the `:id` or `{id}` form
//! and a trailing catch-all wildcard (`*rest`).
//!
//! # Example
//!
//! ```rust
//! use farmstand_router::{MethodRouter, Router};
//! use http::Method;
//!
//! let mut router = Router::new();
//! router.insert("/products", MethodRouter::new().get("list").post("create"));
//! router.insert("/products/add", MethodRouter::new().get("add_form"));
//! router.insert("/products/:id", MethodRouter::new().get("show").put("update"));
//!
//! let found = router.match_route(&Method::GET, "/products/add").unwrap();
//! assert_eq!(*found.endpoint, "add_form");
//!
//! let found = router.match_route(&Method::PUT, "/products/42").unwrap();
//! assert_eq!(*found.endpoint, "update");
//! assert_eq!(found.params.get("id"), Some("42"));
//! ```
//!
//! # Priority
//!
//! ```text
//!              (root)
//!                │
//!           "products"
//!          [GET, POST]
//!         ┌──────┴──────┐
//!       "add"         ":id"
//!       [GET]     [GET, PUT, DELETE]
//!                   ┌───┴───┐
//!                "edit"   "info"
//! ```
//!
//! Static segments win over parameters, parameters win over wildcards, so
//! `/products/add` never reaches the `:id` branch.

mod method_router;
mod node;
mod params;
mod router;

pub use method_router::MethodRouter;
pub use node::Node;
pub use params::Params;
pub use router::Router;

/// A matched route with its endpoint and extracted parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'a, T> {
    /// The endpoint registered for the method and path
    pub endpoint: &'a T,
    /// Extracted path parameters
    pub params: Params,
}

impl<'a, T> RouteMatch<'a, T> {
    /// Creates a new route match.
    #[must_use]
    pub fn new(endpoint: &'a T, params: Params) -> Self {
        Self { endpoint, params }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;

    fn catalog_router() -> Router<&'static str> {
        let mut router = Router::new();
        router.insert("/products", MethodRouter::new().get("list").post("create"));
        router.insert("/products/add", MethodRouter::new().get("add_form"));
        router.insert(
            "/products/:id",
            MethodRouter::new().get("show").put("update").delete("destroy"),
        );
        router.insert("/products/:id/edit", MethodRouter::new().get("edit"));
        router.insert("/products/:id/info", MethodRouter::new().get("info"));
        router.insert("/farms/{id}/products", MethodRouter::new().post("create_for_farm"));
        router
    }

    #[test]
    fn test_static_beats_param() {
        let router = catalog_router();
        let found = router.match_route(&Method::GET, "/products/add").unwrap();
        assert_eq!(*found.endpoint, "add_form");
        assert!(found.params.is_empty());
    }

    #[test]
    fn test_nested_param_routes() {
        let router = catalog_router();
        let found = router.match_route(&Method::GET, "/products/abc/edit").unwrap();
        assert_eq!(*found.endpoint, "edit");
        assert_eq!(found.params.get("id"), Some("abc"));

        let found = router.match_route(&Method::GET, "/products/abc/info").unwrap();
        assert_eq!(*found.endpoint, "info");
    }

    #[test]
    fn test_brace_and_colon_params_are_equivalent() {
        let router = catalog_router();
        let found = router.match_route(&Method::POST, "/farms/f1/products").unwrap();
        assert_eq!(*found.endpoint, "create_for_farm");
        assert_eq!(found.params.get("id"), Some("f1"));
    }

    #[test]
    fn test_unregistered_method_does_not_match() {
        let router = catalog_router();
        assert!(router.match_route(&Method::PATCH, "/products/1").is_none());
        assert!(router.match_path("/products/1").is_some());
    }

    #[test]
    fn test_unknown_path_does_not_match() {
        let router = catalog_router();
        assert!(router.match_route(&Method::GET, "/nothing/here").is_none());
        assert!(router.match_route(&Method::GET, "/products/1/edit/extra").is_none());
    }
}
