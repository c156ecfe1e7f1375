//! Router facade over the radix tree.

use http::Method;

use crate::method_router::MethodRouter;
use crate::node::Node;
use crate::params::Params;
use crate::RouteMatch;

/// A radix tree router generic over its endpoint type.
///
/// Matching priority is static, then parameter, then wildcard.
#[derive(Debug, Clone)]
pub struct Router<T> {
    root: Node<T>,
    route_count: usize,
}

impl<T> Default for Router<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Router<T> {
    /// Creates an empty router.
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: Node::root(),
            route_count: 0,
        }
    }

    /// Inserts a method table for `path`, merging with any table already there.
    pub fn insert(&mut self, path: &str, methods: MethodRouter<T>) {
        self.root.insert(path, methods);
        self.route_count += 1;
    }

    /// Registers a single method endpoint.
    pub fn route(&mut self, method: Method, path: &str, endpoint: T) {
        self.insert(path, MethodRouter::new().method(method, endpoint));
    }

    /// Matches a method and path.
    #[must_use]
    pub fn match_route(&self, method: &Method, path: &str) -> Option<RouteMatch<'_, T>> {
        let (methods, params) = self.root.match_path(path)?;
        let endpoint = methods.endpoint(method)?;
        Some(RouteMatch::new(endpoint, params))
    }

    /// Matches a path regardless of method.
    #[must_use]
    pub fn match_path(&self, path: &str) -> Option<(&MethodRouter<T>, Params)> {
        self.root.match_path(path)
    }

    /// Returns the number of registrations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.route_count
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.route_count == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_merges_methods_on_same_path() {
        let mut router = Router::new();
        router.route(Method::GET, "/farms/:id", "show");
        router.route(Method::DELETE, "/farms/:id", "destroy");

        assert_eq!(router.len(), 2);
        let (methods, _) = router.match_path("/farms/1").unwrap();
        assert_eq!(methods.endpoint(&Method::GET), Some(&"show"));
        assert_eq!(methods.endpoint(&Method::DELETE), Some(&"destroy"));
        assert!(methods.endpoint(&Method::PUT).is_none());
    }

    #[test]
    fn test_trailing_slash_is_ignored() {
        let mut router = Router::new();
        router.route(Method::GET, "/products", "list");

        assert!(router.match_route(&Method::GET, "/products/").is_some());
    }

    #[test]
    fn test_empty_router() {
        let router: Router<()> = Router::new();
        assert!(router.is_empty());
        assert!(router.match_route(&Method::GET, "/").is_none());
    }
}
