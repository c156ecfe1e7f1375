//! Per-path method table.

use http::Method;
use smallvec::SmallVec;

/// Maps HTTP methods to endpoints for a single path.
///
/// ```rust
/// use farmstand_router::MethodRouter;
/// use http::Method;
///
/// let methods = MethodRouter::new().get("show").delete("destroy");
///
/// assert_eq!(methods.endpoint(&Method::GET), Some(&"show"));
/// assert_eq!(methods.endpoint(&Method::POST), None);
/// ```
#[derive(Debug, Clone)]
pub struct MethodRouter<T> {
    entries: SmallVec<[(Method, T); 4]>,
}

impl<T> Default for MethodRouter<T> {
    fn default() -> Self {
        Self {
            entries: SmallVec::new(),
        }
    }
}

impl<T> MethodRouter<T> {
    /// Creates an empty method table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a GET endpoint.
    #[must_use]
    pub fn get(self, endpoint: T) -> Self {
        self.method(Method::GET, endpoint)
    }

    /// Registers a POST endpoint.
    #[must_use]
    pub fn post(self, endpoint: T) -> Self {
        self.method(Method::POST, endpoint)
    }

    /// Registers a PUT endpoint.
    #[must_use]
    pub fn put(self, endpoint: T) -> Self {
        self.method(Method::PUT, endpoint)
    }

    /// Registers a PATCH endpoint.
    #[must_use]
    pub fn patch(self, endpoint: T) -> Self {
        self.method(Method::PATCH, endpoint)
    }

    /// Registers a DELETE endpoint.
    #[must_use]
    pub fn delete(self, endpoint: T) -> Self {
        self.method(Method::DELETE, endpoint)
    }

    /// Registers an endpoint for any method, replacing a previous one.
    #[must_use]
    pub fn method(mut self, method: Method, endpoint: T) -> Self {
        self.set(method, endpoint);
        self
    }

    fn set(&mut self, method: Method, endpoint: T) {
        if let Some(slot) = self.entries.iter_mut().find(|(m, _)| *m == method) {
            slot.1 = endpoint;
        } else {
            self.entries.push((method, endpoint));
        }
    }

    /// Returns the endpoint registered for `method`.
    #[must_use]
    pub fn endpoint(&self, method: &Method) -> Option<&T> {
        self.entries
            .iter()
            .find(|(m, _)| m == method)
            .map(|(_, endpoint)| endpoint)
    }

    /// Adds the methods of `other` that this table does not already have.
    pub fn merge(&mut self, other: MethodRouter<T>) {
        for (method, endpoint) in other.entries {
            if self.endpoint(&method).is_none() {
                self.entries.push((method, endpoint));
            }
        }
    }

    /// Returns true if no method is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
