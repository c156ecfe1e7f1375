//! Route registration.

use std::sync::Arc;

use farmstand_router::Router;
use http::Method;

use crate::handler::{bind, Endpoint, Handler};

/// Route table over shared state `S`.
///
/// ```rust,ignore
/// let routes = Routes::new(state)
///     .get("/", index)
///     .scope("/products", |r| r.get("/", list).get("/:id", show));
/// ```
pub struct Routes<S> {
    state: Arc<S>,
    router: Router<Endpoint>,
    prefix: String,
}

impl<S: Send + Sync + 'static> Routes<S> {
    /// Creates an empty table.
    #[must_use]
    pub fn new(state: Arc<S>) -> Self {
        Self {
            state,
            router: Router::new(),
            prefix: String::new(),
        }
    }

    /// Registers `handler` for `method` on `path`, relative to the current
    /// scope.
    #[must_use]
    pub fn route<H: Handler<S>>(mut self, method: Method, path: &str, handler: H) -> Self {
        let full = join(&self.prefix, path);
        let endpoint = bind(Arc::clone(&self.state), handler);
        self.router.route(method, &full, endpoint);
        self
    }

    /// Registers a GET handler.
    #[must_use]
    pub fn get<H: Handler<S>>(self, path: &str, handler: H) -> Self {
        self.route(Method::GET, path, handler)
    }

    /// Registers a POST handler.
    #[must_use]
    pub fn post<H: Handler<S>>(self, path: &str, handler: H) -> Self {
        self.route(Method::POST, path, handler)
    }

    /// Registers a PUT handler.
    #[must_use]
    pub fn put<H: Handler<S>>(self, path: &str, handler: H) -> Self {
        self.route(Method::PUT, path, handler)
    }

    /// Registers a DELETE handler.
    #[must_use]
    pub fn delete<H: Handler<S>>(self, path: &str, handler: H) -> Self {
        self.route(Method::DELETE, path, handler)
    }

    /// Registers the routes added by `build` under `prefix`.
    #[must_use]
    pub fn scope(mut self, prefix: &str, build: impl FnOnce(Self) -> Self) -> Self {
        let outer = std::mem::take(&mut self.prefix);
        self.prefix = join(&outer, prefix);
        let mut scoped = build(self);
        scoped.prefix = outer;
        scoped
    }

    /// Number of registered routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.router.len()
    }

    /// Whether nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.router.is_empty()
    }

    pub(crate) fn into_router(self) -> Router<Endpoint> {
        self.router
    }
}

fn join(prefix: &str, path: &str) -> String {
    let prefix = prefix.trim_end_matches('/');
    match path.trim_start_matches('/') {
        "" if prefix.is_empty() => "/".to_string(),
        "" => prefix.to_string(),
        rest => format!("{prefix}/{rest}"),
    }
}
