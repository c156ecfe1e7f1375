//! Handler trait.
//!
//! Every route handler returns a [`HandlerResult`]. Failures are values, so
//! the dispatcher always sees them and hands them to the error page.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use farmstand_core::CatalogError;

use crate::reply::Reply;
use crate::request::RequestContext;

/// A boxed, sendable future.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Outcome of a handler.
pub type HandlerResult = Result<Reply, CatalogError>;

/// A route handler over shared state `S`.
///
/// Implemented for any `async fn(Arc<S>, RequestContext) -> HandlerResult`.
pub trait Handler<S>: Send + Sync + 'static {
    /// Handles one request.
    fn handle(&self, state: Arc<S>, ctx: RequestContext) -> BoxFuture<'static, HandlerResult>;
}

impl<S, F, Fut> Handler<S> for F
where
    S: Send + Sync + 'static,
    F: Fn(Arc<S>, RequestContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    fn handle(&self, state: Arc<S>, ctx: RequestContext) -> BoxFuture<'static, HandlerResult> {
        Box::pin(self(state, ctx))
    }
}

/// A handler with its state already bound.
pub(crate) type Endpoint =
    Arc<dyn Fn(RequestContext) -> BoxFuture<'static, HandlerResult> + Send + Sync>;

/// Binds `state` into `handler`.
pub(crate) fn bind<S, H>(state: Arc<S>, handler: H) -> Endpoint
where
    S: Send + Sync + 'static,
    H: Handler<S>,
{
    Arc::new(move |ctx: RequestContext| -> BoxFuture<'static, HandlerResult> {
        handler.handle(Arc::clone(&state), ctx)
    })
}
