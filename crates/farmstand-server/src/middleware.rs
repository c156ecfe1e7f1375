//! Middleware chain.
//!
//! A [`Pipeline`] holds an ordered list of [`Middleware`]. For each request
//! it builds a [`Next`] chain ending in the dispatcher; each stage may
//! inspect or rewrite the request, call `next.run`, and adjust the
//! response on the way out.

use std::time::Instant;

use bytes::Bytes;
use http_body_util::Full;

use crate::handler::BoxFuture;
use crate::stages::request_id::RequestId;

/// Buffered request flowing through the chain.
pub type Request = http::Request<Bytes>;

/// Response produced by the chain.
pub type Response = http::Response<Full<Bytes>>;

/// Per-request state shared by the stages.
#[derive(Debug, Clone)]
pub struct MiddlewareContext {
    request_id: RequestId,
    started_at: Instant,
}

impl MiddlewareContext {
    /// Fresh context with a new request id.
    #[must_use]
    pub fn new() -> Self {
        Self {
            request_id: RequestId::new(),
            started_at: Instant::now(),
        }
    }

    /// Current request id.
    #[must_use]
    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Replaces the request id.
    pub fn set_request_id(&mut self, id: RequestId) {
        self.request_id = id;
    }

    /// Milliseconds since the context was created.
    #[must_use]
    pub fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.started_at.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

impl Default for MiddlewareContext {
    fn default() -> Self {
        Self::new()
    }
}

/// One stage of the chain.
pub trait Middleware: Send + Sync + 'static {
    /// Stage name, used in logs.
    fn name(&self) -> &'static str;

    /// Processes the request, normally by calling `next.run`.
    fn process<'a>(
        &'a self,
        ctx: &'a mut MiddlewareContext,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, Response>;
}

type Terminal<'a> =
    Box<dyn FnOnce(&mut MiddlewareContext, Request) -> BoxFuture<'static, Response> + Send + 'a>;

/// The rest of the chain.
pub struct Next<'a> {
    inner: NextInner<'a>,
}

enum NextInner<'a> {
    Chain {
        middleware: &'a dyn Middleware,
        next: Box<Next<'a>>,
    },
    Terminal(Terminal<'a>),
}

impl<'a> Next<'a> {
    /// Chain link invoking `middleware` before `next`.
    pub fn new(middleware: &'a dyn Middleware, next: Next<'a>) -> Self {
        Self {
            inner: NextInner::Chain {
                middleware,
                next: Box::new(next),
            },
        }
    }

    /// End of the chain.
    pub fn terminal<F>(f: F) -> Self
    where
        F: FnOnce(&mut MiddlewareContext, Request) -> BoxFuture<'static, Response> + Send + 'a,
    {
        Self {
            inner: NextInner::Terminal(Box::new(f)),
        }
    }

    /// Runs the remainder of the chain. Consumes `self`, so it runs once.
    pub async fn run(self, ctx: &mut MiddlewareContext, request: Request) -> Response {
        match self.inner {
            NextInner::Chain { middleware, next } => middleware.process(ctx, request, *next).await,
            NextInner::Terminal(terminal) => terminal(ctx, request).await,
        }
    }
}

/// Ordered, immutable list of stages.
#[derive(Default)]
pub struct Pipeline {
    stages: Vec<Box<dyn Middleware>>,
}

impl Pipeline {
    /// Empty pipeline.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a stage; earlier stages wrap later ones.
    #[must_use]
    pub fn with<M: Middleware>(mut self, middleware: M) -> Self {
        self.stages.push(Box::new(middleware));
        self
    }

    /// Runs `request` through every stage and then `terminal`.
    pub async fn process<F>(
        &self,
        ctx: &mut MiddlewareContext,
        request: Request,
        terminal: F,
    ) -> Response
    where
        F: FnOnce(&mut MiddlewareContext, Request) -> BoxFuture<'static, Response> + Send + 'static,
    {
        let mut next = Next::terminal(terminal);
        for middleware in self.stages.iter().rev() {
            next = Next::new(middleware.as_ref(), next);
        }
        next.run(ctx, request).await
    }

    /// Stage names in order.
    #[must_use]
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|m| m.name()).collect()
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("stages", &self.stage_names())
            .finish()
    }
}
