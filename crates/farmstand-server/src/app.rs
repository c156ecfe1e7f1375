//! Request dispatch.
//!
//! [`App`] runs every request through the middleware pipeline (request id,
//! method override, access log) and then:
//!
//! 1. answers `GET /health`
//! 2. matches a route (HEAD falls back to the GET route) and runs its
//!    handler under the request timeout, catching panics
//! 3. otherwise tries static files for GET and HEAD
//! 4. otherwise fails with "Page not found"
//!
//! Every failure, including a view that fails to render, goes through the
//! [`ErrorNormalizer`].

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use farmstand_core::CatalogError;
use farmstand_router::Router;
use futures_util::FutureExt;
use http::{Method, StatusCode};
use serde::Serialize;

use crate::config::ServerConfig;
use crate::error_page::ErrorNormalizer;
use crate::handler::{BoxFuture, Endpoint, HandlerResult};
use crate::middleware::{MiddlewareContext, Pipeline, Request, Response};
use crate::reply::Reply;
use crate::request::RequestContext;
use crate::response;
use crate::routes::Routes;
use crate::stages::request_id::RequestId;
use crate::stages::{AccessLogMiddleware, MethodOverrideMiddleware, RequestIdMiddleware};
use crate::static_files::StaticFiles;
use crate::views::ViewRenderer;

/// Path of the liveness endpoint.
pub const HEALTH_PATH: &str = "/health";

#[derive(Debug, Serialize)]
struct Health<'a> {
    status: &'static str,
    service: &'a str,
    version: &'a str,
}

/// The request dispatcher. Cheap to clone.
#[derive(Clone)]
pub struct App {
    inner: Arc<AppInner>,
}

struct AppInner {
    pipeline: Pipeline,
    router: Router<Endpoint>,
    views: ViewRenderer,
    static_files: Option<StaticFiles>,
    errors: ErrorNormalizer,
    request_timeout: Duration,
    service_name: String,
    version: String,
}

impl App {
    /// Starts a builder.
    #[must_use]
    pub fn builder() -> AppBuilder {
        AppBuilder::default()
    }

    /// Handles one buffered request.
    pub async fn handle(&self, request: Request) -> Response {
        self.run(request, None).await
    }

    /// Runs `request` through the pipeline but answers with `error`
    /// instead of dispatching, e.g. when its body was rejected.
    pub async fn reject(&self, request: Request, error: CatalogError) -> Response {
        self.run(request, Some(error)).await
    }

    async fn run(&self, request: Request, failure: Option<CatalogError>) -> Response {
        let inner = Arc::clone(&self.inner);
        let mut ctx = MiddlewareContext::new();
        self.inner
            .pipeline
            .process(
                &mut ctx,
                request,
                move |ctx: &mut MiddlewareContext, request: Request| -> BoxFuture<'static, Response> {
                    let request_id = ctx.request_id();
                    Box::pin(async move {
                        let is_head = request.method() == Method::HEAD;
                        let response = match failure {
                            Some(error) => inner.fail(&error, request_id),
                            None => inner.dispatch(request_id, request).await,
                        };
                        if is_head {
                            response::without_body(response)
                        } else {
                            response
                        }
                    })
                },
            )
            .await
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("pipeline", &self.inner.pipeline)
            .field("routes", &self.inner.router.len())
            .field("request_timeout", &self.inner.request_timeout)
            .finish_non_exhaustive()
    }
}

impl AppInner {
    async fn dispatch(&self, request_id: RequestId, request: Request) -> Response {
        let (parts, body) = request.into_parts();
        let lookup = if parts.method == Method::HEAD {
            Method::GET
        } else {
            parts.method.clone()
        };

        if lookup == Method::GET && parts.uri.path() == HEALTH_PATH {
            return response::json(
                StatusCode::OK,
                &Health {
                    status: "healthy",
                    service: &self.service_name,
                    version: &self.version,
                },
            );
        }

        let matched = self
            .router
            .match_route(&lookup, parts.uri.path())
            .map(|m| (Arc::clone(m.endpoint), m.params));

        let Some((endpoint, params)) = matched else {
            return self.fallback(request_id, &parts).await;
        };

        let ctx = RequestContext::new(parts.method, parts.uri, parts.headers, body, params, request_id);
        match self.call(endpoint, ctx).await {
            Ok(reply) => self.render(reply, request_id),
            Err(error) => self.fail(&error, request_id),
        }
    }

    async fn call(&self, endpoint: Endpoint, ctx: RequestContext) -> HandlerResult {
        let guarded = AssertUnwindSafe(async move { endpoint(ctx).await }).catch_unwind();
        match tokio::time::timeout(self.request_timeout, guarded).await {
            Ok(Ok(result)) => result,
            Ok(Err(panic)) => Err(CatalogError::internal(format!(
                "handler panicked: {}",
                panic_message(panic.as_ref())
            ))),
            Err(_) => Err(CatalogError::Timeout {
                elapsed_ms: u64::try_from(self.request_timeout.as_millis()).unwrap_or(u64::MAX),
            }),
        }
    }

    fn render(&self, reply: Reply, request_id: RequestId) -> Response {
        match reply {
            Reply::View {
                status,
                template,
                context,
            } => match self.views.render(&template, &context) {
                Ok(html) => response::html(status, html),
                Err(error) => self.fail(&error, request_id),
            },
            Reply::Redirect { status, location } => response::redirect(status, location.as_str()),
            Reply::Html { status, body } => response::html(status, body),
        }
    }

    async fn fallback(&self, request_id: RequestId, parts: &http::request::Parts) -> Response {
        let path = parts.uri.path();
        if let Some(files) = &self.static_files {
            if parts.method == Method::GET || parts.method == Method::HEAD {
                match files.handle(path, &parts.headers, &parts.method).await {
                    Ok(response) => return response,
                    Err(error) if error.status_code().is_server_error() => {
                        let error =
                            CatalogError::internal_with_source("failed to read static file", error);
                        return self.fail(&error, request_id);
                    }
                    // refused or absent files fall through to the catch-all
                    Err(_) => {}
                }
            }
        }
        self.fail(
            &CatalogError::route_not_found(parts.method.as_str(), path),
            request_id,
        )
    }

    fn fail(&self, error: &CatalogError, request_id: RequestId) -> Response {
        self.errors.respond(error, &self.views, request_id)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "unknown panic"
    }
}

/// Builder for [`App`].
pub struct AppBuilder {
    router: Router<Endpoint>,
    views: ViewRenderer,
    static_files: Option<StaticFiles>,
    config: ServerConfig,
    version: String,
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self {
            router: Router::new(),
            views: ViewRenderer::empty(),
            static_files: None,
            config: ServerConfig::default(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl AppBuilder {
    /// Installs the route table.
    #[must_use]
    pub fn routes<S: Send + Sync + 'static>(mut self, routes: Routes<S>) -> Self {
        self.router = routes.into_router();
        self
    }

    /// Sets the view renderer.
    #[must_use]
    pub fn views(mut self, views: ViewRenderer) -> Self {
        self.views = views;
        self
    }

    /// Serves static files for unmatched GET and HEAD requests.
    #[must_use]
    pub fn static_files(mut self, files: StaticFiles) -> Self {
        self.static_files = Some(files);
        self
    }

    /// Applies timeouts, error exposure and the service name.
    #[must_use]
    pub fn config(mut self, config: &ServerConfig) -> Self {
        self.config = config.clone();
        self
    }

    /// Version reported by `/health`.
    #[must_use]
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Builds the app.
    #[must_use]
    pub fn build(self) -> App {
        let pipeline = Pipeline::new()
            .with(RequestIdMiddleware::new())
            .with(MethodOverrideMiddleware::new())
            .with(AccessLogMiddleware::new());

        App {
            inner: Arc::new(AppInner {
                pipeline,
                router: self.router,
                views: self.views,
                static_files: self.static_files,
                errors: ErrorNormalizer::new(self.config.expose_internal_errors()),
                request_timeout: self.config.request_timeout(),
                service_name: self.config.service_name().to_string(),
                version: self.version,
            }),
        }
    }
}
