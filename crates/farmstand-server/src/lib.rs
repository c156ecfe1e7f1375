//! # Farmstand Server
//!
//! HTTP plumbing for the catalog application:
//!
//! - [`Routes`] registers handlers that return [`HandlerResult`]; there is no
//!   other way to register a route, so every failure reaches the error page
//! - [`App`] dispatches a buffered request through the middleware pipeline
//!   (request id, access log, method override), the router, static files
//!   and the [`ErrorNormalizer`]
//! - [`ViewRenderer`] renders logical view names with minijinja
//! - [`Server`] runs an [`App`] on hyper with graceful shutdown
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use farmstand_server::{App, Reply, RequestContext, Routes, Server, ServerConfig, ViewRenderer};
//!
//! async fn home(_: Arc<()>, _: RequestContext) -> farmstand_server::HandlerResult {
//!     Ok(Reply::html("<h1>Farmstand</h1>"))
//! }
//!
//! let routes = Routes::new(Arc::new(())).get("/home", home);
//! let app = App::builder().routes(routes).views(ViewRenderer::from_dir("views")).build();
//! Server::new(ServerConfig::default(), app).run().await?;
//! ```

#![doc(html_root_url = "https://docs.rs/farmstand-server/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod app;
mod config;
mod error;
mod error_page;
mod handler;
pub mod middleware;
mod reply;
mod request;
pub mod response;
mod routes;
mod server;
pub mod shutdown;
pub mod stages;
pub mod static_files;
mod views;

pub use app::{App, AppBuilder, HEALTH_PATH};
pub use config::{ServerConfig, ServerConfigBuilder};
pub use error::ServerError;
pub use error_page::{ErrorNormalizer, ERROR_VIEW};
pub use handler::{BoxFuture, Handler, HandlerResult};
pub use middleware::{Middleware, MiddlewareContext, Next, Request, Response};
pub use reply::Reply;
pub use request::RequestContext;
pub use routes::Routes;
pub use server::Server;
pub use shutdown::ShutdownSignal;
pub use stages::request_id::{RequestId, REQUEST_ID_HEADER};
pub use static_files::StaticFiles;
pub use views::ViewRenderer;
