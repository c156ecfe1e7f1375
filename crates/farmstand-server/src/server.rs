//! HTTP/1 server.

use std::convert::Infallible;
use std::net::SocketAddr;

use http_body_util::{BodyExt, LengthLimitError, Limited};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::{TcpListener, TcpStream};

use farmstand_core::CatalogError;

use crate::app::App;
use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::middleware::Response;
use crate::shutdown::{ConnectionTracker, ShutdownSignal};

/// Serves an [`App`] over HTTP/1.1.
#[derive(Debug, Clone)]
pub struct Server {
    config: ServerConfig,
    app: App,
}

impl Server {
    /// Creates a server.
    #[must_use]
    pub fn new(config: ServerConfig, app: App) -> Self {
        Self { config, app }
    }

    /// The configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Runs until SIGTERM or SIGINT.
    pub async fn run(self) -> Result<(), ServerError> {
        self.run_with_shutdown(ShutdownSignal::with_os_signals())
            .await
    }

    /// Binds the configured address and runs until `shutdown` fires.
    pub async fn run_with_shutdown(self, shutdown: ShutdownSignal) -> Result<(), ServerError> {
        let addr = self.config.socket_addr()?;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: addr.to_string(),
                source,
            })?;
        self.serve(listener, shutdown).await;
        Ok(())
    }

    /// Accepts connections on `listener` until `shutdown` fires, then waits
    /// up to the shutdown timeout for open connections to finish.
    pub async fn serve(self, listener: TcpListener, shutdown: ShutdownSignal) {
        if let Ok(addr) = listener.local_addr() {
            tracing::info!(%addr, "listening");
        }

        let tracker = ConnectionTracker::new();
        loop {
            tokio::select! {
                accepted = listener.accept() => match accepted {
                    Ok((stream, remote)) => {
                        let token = tracker.acquire();
                        let server = self.clone();
                        let shutdown = shutdown.clone();
                        tokio::spawn(async move {
                            server.handle_connection(stream, remote, shutdown).await;
                            drop(token);
                        });
                    }
                    Err(e) => tracing::error!(error = %e, "failed to accept connection"),
                },
                () = shutdown.recv() => {
                    tracing::info!("shutdown requested, no longer accepting connections");
                    break;
                }
            }
        }

        let timeout = self.config.shutdown_timeout();
        tracing::info!(
            active = tracker.active_connections(),
            timeout_secs = timeout.as_secs(),
            "draining connections"
        );
        tokio::select! {
            () = tracker.wait_for_shutdown() => tracing::info!("all connections closed"),
            () = tokio::time::sleep(timeout) => tracing::warn!(
                active = tracker.active_connections(),
                "shutdown timeout reached"
            ),
        }
        tracing::info!("server stopped");
    }

    async fn handle_connection(self, stream: TcpStream, remote: SocketAddr, shutdown: ShutdownSignal) {
        let io = TokioIo::new(stream);
        let service = service_fn(move |request: hyper::Request<Incoming>| {
            let server = self.clone();
            async move { Ok::<_, Infallible>(server.handle_request(request).await) }
        });

        let conn = http1::Builder::new().serve_connection(io, service);
        tokio::pin!(conn);

        tokio::select! {
            result = conn.as_mut() => {
                if let Err(e) = result {
                    tracing::debug!(%remote, error = %e, "connection closed with error");
                }
                return;
            }
            () = shutdown.recv() => {}
        }

        // let the in-flight request finish, then close
        conn.as_mut().graceful_shutdown();
        if let Err(e) = conn.await {
            tracing::debug!(%remote, error = %e, "connection closed with error during shutdown");
        }
    }

    async fn handle_request(&self, request: hyper::Request<Incoming>) -> Response {
        let limit = self.config.max_body_bytes();
        let (parts, body) = request.into_parts();

        match Limited::new(body, limit).collect().await {
            Ok(collected) => {
                let request = http::Request::from_parts(parts, collected.to_bytes());
                self.app.handle(request).await
            }
            Err(e) => {
                let error = if e.downcast_ref::<LengthLimitError>().is_some() {
                    CatalogError::PayloadTooLarge { limit }
                } else {
                    CatalogError::validation(format!("failed to read request body: {e}"))
                };
                let request = http::Request::from_parts(parts, bytes::Bytes::new());
                self.app.reject(request, error).await
            }
        }
    }
}
