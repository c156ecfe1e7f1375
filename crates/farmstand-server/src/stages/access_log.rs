//! One structured log line per request.

use farmstand_telemetry::fields;

use crate::handler::BoxFuture;
use crate::middleware::{Middleware, MiddlewareContext, Next, Request, Response};

/// Logs method, path, status and duration once the response is ready.
///
/// 5xx responses log at `error`, 4xx at `warn`, everything else at `info`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessLogMiddleware;

impl AccessLogMiddleware {
    /// Creates the stage.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Middleware for AccessLogMiddleware {
    fn name(&self) -> &'static str {
        "access_log"
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut MiddlewareContext,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, Response> {
        Box::pin(async move {
            let method = request.method().clone();
            let path = request.uri().path().to_string();

            let response = next.run(ctx, request).await;

            let status = response.status();
            let request_id = ctx.request_id();
            let duration_ms = ctx.elapsed_ms();
            if status.is_server_error() {
                tracing::error!(
                    { fields::REQUEST_ID } = %request_id,
                    { fields::HTTP_METHOD } = %method,
                    { fields::HTTP_PATH } = %path,
                    { fields::HTTP_STATUS } = status.as_u16(),
                    { fields::DURATION_MS } = duration_ms,
                    "request failed"
                );
            } else if status.is_client_error() {
                tracing::warn!(
                    { fields::REQUEST_ID } = %request_id,
                    { fields::HTTP_METHOD } = %method,
                    { fields::HTTP_PATH } = %path,
                    { fields::HTTP_STATUS } = status.as_u16(),
                    { fields::DURATION_MS } = duration_ms,
                    "request rejected"
                );
            } else {
                tracing::info!(
                    { fields::REQUEST_ID } = %request_id,
                    { fields::HTTP_METHOD } = %method,
                    { fields::HTTP_PATH } = %path,
                    { fields::HTTP_STATUS } = status.as_u16(),
                    { fields::DURATION_MS } = duration_ms,
                    "request completed"
                );
            }
            response
        })
    }
}
