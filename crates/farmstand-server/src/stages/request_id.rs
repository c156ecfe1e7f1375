//! Request ids.
//!
//! An incoming `x-request-id` holding a UUID is kept so ids propagate across
//! services; anything else gets a fresh UUID v7. The id is echoed on the
//! response.

use std::fmt;

use http::HeaderValue;
use uuid::Uuid;

use crate::handler::BoxFuture;
use crate::middleware::{Middleware, MiddlewareContext, Next, Request, Response};

/// Header carrying the request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Identifier of a single request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(Uuid);

impl RequestId {
    /// New time-ordered id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Wraps an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Inner UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Assigns or propagates the request id.
#[derive(Debug, Clone)]
pub struct RequestIdMiddleware {
    trust_incoming: bool,
}

impl Default for RequestIdMiddleware {
    fn default() -> Self {
        Self {
            trust_incoming: true,
        }
    }
}

impl RequestIdMiddleware {
    /// Stage that keeps valid incoming ids.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage that always generates a new id.
    #[must_use]
    pub fn ignore_incoming() -> Self {
        Self {
            trust_incoming: false,
        }
    }

    fn incoming(&self, request: &Request) -> Option<RequestId> {
        if !self.trust_incoming {
            return None;
        }
        request
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| Uuid::parse_str(s.trim()).ok())
            .map(RequestId::from_uuid)
    }
}

impl Middleware for RequestIdMiddleware {
    fn name(&self) -> &'static str {
        "request_id"
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut MiddlewareContext,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, Response> {
        Box::pin(async move {
            let request_id = self.incoming(&request).unwrap_or_default();
            ctx.set_request_id(request_id);

            let mut response = next.run(ctx, request).await;
            // a hyphenated UUID is always a valid header value
            if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
                response.headers_mut().insert(REQUEST_ID_HEADER, value);
            }
            response
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use http::StatusCode;

    fn ok(_: &mut MiddlewareContext, _: Request) -> BoxFuture<'static, Response> {
        Box::pin(async { crate::response::text(StatusCode::OK, "OK") })
    }

    fn request(id: Option<&str>) -> Request {
        let mut builder = http::Request::builder().uri("/products");
        if let Some(id) = id {
            builder = builder.header(REQUEST_ID_HEADER, id);
        }
        builder.body(Bytes::new()).unwrap()
    }

    #[tokio::test]
    async fn test_generates_id() {
        let stage = RequestIdMiddleware::new();
        let mut ctx = MiddlewareContext::new();
        let response = stage
            .process(&mut ctx, request(None), Next::terminal(ok))
            .await;

        let header = response.headers()[REQUEST_ID_HEADER].to_str().unwrap();
        assert_eq!(header, ctx.request_id().to_string());
    }

    #[tokio::test]
    async fn test_propagates_incoming_id() {
        let incoming = "01890a5d-ac96-774b-bcce-b302099a8057";
        let stage = RequestIdMiddleware::new();
        let mut ctx = MiddlewareContext::new();
        let response = stage
            .process(&mut ctx, request(Some(incoming)), Next::terminal(ok))
            .await;

        assert_eq!(response.headers()[REQUEST_ID_HEADER], incoming);
        assert_eq!(ctx.request_id().to_string(), incoming);
    }

    #[tokio::test]
    async fn test_replaces_garbage_id() {
        let stage = RequestIdMiddleware::new();
        let mut ctx = MiddlewareContext::new();
        let response = stage
            .process(&mut ctx, request(Some("not-a-uuid")), Next::terminal(ok))
            .await;

        assert_ne!(response.headers()[REQUEST_ID_HEADER], "not-a-uuid");
    }

    #[tokio::test]
    async fn test_ignore_incoming() {
        let incoming = "01890a5d-ac96-774b-bcce-b302099a8057";
        let stage = RequestIdMiddleware::ignore_incoming();
        let mut ctx = MiddlewareContext::new();
        let response = stage
            .process(&mut ctx, request(Some(incoming)), Next::terminal(ok))
            .await;

        assert_ne!(response.headers()[REQUEST_ID_HEADER], incoming);
    }
}
