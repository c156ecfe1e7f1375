//! HTML forms can only send GET and POST. A POST carrying `_method=DELETE`
//! (or PUT/PATCH) in its query string or URL-encoded body is dispatched as
//! that method.

use http::header::CONTENT_TYPE;
use http::Method;

use crate::handler::BoxFuture;
use crate::middleware::{Middleware, MiddlewareContext, Next, Request, Response};

/// Field carrying the override.
pub const METHOD_FIELD: &str = "_method";

/// Rewrites overridden POST requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct MethodOverrideMiddleware;

impl MethodOverrideMiddleware {
    /// Creates the stage.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn is_form(request: &Request) -> bool {
    request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/x-www-form-urlencoded"))
}

fn find_override(pairs: &[(String, String)]) -> Option<Method> {
    pairs
        .iter()
        .find(|(key, _)| key == METHOD_FIELD)
        .and_then(|(_, value)| match value.trim().to_ascii_uppercase().as_str() {
            "PUT" => Some(Method::PUT),
            "PATCH" => Some(Method::PATCH),
            "DELETE" => Some(Method::DELETE),
            _ => None,
        })
}

/// Override requested by `request`, if any.
pub fn requested_override(request: &Request) -> Option<Method> {
    if request.method() != Method::POST {
        return None;
    }

    let from_query = request
        .uri()
        .query()
        .and_then(|q| serde_urlencoded::from_str::<Vec<(String, String)>>(q).ok())
        .and_then(|pairs| find_override(&pairs));
    if from_query.is_some() {
        return from_query;
    }

    if is_form(request) {
        serde_urlencoded::from_bytes::<Vec<(String, String)>>(request.body())
            .ok()
            .and_then(|pairs| find_override(&pairs))
    } else {
        None
    }
}

impl Middleware for MethodOverrideMiddleware {
    fn name(&self) -> &'static str {
        "method_override"
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut MiddlewareContext,
        mut request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, Response> {
        Box::pin(async move {
            if let Some(method) = requested_override(&request) {
                tracing::debug!(
                    request_id = %ctx.request_id(),
                    override_method = %method,
                    "method overridden"
                );
                *request.method_mut() = method;
            }
            next.run(ctx, request).await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn post(uri: &str, form: Option<&'static str>) -> Request {
        let mut builder = http::Request::builder().method(Method::POST).uri(uri);
        if form.is_some() {
            builder = builder.header(CONTENT_TYPE, "application/x-www-form-urlencoded");
        }
        builder
            .body(Bytes::from_static(form.unwrap_or("").as_bytes()))
            .unwrap()
    }

    #[test]
    fn test_query_override() {
        let request = post("/products/1?_method=DELETE", None);
        assert_eq!(requested_override(&request), Some(Method::DELETE));
    }

    #[test]
    fn test_body_override_is_case_insensitive() {
        let request = post("/products/1", Some("name=Kale&_method=put"));
        assert_eq!(requested_override(&request), Some(Method::PUT));
    }

    #[test]
    fn test_only_unsafe_methods_allowed() {
        assert_eq!(requested_override(&post("/x?_method=GET", None)), None);
        assert_eq!(requested_override(&post("/x?_method=TRACE", None)), None);
    }

    #[test]
    fn test_ignored_for_non_post() {
        let request = http::Request::builder()
            .uri("/products/1?_method=DELETE")
            .body(Bytes::new())
            .unwrap();
        assert_eq!(requested_override(&request), None);
    }

    #[test]
    fn test_body_ignored_without_form_content_type() {
        let request = http::Request::builder()
            .method(Method::POST)
            .uri("/products/1")
            .body(Bytes::from_static(b"_method=DELETE"))
            .unwrap();
        assert_eq!(requested_override(&request), None);
    }

    #[tokio::test]
    async fn test_rewrites_method_before_dispatch() {
        fn echo(_: &mut MiddlewareContext, request: Request) -> BoxFuture<'static, Response> {
            let method = request.method().to_string();
            Box::pin(async move { crate::response::text(http::StatusCode::OK, method) })
        }

        let mut ctx = MiddlewareContext::new();
        let response = MethodOverrideMiddleware::new()
            .process(
                &mut ctx,
                post("/farms/1", Some("_method=DELETE")),
                Next::terminal(echo),
            )
            .await;
        let body = http_body_util::BodyExt::collect(response.into_body())
            .await
            .unwrap()
            .to_bytes();
        assert_eq!(&body[..], b"DELETE");
    }
}
