//! Error pages.

use farmstand_core::CatalogError;
use farmstand_telemetry::fields;
use serde::Serialize;

use crate::middleware::Response;
use crate::response;
use crate::stages::request_id::RequestId;
use crate::views::ViewRenderer;

/// View rendered for every failed request.
pub const ERROR_VIEW: &str = "errors/error.html";

#[derive(Debug, Serialize)]
struct ErrorView<'a> {
    status: u16,
    reason: &'a str,
    message: &'a str,
}

/// Turns a [`CatalogError`] into the error page.
///
/// Status and message come from [`CatalogError::classify`]. If the error
/// view itself cannot be rendered the message is sent as plain text with
/// the same status.
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorNormalizer {
    expose_internal: bool,
}

impl ErrorNormalizer {
    /// Creates a normalizer; internal messages stay hidden unless
    /// `expose_internal` is set.
    #[must_use]
    pub fn new(expose_internal: bool) -> Self {
        Self { expose_internal }
    }

    /// Logs `error` and renders its page.
    pub fn respond(
        &self,
        error: &CatalogError,
        views: &ViewRenderer,
        request_id: RequestId,
    ) -> Response {
        let class = error.classify(self.expose_internal);
        let kind = error.kind();

        if class.status.is_server_error() {
            tracing::error!(
                { fields::REQUEST_ID } = %request_id,
                { fields::ERROR_KIND } = ?kind,
                { fields::ERROR } = ?error,
                "request failed"
            );
        } else {
            tracing::warn!(
                { fields::REQUEST_ID } = %request_id,
                { fields::ERROR_KIND } = ?kind,
                { fields::ERROR } = %error,
                "request rejected"
            );
        }

        let page = ErrorView {
            status: class.status.as_u16(),
            reason: class.status.canonical_reason().unwrap_or("Error"),
            message: &class.message,
        };
        match views.render(ERROR_VIEW, &minijinja::Value::from_serialize(&page)) {
            Ok(html) => response::html(class.status, html),
            Err(render_error) => {
                tracing::error!(
                    { fields::REQUEST_ID } = %request_id,
                    { fields::ERROR } = %render_error,
                    "error view unavailable, sending plain text"
                );
                response::text(class.status, class.message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use farmstand_core::FieldErrors;
    use http::StatusCode;
    use http_body_util::BodyExt;

    fn views() -> ViewRenderer {
        ViewRenderer::from_templates([(
            ERROR_VIEW,
            "<h1>{{ status }} {{ reason }}</h1><p>{{ message }}</p>",
        )])
        .unwrap()
    }

    async fn page(response: Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_not_found_page() {
        let err = CatalogError::not_found("Product Not Found");
        let response = ErrorNormalizer::default().respond(&err, &views(), RequestId::new());
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            page(response).await,
            "<h1>404 Not Found</h1><p>Product Not Found</p>"
        );
    }

    #[tokio::test]
    async fn test_validation_page_lists_fields() {
        let mut fields = FieldErrors::new();
        fields.add("name", "\"name\" is required");
        fields.add("price", "\"price\" must be a number");
        let err = CatalogError::from(fields);

        let response = ErrorNormalizer::default().respond(&err, &views(), RequestId::new());
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let html = page(response).await;
        assert!(html.contains("400 Bad Request"));
        assert!(html.contains("&quot;name&quot; is required"));
    }

    #[tokio::test]
    async fn test_internal_message_hidden() {
        let err = CatalogError::internal("connection pool exhausted");
        let response = ErrorNormalizer::new(false).respond(&err, &views(), RequestId::new());
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let html = page(response).await;
        assert!(html.contains("Something Went wrong!!!"));
        assert!(!html.contains("pool"));
    }

    #[tokio::test]
    async fn test_internal_message_exposed() {
        let err = CatalogError::internal("connection pool exhausted");
        let response = ErrorNormalizer::new(true).respond(&err, &views(), RequestId::new());
        assert!(page(response).await.contains("connection pool exhausted"));
    }

    #[tokio::test]
    async fn test_plain_text_fallback() {
        let err = CatalogError::route_not_found("GET", "/nowhere");
        let response =
            ErrorNormalizer::default().respond(&err, &ViewRenderer::empty(), RequestId::new());
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers()[http::header::CONTENT_TYPE],
            "text/plain; charset=utf-8"
        );
        assert_eq!(page(response).await, "Page not found");
    }
}
