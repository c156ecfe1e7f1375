//! Response constructors.

use bytes::Bytes;
use http::header::{CONTENT_TYPE, LOCATION};
use http::{HeaderValue, StatusCode};
use http_body_util::Full;

use crate::middleware::Response;

const HTML: &str = "text/html; charset=utf-8";
const TEXT: &str = "text/plain; charset=utf-8";
const JSON: &str = "application/json";

fn with_body(status: StatusCode, content_type: &'static str, body: impl Into<Bytes>) -> Response {
    let mut response = Response::new(Full::new(body.into()));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
}

/// An HTML response.
#[must_use]
pub fn html(status: StatusCode, body: impl Into<Bytes>) -> Response {
    with_body(status, HTML, body)
}

/// A plain-text response.
#[must_use]
pub fn text(status: StatusCode, body: impl Into<Bytes>) -> Response {
    with_body(status, TEXT, body)
}

/// A JSON response. Serialization failures become a plain-text 500.
#[must_use]
pub fn json<T: serde::Serialize>(status: StatusCode, value: &T) -> Response {
    match serde_json::to_vec(value) {
        Ok(body) => with_body(status, JSON, body),
        Err(e) => {
            tracing::error!(error = %e, "failed to serialize JSON response");
            text(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
        }
    }
}

/// A redirect to `location` with an empty body.
#[must_use]
pub fn redirect(status: StatusCode, location: &str) -> Response {
    match HeaderValue::from_str(location) {
        Ok(value) => {
            let mut response = Response::new(Full::new(Bytes::new()));
            *response.status_mut() = status;
            response.headers_mut().insert(LOCATION, value);
            response
        }
        Err(_) => {
            tracing::error!(location, "redirect target is not a valid header value");
            text(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
        }
    }
}

/// Drops the body of a response to a HEAD request, keeping its headers.
#[must_use]
pub fn without_body(response: Response) -> Response {
    let (parts, _) = response.into_parts();
    Response::from_parts(parts, Full::new(Bytes::new()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[test]
    fn test_html_content_type() {
        let response = html(StatusCode::OK, "<p>hi</p>");
        assert_eq!(response.headers()[CONTENT_TYPE], HTML);
    }

    #[test]
    fn test_redirect() {
        let response = redirect(StatusCode::FOUND, "/products");
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[LOCATION], "/products");
    }

    #[test]
    fn test_redirect_rejects_control_characters() {
        let response = redirect(StatusCode::FOUND, "/products\n");
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_without_body_keeps_headers() {
        let response = without_body(text(StatusCode::OK, "hello"));
        assert_eq!(response.headers()[CONTENT_TYPE], TEXT);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert!(body.is_empty());
    }
}
