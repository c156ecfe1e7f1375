//! In-memory client.

use bytes::Bytes;
use farmstand_server::App;
use http::header::CONTENT_TYPE;
use http::{HeaderName, HeaderValue, Method};

use crate::error::TestError;
use crate::response::TestResponse;

/// Sends requests straight into an [`App`].
#[derive(Debug, Clone)]
#[must_use]
pub struct TestClient {
    app: App,
    default_headers: Vec<(String, String)>,
}

impl TestClient {
    /// Wraps `app`.
    pub fn new(app: App) -> Self {
        Self {
            app,
            default_headers: Vec::new(),
        }
    }

    /// Adds a header sent with every request.
    pub fn with_default_header(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }

    /// GET request.
    pub fn get(&self, uri: impl AsRef<str>) -> TestClientRequest<'_> {
        self.request(Method::GET, uri)
    }

    /// POST request.
    pub fn post(&self, uri: impl AsRef<str>) -> TestClientRequest<'_> {
        self.request(Method::POST, uri)
    }

    /// PUT request.
    pub fn put(&self, uri: impl AsRef<str>) -> TestClientRequest<'_> {
        self.request(Method::PUT, uri)
    }

    /// PATCH request.
    pub fn patch(&self, uri: impl AsRef<str>) -> TestClientRequest<'_> {
        self.request(Method::PATCH, uri)
    }

    /// DELETE request.
    pub fn delete(&self, uri: impl AsRef<str>) -> TestClientRequest<'_> {
        self.request(Method::DELETE, uri)
    }

    /// HEAD request.
    pub fn head(&self, uri: impl AsRef<str>) -> TestClientRequest<'_> {
        self.request(Method::HEAD, uri)
    }

    /// Request with an arbitrary method.
    pub fn request(&self, method: Method, uri: impl AsRef<str>) -> TestClientRequest<'_> {
        let mut request = TestClientRequest {
            client: self,
            method,
            uri: uri.as_ref().to_string(),
            headers: Vec::new(),
            body: Ok(Bytes::new()),
        };
        for (name, value) in &self.default_headers {
            request = request.header(name, value);
        }
        request
    }
}

/// A request being built by [`TestClient`].
#[must_use]
pub struct TestClientRequest<'a> {
    client: &'a TestClient,
    method: Method,
    uri: String,
    headers: Vec<(String, String)>,
    body: Result<Bytes, TestError>,
}

impl TestClientRequest<'_> {
    /// Adds a header.
    pub fn header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        self.headers
            .push((name.as_ref().to_string(), value.as_ref().to_string()));
        self
    }

    /// Sets a raw body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Ok(body.into());
        self
    }

    /// Sends `value` as JSON.
    pub fn json<T: serde::Serialize + ?Sized>(mut self, value: &T) -> Self {
        self.body = serde_json::to_vec(value)
            .map(Bytes::from)
            .map_err(TestError::from);
        self.header(CONTENT_TYPE.as_str(), "application/json")
    }

    /// Sends `value` as a URL-encoded form, the way a browser submits one.
    pub fn form<T: serde::Serialize + ?Sized>(mut self, value: &T) -> Self {
        self.body = serde_urlencoded::to_string(value)
            .map(Bytes::from)
            .map_err(TestError::from);
        self.header(CONTENT_TYPE.as_str(), "application/x-www-form-urlencoded")
    }

    /// Sends the request.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the response read.
    pub async fn send(self) -> TestResponse {
        match self.try_send().await {
            Ok(response) => response,
            Err(e) => panic!("test request failed: {e}"),
        }
    }

    /// Sends the request, reporting build and read failures.
    pub async fn try_send(self) -> Result<TestResponse, TestError> {
        let body = self.body?;
        let mut request = http::Request::builder()
            .method(self.method)
            .uri(&self.uri)
            .body(body)
            .map_err(|e| TestError::RequestBuild(e.to_string()))?;

        for (name, value) in self.headers {
            let name = HeaderName::try_from(name.as_str())
                .map_err(|e| TestError::RequestBuild(format!("header name '{name}': {e}")))?;
            let value = HeaderValue::try_from(value.as_str())
                .map_err(|e| TestError::RequestBuild(format!("header value for '{name}': {e}")))?;
            request.headers_mut().append(name, value);
        }

        let response = self.client.app.handle(request).await;
        TestResponse::from_http(response).await
    }
}
