//! Request context handed to handlers.

use bytes::Bytes;
use farmstand_core::{CatalogError, CatalogResult, RecordId};
use farmstand_router::Params;
use http::header::CONTENT_TYPE;
use http::{HeaderMap, Method, Uri};
use serde::de::DeserializeOwned;

use crate::stages::request_id::RequestId;

/// A buffered request plus the parameters extracted by the router.
#[derive(Debug, Clone)]
pub struct RequestContext {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
    params: Params,
    request_id: RequestId,
}

impl RequestContext {
    /// Builds a context from its parts.
    #[must_use]
    pub fn new(
        method: Method,
        uri: Uri,
        headers: HeaderMap,
        body: Bytes,
        params: Params,
        request_id: RequestId,
    ) -> Self {
        Self {
            method,
            uri,
            headers,
            body,
            params,
            request_id,
        }
    }

    /// Request method after any override.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Request path without the query.
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    /// Request headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Raw body bytes.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Path parameters.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Id assigned by the request id stage.
    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Returns the path parameter `name`.
    ///
    /// A missing parameter means the route and handler disagree, which is
    /// reported as an internal error.
    pub fn param(&self, name: &str) -> CatalogResult<&str> {
        self.params
            .get(name)
            .ok_or_else(|| CatalogError::internal(format!("route has no ':{name}' parameter")))
    }

    /// Parses the path parameter `name` as a record id.
    ///
    /// Malformed ids surface as [`CatalogError::InvalidId`], which renders
    /// as a 404 page.
    pub fn record_id(&self, name: &str) -> CatalogResult<RecordId> {
        self.param(name)?.parse()
    }

    /// Deserializes the query string; an absent query deserializes from
    /// an empty one.
    pub fn query<T: DeserializeOwned>(&self) -> CatalogResult<T> {
        serde_urlencoded::from_str(self.uri.query().unwrap_or(""))
            .map_err(|e| CatalogError::validation(format!("invalid query string: {e}")))
    }

    /// Deserializes the body as JSON when the content type says so, and as
    /// a URL-encoded form otherwise.
    pub fn form<T: DeserializeOwned>(&self) -> CatalogResult<T> {
        if self.is_json() {
            serde_json::from_slice(&self.body)
                .map_err(|e| CatalogError::validation(format!("invalid JSON body: {e}")))
        } else {
            serde_urlencoded::from_bytes(&self.body)
                .map_err(|e| CatalogError::validation(format!("invalid form body: {e}")))
        }
    }

    fn is_json(&self) -> bool {
        self.headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .is_some_and(|mime| {
                let mime = mime.trim();
                mime.eq_ignore_ascii_case("application/json") || mime.ends_with("+json")
            })
    }
}
