//! Static assets.
//!
//! Serves files under a root directory for GET and HEAD requests that no
//! route claimed. Paths with `..` or hidden segments are refused, and the
//! resolved file must stay inside the root after symlinks are followed.
//! Responses carry an ETag and Last-Modified, and conditional requests are
//! answered with 304.

use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;

use bytes::Bytes;
use http::{header, HeaderMap, HeaderValue, Method, StatusCode};
use http_body_util::Full;
use thiserror::Error;

use crate::middleware::Response;

/// Why a static lookup did not produce a file.
#[derive(Debug, Error)]
pub enum StaticFileError {
    /// Nothing servable at the path.
    #[error("file not found: {0}")]
    NotFound(String),

    /// The path tried to leave the root or reach a hidden file.
    #[error("forbidden: {0}")]
    Forbidden(&'static str),

    /// Only GET and HEAD are served.
    #[error("method not allowed")]
    MethodNotAllowed,

    /// Reading the file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StaticFileError {
    /// Status the error maps to.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Static file handler rooted at a directory.
#[derive(Debug, Clone)]
pub struct StaticFiles {
    root: PathBuf,
    cache_control: Option<String>,
}

impl StaticFiles {
    /// Serves files under `root` without a cache policy.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            cache_control: None,
        }
    }

    /// Sets `Cache-Control: public, max-age=<secs>`; zero sends `no-cache`.
    #[must_use]
    pub fn max_age(mut self, secs: u64) -> Self {
        self.cache_control = Some(if secs == 0 {
            "no-cache".to_string()
        } else {
            format!("public, max-age={secs}")
        });
        self
    }

    /// The configured root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Serves `request_path` if it names a file under the root.
    pub async fn handle(
        &self,
        request_path: &str,
        headers: &HeaderMap,
        method: &Method,
    ) -> Result<Response, StaticFileError> {
        if method != Method::GET && method != Method::HEAD {
            return Err(StaticFileError::MethodNotAllowed);
        }

        let path = self.resolve(request_path).await?;
        let metadata = tokio::fs::metadata(&path)
            .await
            .map_err(|_| StaticFileError::NotFound(request_path.to_string()))?;
        if !metadata.is_file() {
            return Err(StaticFileError::NotFound(request_path.to_string()));
        }

        let modified = metadata.modified().ok();
        let etag = modified.and_then(|m| entity_tag(m, metadata.len()));

        if is_fresh(headers, etag.as_deref(), modified) {
            return Ok(self.not_modified(etag.as_deref()));
        }

        let body = if method == Method::HEAD {
            Bytes::new()
        } else {
            Bytes::from(tokio::fs::read(&path).await?)
        };

        let mut response = Response::new(Full::new(body));
        let headers = response.headers_mut();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(content_type(&path)),
        );
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from(metadata.len()));
        self.cache_headers(headers, etag.as_deref());
        if let Some(modified) = modified {
            if let Ok(value) = HeaderValue::from_str(&httpdate::fmt_http_date(modified)) {
                headers.insert(header::LAST_MODIFIED, value);
            }
        }
        Ok(response)
    }

    async fn resolve(&self, request_path: &str) -> Result<PathBuf, StaticFileError> {
        let relative = request_path.trim_start_matches('/');
        if relative.is_empty() {
            return Err(StaticFileError::NotFound(request_path.to_string()));
        }

        for component in Path::new(relative).components() {
            match component {
                Component::Normal(name) => {
                    if name.to_str().is_some_and(|n| n.starts_with('.')) {
                        return Err(StaticFileError::Forbidden("hidden files are not served"));
                    }
                }
                Component::CurDir => {}
                _ => return Err(StaticFileError::Forbidden("path leaves the asset root")),
            }
        }

        let root = match tokio::fs::canonicalize(&self.root).await {
            Ok(root) => root,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(root = %self.root.display(), "static root does not exist");
                return Err(StaticFileError::NotFound(request_path.to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        let resolved = tokio::fs::canonicalize(root.join(relative))
            .await
            .map_err(|_| StaticFileError::NotFound(request_path.to_string()))?;
        if !resolved.starts_with(&root) {
            return Err(StaticFileError::Forbidden("path leaves the asset root"));
        }
        Ok(resolved)
    }

    fn cache_headers(&self, headers: &mut HeaderMap, etag: Option<&str>) {
        if let Some(value) = self
            .cache_control
            .as_deref()
            .and_then(|v| HeaderValue::from_str(v).ok())
        {
            headers.insert(header::CACHE_CONTROL, value);
        }
        if let Some(value) = etag.and_then(|v| HeaderValue::from_str(v).ok()) {
            headers.insert(header::ETAG, value);
        }
    }

    fn not_modified(&self, etag: Option<&str>) -> Response {
        let mut response = Response::new(Full::new(Bytes::new()));
        *response.status_mut() = StatusCode::NOT_MODIFIED;
        self.cache_headers(response.headers_mut(), etag);
        response
    }
}

fn entity_tag(modified: SystemTime, len: u64) -> Option<String> {
    let secs = modified.duration_since(SystemTime::UNIX_EPOCH).ok()?.as_secs();
    Some(format!("\"{secs:x}-{len:x}\""))
}

/// If-None-Match takes precedence over If-Modified-Since.
fn is_fresh(headers: &HeaderMap, etag: Option<&str>, modified: Option<SystemTime>) -> bool {
    if let Some(candidates) = headers
        .get(header::IF_NONE_MATCH)
        .and_then(|v| v.to_str().ok())
    {
        return etag.is_some_and(|etag| {
            candidates
                .split(',')
                .map(str::trim)
                .any(|c| c == "*" || c == etag || c.strip_prefix("W/") == Some(etag))
        });
    }

    let since = headers
        .get(header::IF_MODIFIED_SINCE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| httpdate::parse_http_date(v).ok());
    match (since, modified) {
        (Some(since), Some(modified)) => {
            let secs = |t: SystemTime| {
                t.duration_since(SystemTime::UNIX_EPOCH)
                    .map(|d| d.as_secs())
                    .unwrap_or(0)
            };
            secs(modified) <= secs(since)
        }
        _ => false,
    }
}

fn content_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match extension.as_str() {
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "js" | "mjs" => "text/javascript; charset=utf-8",
        "json" | "map" => "application/json",
        "txt" => "text/plain; charset=utf-8",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        "ico" => "image/x-icon",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("stylesheets")).unwrap();
        fs::write(
            dir.path().join("stylesheets/app.css"),
            "body { color: green; }",
        )
        .unwrap();
        fs::write(dir.path().join("logo.svg"), "<svg/>").unwrap();
        fs::write(dir.path().join(".env"), "SECRET=1").unwrap();
        dir
    }

    async fn body_of(response: Response) -> Bytes {
        response.into_body().collect().await.unwrap().to_bytes()
    }

    #[tokio::test]
    async fn test_serves_css() {
        let dir = create_test_dir();
        let files = StaticFiles::new(dir.path()).max_age(3600);
        let response = files
            .handle("/stylesheets/app.css", &HeaderMap::new(), &Method::GET)
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/css; charset=utf-8"
        );
        assert_eq!(
            response.headers()[header::CACHE_CONTROL],
            "public, max-age=3600"
        );
        assert!(response.headers().contains_key(header::ETAG));
        assert!(response.headers().contains_key(header::LAST_MODIFIED));
        assert_eq!(&body_of(response).await[..], b"body { color: green; }");
    }

    #[tokio::test]
    async fn test_head_has_no_body() {
        let dir = create_test_dir();
        let files = StaticFiles::new(dir.path());
        let response = files
            .handle("/logo.svg", &HeaderMap::new(), &Method::HEAD)
            .await
            .unwrap();

        assert_eq!(response.headers()[header::CONTENT_LENGTH], "6");
        assert!(body_of(response).await.is_empty());
    }

    #[tokio::test]
    async fn test_if_none_match() {
        let dir = create_test_dir();
        let files = StaticFiles::new(dir.path());
        let first = files
            .handle("/logo.svg", &HeaderMap::new(), &Method::GET)
            .await
            .unwrap();
        let etag = first.headers()[header::ETAG].clone();

        let mut headers = HeaderMap::new();
        headers.insert(header::IF_NONE_MATCH, etag);
        let second = files
            .handle("/logo.svg", &headers, &Method::GET)
            .await
            .unwrap();
        assert_eq!(second.status(), StatusCode::NOT_MODIFIED);
    }

    #[tokio::test]
    async fn test_traversal_blocked() {
        let dir = create_test_dir();
        let files = StaticFiles::new(dir.path().join("stylesheets"));
        let err = files
            .handle("/../logo.svg", &HeaderMap::new(), &Method::GET)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_hidden_blocked() {
        let dir = create_test_dir();
        let files = StaticFiles::new(dir.path());
        let err = files
            .handle("/.env", &HeaderMap::new(), &Method::GET)
            .await
            .unwrap_err();
        assert!(matches!(err, StaticFileError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_missing_and_directory_are_not_found() {
        let dir = create_test_dir();
        let files = StaticFiles::new(dir.path());
        for path in ["/missing.css", "/stylesheets", "/"] {
            let err = files
                .handle(path, &HeaderMap::new(), &Method::GET)
                .await
                .unwrap_err();
            assert!(matches!(err, StaticFileError::NotFound(_)), "{path}");
        }
    }

    #[tokio::test]
    async fn test_missing_root_is_not_found() {
        let dir = TempDir::new().unwrap();
        let files = StaticFiles::new(dir.path().join("public"));
        let err = files
            .handle("/stylesheets/app.css", &HeaderMap::new(), &Method::GET)
            .await
            .unwrap_err();
        assert!(matches!(err, StaticFileError::NotFound(_)));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_post_not_allowed() {
        let dir = create_test_dir();
        let files = StaticFiles::new(dir.path());
        let err = files
            .handle("/logo.svg", &HeaderMap::new(), &Method::POST)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[test]
    fn test_content_types() {
        assert_eq!(content_type(Path::new("a.HTML")), "text/html; charset=utf-8");
        assert_eq!(content_type(Path::new("a.png")), "image/png");
        assert_eq!(content_type(Path::new("a")), "application/octet-stream");
    }
}
