//! Error taxonomy for the catalog.
//!
//! Every failure a handler can produce is a [`CatalogError`]. The error page
//! is chosen by [`CatalogError::classify`], a total mapping from
//! [`ErrorKind`] to status and user-facing message:
//!
//! | `ErrorKind` | Status | Message |
//! |---|---|---|
//! | `InvalidId` | 404 | `Page not found` |
//! | `RouteNotFound` | 404 | `Page not found` |
//! | `NotFound` | 404 | the error's own message |
//! | `Validation` | 400 | joined field messages |
//! | `PayloadTooLarge` | 413 | `Payload Too Large` |
//! | `Timeout` | 504 | `Request timed out` |
//! | `Internal` | 500 | `Something Went wrong!!!` |

use http::StatusCode;
use indexmap::IndexMap;
use serde::Serialize;
use thiserror::Error;

/// Result type alias using [`CatalogError`].
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Message shown for malformed identifiers and unmatched routes.
pub const PAGE_NOT_FOUND: &str = "Page not found";

/// Message shown for internal failures unless details are exposed.
pub const GENERIC_FAILURE: &str = "Something Went wrong!!!";

/// Tag used to classify a [`CatalogError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// A path identifier could not be parsed.
    InvalidId,
    /// No route matched the method and path.
    RouteNotFound,
    /// A record lookup came back empty.
    NotFound,
    /// Submitted data failed validation.
    Validation,
    /// Request body exceeded the configured limit.
    PayloadTooLarge,
    /// Handler did not finish within the request timeout.
    Timeout,
    /// Store, view or handler failure.
    Internal,
}

impl ErrorKind {
    /// Returns the HTTP status for this kind.
    #[must_use]
    pub const fn status_code(self) -> StatusCode {
        match self {
            Self::InvalidId | Self::RouteNotFound | Self::NotFound => StatusCode::NOT_FOUND,
            Self::Validation => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Timeout => StatusCode::GATEWAY_TIMEOUT,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Status and message chosen for an error page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorClass {
    /// HTTP status of the error response.
    pub status: StatusCode,
    /// Message rendered on the error page.
    pub message: String,
}

/// Failure raised while handling a catalog request.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// A path identifier was malformed.
    #[error("invalid record id '{value}'")]
    InvalidId {
        /// The text that failed to parse.
        value: String,
    },

    /// No route matched.
    #[error("no route for {method} {path}")]
    RouteNotFound {
        /// Request method.
        method: String,
        /// Request path.
        path: String,
    },

    /// A record lookup came back empty.
    #[error("{message}")]
    NotFound {
        /// Message shown to the user, e.g. "Product Not Found".
        message: String,
    },

    /// Submitted data failed validation.
    #[error("{message}")]
    Validation {
        /// Field messages joined with `,`.
        message: String,
        /// Per-field messages.
        #[source]
        field_errors: Option<FieldErrors>,
    },

    /// Request body exceeded the configured limit.
    #[error("request body exceeds {limit} bytes")]
    PayloadTooLarge {
        /// Configured limit in bytes.
        limit: usize,
    },

    /// Handler did not finish in time.
    #[error("request timed out after {elapsed_ms} ms")]
    Timeout {
        /// Configured timeout in milliseconds.
        elapsed_ms: u64,
    },

    /// Store, view or handler failure.
    #[error("{message}")]
    Internal {
        /// Internal description, never shown unless exposure is enabled.
        message: String,
        /// The underlying error.
        #[source]
        source: Option<anyhow::Error>,
    },
}

impl CatalogError {
    /// Creates an explicit not-found error carrying `message`.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Creates a validation error with a preformatted message.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field_errors: None,
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an internal error wrapping `source`.
    pub fn internal_with_source(
        message: impl Into<String>,
        source: impl Into<anyhow::Error>,
    ) -> Self {
        Self::Internal {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Creates the error raised when no route matches.
    #[must_use]
    pub fn route_not_found(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self::RouteNotFound {
            method: method.into(),
            path: path.into(),
        }
    }

    /// Returns the classification tag.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidId { .. } => ErrorKind::InvalidId,
            Self::RouteNotFound { .. } => ErrorKind::RouteNotFound,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::PayloadTooLarge { .. } => ErrorKind::PayloadTooLarge,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::Internal { .. } => ErrorKind::Internal,
        }
    }

    /// Returns the HTTP status for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        self.kind().status_code()
    }

    /// Chooses the status and user-facing message for the error page.
    ///
    /// Internal messages stay hidden behind [`GENERIC_FAILURE`] unless
    /// `expose_internal` is set.
    #[must_use]
    pub fn classify(&self, expose_internal: bool) -> ErrorClass {
        let message = match self {
            Self::InvalidId { .. } | Self::RouteNotFound { .. } => PAGE_NOT_FOUND.to_string(),
            Self::NotFound { message } | Self::Validation { message, .. } => {
                if message.is_empty() {
                    GENERIC_FAILURE.to_string()
                } else {
                    message.clone()
                }
            }
            Self::PayloadTooLarge { .. } => "Payload Too Large".to_string(),
            Self::Timeout { .. } => "Request timed out".to_string(),
            Self::Internal { message, .. } => {
                if expose_internal && !message.is_empty() {
                    message.clone()
                } else {
                    GENERIC_FAILURE.to_string()
                }
            }
        };

        ErrorClass {
            status: self.status_code(),
            message,
        }
    }
}

impl From<FieldErrors> for CatalogError {
    fn from(errors: FieldErrors) -> Self {
        Self::Validation {
            message: errors.joined(),
            field_errors: Some(errors),
        }
    }
}

/// Field-level validation messages in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Error)]
#[error("field validation failed")]
pub struct FieldErrors {
    /// Messages keyed by field name.
    pub fields: IndexMap<String, Vec<String>>,
}

impl FieldErrors {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a message against `field`.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    /// Returns true if no message has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the messages recorded for `field`.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.fields.get(field).map(Vec::as_slice)
    }

    /// Joins every message with `,` in the order fields were reported.
    #[must_use]
    pub fn joined(&self) -> String {
        self.fields
            .values()
            .flatten()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Returns `Ok(value)` when empty, otherwise `Err(self)`.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_id_classifies_as_page_not_found() {
        let err = CatalogError::InvalidId {
            value: "nope".to_string(),
        };
        let class = err.classify(false);
        assert_eq!(class.status, StatusCode::NOT_FOUND);
        assert_eq!(class.message, "Page not found");
    }

    #[test]
    fn test_route_not_found_classifies_as_page_not_found() {
        let class = CatalogError::route_not_found("GET", "/missing").classify(false);
        assert_eq!(class.status, StatusCode::NOT_FOUND);
        assert_eq!(class.message, PAGE_NOT_FOUND);
    }

    #[test]
    fn test_explicit_not_found_keeps_message() {
        let class = CatalogError::not_found("Product Not Found").classify(false);
        assert_eq!(class.status, StatusCode::NOT_FOUND);
        assert_eq!(class.message, "Product Not Found");
    }

    #[test]
    fn test_validation_carries_joined_messages() {
        let mut errors = FieldErrors::new();
        errors.add("name", "\"name\" is required");
        errors.add("price", "\"price\" must be greater than or equal to 0");

        let err = CatalogError::from(errors);
        let class = err.classify(false);
        assert_eq!(class.status, StatusCode::BAD_REQUEST);
        assert_eq!(
            class.message,
            "\"name\" is required,\"price\" must be greater than or equal to 0"
        );
    }

    #[test]
    fn test_internal_hides_details_by_default() {
        let err = CatalogError::internal("template products/index.html missing");
        assert_eq!(err.classify(false).message, GENERIC_FAILURE);
        assert_eq!(
            err.classify(true).message,
            "template products/index.html missing"
        );
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_every_kind_has_a_status() {
        let errors = [
            CatalogError::InvalidId { value: String::new() },
            CatalogError::route_not_found("GET", "/"),
            CatalogError::not_found(""),
            CatalogError::validation(""),
            CatalogError::PayloadTooLarge { limit: 1 },
            CatalogError::Timeout { elapsed_ms: 1 },
            CatalogError::internal(""),
        ];
        for err in &errors {
            let class = err.classify(false);
            assert!(class.status.is_client_error() || class.status.is_server_error());
            assert!(!class.message.is_empty(), "{:?} produced an empty message", err.kind());
        }
    }

    #[test]
    fn test_field_errors_into_result() {
        assert_eq!(FieldErrors::new().into_result(5), Ok(5));

        let mut errors = FieldErrors::new();
        errors.add("name", "bad");
        assert!(errors.into_result(5).is_err());
    }
}
