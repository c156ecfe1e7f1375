//! Built-in middleware stages.
//!
//! [`crate::App`] installs them in this order: request id, access log,
//! method override.

pub mod access_log;
pub mod method_override;
pub mod request_id;

pub use access_log::AccessLogMiddleware;
pub use method_override::MethodOverrideMiddleware;
pub use request_id::RequestIdMiddleware;
