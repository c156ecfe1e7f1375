//! Server errors.

use thiserror::Error;

/// Errors raised while starting or running the server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The configured address is not a socket address.
    #[error("invalid address '{0}'")]
    InvalidAddress(String),

    /// The listener could not be bound.
    #[error("failed to bind to {addr}: {source}")]
    Bind {
        /// Address that was requested.
        addr: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Templates could not be registered.
    #[error("failed to load view '{name}': {source}")]
    View {
        /// Template name.
        name: String,
        /// Underlying error.
        #[source]
        source: minijinja::Error,
    },
}
