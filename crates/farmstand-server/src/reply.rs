//! Handler replies.

use farmstand_core::ResourcePath;
use http::StatusCode;
use serde::Serialize;

/// What a handler produced, before it is turned into a response.
///
/// Views are rendered by the [`crate::App`] so a rendering failure takes
/// the same error path as a handler failure.
#[derive(Debug, Clone)]
pub enum Reply {
    /// Render a template by logical name.
    View {
        /// Response status.
        status: StatusCode,
        /// Template name, e.g. `products/index.html`.
        template: String,
        /// Template context.
        context: minijinja::Value,
    },
    /// Redirect to an absolute resource path.
    Redirect {
        /// Redirect status.
        status: StatusCode,
        /// Target path.
        location: ResourcePath,
    },
    /// Pre-rendered HTML.
    Html {
        /// Response status.
        status: StatusCode,
        /// Markup.
        body: String,
    },
}

impl Reply {
    /// Renders `template` with `context` and status 200.
    pub fn view<C: Serialize>(template: impl Into<String>, context: &C) -> Self {
        Self::View {
            status: StatusCode::OK,
            template: template.into(),
            context: minijinja::Value::from_serialize(context),
        }
    }

    /// Redirects with `302 Found`.
    #[must_use]
    pub fn redirect(location: ResourcePath) -> Self {
        Self::Redirect {
            status: StatusCode::FOUND,
            location,
        }
    }

    /// Returns HTML with status 200.
    pub fn html(body: impl Into<String>) -> Self {
        Self::Html {
            status: StatusCode::OK,
            body: body.into(),
        }
    }

    /// Status the response will carry.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::View { status, .. }
            | Self::Redirect { status, .. }
            | Self::Html { status, .. } => *status,
        }
    }
}
