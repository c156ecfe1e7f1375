//! Absolute resource paths.
//!
//! Redirects only accept a [`ResourcePath`], and every constructor here
//! yields a path rooted at its resource collection, independent of the
//! route that produced it.

use std::fmt;

use serde::Serialize;

use crate::id::RecordId;

/// A path rooted at `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ResourcePath(String);

impl ResourcePath {
    /// Returns the path text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn rooted(path: String) -> Self {
        debug_assert!(path.starts_with('/'));
        Self(path)
    }
}

impl fmt::Display for ResourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ResourcePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// `/home`
#[must_use]
pub fn home() -> ResourcePath {
    ResourcePath::rooted("/home".to_string())
}

/// `/products`
#[must_use]
pub fn products() -> ResourcePath {
    ResourcePath::rooted("/products".to_string())
}

/// `/products/{id}`
#[must_use]
pub fn product(id: &RecordId) -> ResourcePath {
    ResourcePath::rooted(format!("/products/{id}"))
}

/// `/products/{id}/edit`
#[must_use]
pub fn product_edit(id: &RecordId) -> ResourcePath {
    ResourcePath::rooted(format!("/products/{id}/edit"))
}

/// `/farms`
#[must_use]
pub fn farms() -> ResourcePath {
    ResourcePath::rooted("/farms".to_string())
}

/// `/farms/{id}`
#[must_use]
pub fn farm(id: &RecordId) -> ResourcePath {
    ResourcePath::rooted(format!("/farms/{id}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_are_rooted() {
        let id = RecordId::new();
        for path in [
            home(),
            products(),
            product(&id),
            product_edit(&id),
            farms(),
            farm(&id),
        ] {
            assert!(path.as_str().starts_with('/'), "{path} is relative");
        }
    }

    #[test]
    fn test_product_path_embeds_id() {
        let id = RecordId::new();
        assert_eq!(product(&id).to_string(), format!("/products/{id}"));
        assert_eq!(farm(&id).as_str(), format!("/farms/{id}"));
    }
}
