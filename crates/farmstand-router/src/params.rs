//! Path parameters captured during a route match.

use smallvec::SmallVec;

/// Catalog routes capture at most one or two identifiers.
const INLINE_PARAMS: usize = 2;

/// Named values captured from `:name` / `{name}` segments.
///
/// ```rust
/// use farmstand_router::Params;
///
/// let mut params = Params::new();
/// params.push("id", "0190b2f4");
///
/// assert_eq!(params.get("id"), Some("0190b2f4"));
/// assert_eq!(params.get("farm"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Params {
    inner: SmallVec<[(String, String); INLINE_PARAMS]>,
}

impl Params {
    /// Creates an empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a captured value.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.inner.push((name.into(), value.into()));
    }

    /// Returns the value captured for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns true if nothing was captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the number of captured values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Iterates over `(name, value)` pairs in capture order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Drops values captured after the first `len`, used when a branch fails.
    pub(crate) fn truncate(&mut self, len: usize) {
        self.inner.truncate(len);
    }
}

impl FromIterator<(String, String)> for Params {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            inner: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_get() {
        let mut params = Params::new();
        params.push("farm", "f1");
        params.push("id", "p1");

        assert_eq!(params.len(), 2);
        assert_eq!(params.get("farm"), Some("f1"));
        assert_eq!(params.get("id"), Some("p1"));
    }

    #[test]
    fn test_truncate_discards_later_captures() {
        let mut params = Params::new();
        params.push("a", "1");
        params.push("b", "2");
        params.truncate(1);

        assert_eq!(params.get("a"), Some("1"));
        assert_eq!(params.get("b"), None);
    }

    #[test]
    fn test_iter_preserves_order() {
        let params: Params = vec![
            ("x".to_string(), "1".to_string()),
            ("y".to_string(), "2".to_string()),
        ]
        .into_iter()
        .collect();

        let names: Vec<&str> = params.iter().map(|(n, _)| n).collect();
        assert_eq!(names, ["x", "y"]);
    }
}
