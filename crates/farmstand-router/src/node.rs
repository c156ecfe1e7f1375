//! Radix tree node.

use crate::method_router::MethodRouter;
use crate::params::Params;

/// Type of path segment held by a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentKind {
    /// Literal segment such as `products`
    Static,
    /// Named parameter, written `:id` or `{id}`
    Param(String),
    /// Trailing catch-all, written `*rest`
    Wildcard(String),
}

/// A node in the radix tree.
///
/// Nodes at route boundaries carry a [`MethodRouter`].
#[derive(Debug, Clone)]
pub struct Node<T> {
    /// The path segment this node represents
    pub segment: String,
    /// The kind of segment
    pub kind: SegmentKind,
    /// Endpoints for this node, if a route ends here
    pub methods: Option<MethodRouter<T>>,
    /// Static children, sorted by segment for binary search
    pub static_children: Vec<Node<T>>,
    /// Parameter child (at most one per node)
    pub param_child: Option<Box<Node<T>>>,
    /// Wildcard child (at most one per node, always a leaf)
    pub wildcard_child: Option<Box<Node<T>>>,
}

impl<T> Node<T> {
    fn with_kind(segment: String, kind: SegmentKind) -> Self {
        Self {
            segment,
            kind,
            methods: None,
            static_children: Vec::new(),
            param_child: None,
            wildcard_child: None,
        }
    }

    /// Creates a root node for the tree.
    #[must_use]
    pub fn root() -> Self {
        Self::with_kind(String::new(), SegmentKind::Static)
    }

    /// Inserts a route pattern, merging with methods already at that path.
    ///
    /// # Panics
    ///
    /// Panics if a wildcard is not the final segment of `path`.
    pub fn insert(&mut self, path: &str, methods: MethodRouter<T>) {
        let segments = parse_path(path);
        self.insert_segments(&segments, methods);
    }

    fn insert_segments(&mut self, segments: &[(String, SegmentKind)], methods: MethodRouter<T>) {
        let Some(((segment, kind), remaining)) = segments.split_first() else {
            if let Some(existing) = &mut self.methods {
                existing.merge(methods);
            } else {
                self.methods = Some(methods);
            }
            return;
        };

        match kind {
            SegmentKind::Static => {
                match self
                    .static_children
                    .binary_search_by(|c| c.segment.as_str().cmp(segment))
                {
                    Ok(i) => self.static_children[i].insert_segments(remaining, methods),
                    Err(i) => {
                        let mut child = Node::with_kind(segment.clone(), SegmentKind::Static);
                        child.insert_segments(remaining, methods);
                        self.static_children.insert(i, child);
                    }
                }
            }
            SegmentKind::Param(_) => {
                let child = self
                    .param_child
                    .get_or_insert_with(|| Box::new(Node::with_kind(segment.clone(), kind.clone())));
                child.insert_segments(remaining, methods);
            }
            SegmentKind::Wildcard(_) => {
                assert!(
                    remaining.is_empty(),
                    "wildcard must be the last segment in a route"
                );
                let child = self
                    .wildcard_child
                    .get_or_insert_with(|| Box::new(Node::with_kind(segment.clone(), kind.clone())));
                child.insert_segments(remaining, methods);
            }
        }
    }

    /// Matches a request path, returning the method table and captured params.
    #[must_use]
    pub fn match_path(&self, path: &str) -> Option<(&MethodRouter<T>, Params)> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let mut params = Params::new();
        let methods = self.match_segments(&segments, &mut params)?;
        Some((methods, params))
    }

    fn match_segments<'a>(
        &'a self,
        segments: &[&str],
        params: &mut Params,
    ) -> Option<&'a MethodRouter<T>> {
        let Some((segment, remaining)) = segments.split_first() else {
            return self.methods.as_ref();
        };

        if let Some(child) = self.find_static_child(segment) {
            if let Some(found) = child.match_segments(remaining, params) {
                return Some(found);
            }
        }

        if let Some(child) = &self.param_child {
            if let SegmentKind::Param(name) = &child.kind {
                let mark = params.len();
                params.push(name.clone(), *segment);
                if let Some(found) = child.match_segments(remaining, params) {
                    return Some(found);
                }
                params.truncate(mark);
            }
        }

        if let Some(child) = &self.wildcard_child {
            if let SegmentKind::Wildcard(name) = &child.kind {
                params.push(name.clone(), segments.join("/"));
                return child.methods.as_ref();
            }
        }

        None
    }

    fn find_static_child(&self, segment: &str) -> Option<&Node<T>> {
        self.static_children
            .binary_search_by(|c| c.segment.as_str().cmp(segment))
            .ok()
            .map(|i| &self.static_children[i])
    }
}

/// Splits a route pattern into typed segments.
fn parse_path(path: &str) -> Vec<(String, SegmentKind)> {
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(|s| {
            let param = s
                .strip_prefix(':')
                .or_else(|| s.strip_prefix('{').and_then(|s| s.strip_suffix('}')));
            if let Some(name) = param {
                (s.to_string(), SegmentKind::Param(name.to_string()))
            } else if let Some(name) = s.strip_prefix('*') {
                (s.to_string(), SegmentKind::Wildcard(name.to_string()))
            } else {
                (s.to_string(), SegmentKind::Static)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;

    #[test]
    fn test_parse_path_kinds() {
        let segments = parse_path("/farms/:id/products/{pid}/*rest");
        let kinds: Vec<SegmentKind> = segments.into_iter().map(|(_, k)| k).collect();
        assert_eq!(
            kinds,
            vec![
                SegmentKind::Static,
                SegmentKind::Param("id".to_string()),
                SegmentKind::Static,
                SegmentKind::Param("pid".to_string()),
                SegmentKind::Wildcard("rest".to_string()),
            ]
        );
    }

    #[test]
    fn test_failed_param_branch_releases_capture() {
        let mut root = Node::root();
        root.insert("/a/:x/b", MethodRouter::new().get("param"));
        root.insert("/a/*rest", MethodRouter::new().get("wild"));

        let (methods, params) = root.match_path("/a/1/c").unwrap();
        assert_eq!(methods.endpoint(&Method::GET), Some(&"wild"));
        assert_eq!(params.get("x"), None);
        assert_eq!(params.get("rest"), Some("1/c"));
    }

    #[test]
    fn test_root_route() {
        let mut root = Node::root();
        root.insert("/", MethodRouter::new().get("home"));

        let (methods, params) = root.match_path("/").unwrap();
        assert_eq!(methods.endpoint(&Method::GET), Some(&"home"));
        assert!(params.is_empty());
    }

    #[test]
    fn test_static_children_stay_sorted() {
        let mut root: Node<&str> = Node::root();
        root.insert("/products", MethodRouter::new().get("p"));
        root.insert("/farms", MethodRouter::new().get("f"));
        root.insert("/home", MethodRouter::new().get("h"));

        let names: Vec<&str> = root.static_children.iter().map(|c| c.segment.as_str()).collect();
        assert_eq!(names, ["farms", "home", "products"]);
    }

    #[test]
    #[should_panic(expected = "wildcard must be the last segment")]
    fn test_wildcard_must_be_last() {
        let mut root = Node::root();
        root.insert("/files/*path/more", MethodRouter::new().get("bad"));
    }
}
