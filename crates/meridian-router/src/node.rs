//! Radix tree node implementation.
//!
//! Each node owns one path segment. Static children are kept sorted for
//! binary search; a node has at most one typed-parameter child and at most
//! one `path` (catch-all) child.

use std::borrow::Cow;

use http::Method;

use crate::error::{RouterError, RouterResult};
use crate::method_router::MethodRouter;
use crate::params::Params;
use crate::template::{Converter, PathTemplate, Segment};

/// Type of path segment in the radix tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentKind {
    /// Static path segment (e.g., "api", "person")
    Static,
    /// Typed placeholder (e.g., `<uuid:person_id>`)
    Param {
        /// Parameter name
        name: String,
        /// Converter applied to the raw segment
        converter: Converter,
    },
    /// Catch-all placeholder (`<path:name>`)
    Wildcard(String),
}

/// A node in the radix tree.
#[derive(Debug, Clone)]
pub struct Node {
    /// The path segment this node represents
    pub segment: String,

    /// The kind of segment
    pub kind: SegmentKind,

    /// Endpoints bound at this node, if it terminates a route
    pub methods: Option<MethodRouter>,

    /// Static children, sorted by segment for binary search
    pub static_children: Vec<Node>,

    /// Parameter child (at most one per node)
    pub param_child: Option<Box<Node>>,

    /// Catch-all child (at most one per node, always a leaf)
    pub wildcard_child: Option<Box<Node>>,
}

impl Node {
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

    fn from_segment(segment: &Segment) -> Self {
        match segment {
            Segment::Static(text) => Self::with_kind(text.clone(), SegmentKind::Static),
            Segment::Param {
                name,
                converter: Converter::Path,
            } => Self::with_kind(
                format!("<path:{name}>"),
                SegmentKind::Wildcard(name.clone()),
            ),
            Segment::Param { name, converter } => Self::with_kind(
                format!("<{}:{name}>", converter.name()),
                SegmentKind::Param {
                    name: name.clone(),
                    converter: *converter,
                },
            ),
        }
    }

    /// Inserts one (template, method, endpoint) binding.
    pub fn insert(
        &mut self,
        template: &PathTemplate,
        method: &Method,
        endpoint: &str,
    ) -> RouterResult<()> {
        self.insert_segments(template, template.segments(), method, endpoint)
    }

    fn insert_segments(
        &mut self,
        template: &PathTemplate,
        segments: &[Segment],
        method: &Method,
        endpoint: &str,
    ) -> RouterResult<()> {
        let Some((segment, remaining)) = segments.split_first() else {
            return self
                .methods
                .get_or_insert_with(MethodRouter::new)
                .bind(method, endpoint, template.as_str());
        };

        let candidate = Self::from_segment(segment);
        let child = match candidate.kind {
            SegmentKind::Static => {
                let index = match self
                    .static_children
                    .binary_search_by(|c| c.segment.cmp(&candidate.segment))
                {
                    Ok(index) => index,
                    Err(index) => {
                        self.static_children.insert(index, candidate);
                        index
                    }
                };
                &mut self.static_children[index]
            }
            SegmentKind::Param { .. } => {
                Self::reuse_or_insert(&mut self.param_child, candidate, template)?
            }
            SegmentKind::Wildcard(_) => {
                Self::reuse_or_insert(&mut self.wildcard_child, candidate, template)?
            }
        };
        child.insert_segments(template, remaining, method, endpoint)
    }

    fn reuse_or_insert<'a>(
        slot: &'a mut Option<Box<Node>>,
        candidate: Node,
        template: &PathTemplate,
    ) -> RouterResult<&'a mut Node> {
        if let Some(existing) = slot.as_deref() {
            if existing.kind != candidate.kind {
                return Err(RouterError::invalid_template(
                    template.as_str(),
                    format!(
                        "placeholder {} conflicts with {} registered at the same position",
                        candidate.segment, existing.segment
                    ),
                ));
            }
        }
        let node: &mut Node = slot.get_or_insert_with(|| Box::new(candidate));
        Ok(node)
    }

    /// Matches a request path against the tree.
    ///
    /// Returns the method router and converted parameters if found.
    #[must_use]
    pub fn match_path(&self, path: &str) -> Option<(&MethodRouter, Params)> {
        let segments: Vec<Cow<'_, str>> = path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| urlencoding::decode(s).unwrap_or(Cow::Borrowed(s)))
            .collect();
        let segments: Vec<&str> = segments.iter().map(AsRef::as_ref).collect();
        let mut params = Params::new();
        let methods = self.match_segments(&segments, &mut params)?;
        Some((methods, params))
    }

    fn match_segments<'a>(
        &'a self,
        segments: &[&str],
        params: &mut Params,
    ) -> Option<&'a MethodRouter> {
        let Some((segment, remaining)) = segments.split_first() else {
            return self.methods.as_ref();
        };

        if let Some(child) = self.find_static_child(segment) {
            if let Some(found) = child.match_segments(remaining, params) {
                return Some(found);
            }
        }

        if let Some(child) = &self.param_child {
            if let SegmentKind::Param { name, converter } = &child.kind {
                if let Some(value) = converter.convert(segment) {
                    let mark = params.len();
                    params.push(name.clone(), value);
                    if let Some(found) = child.match_segments(remaining, params) {
                        return Some(found);
                    }
                    params.truncate(mark);
                }
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

    fn find_static_child(&self, segment: &str) -> Option<&Node> {
        self.static_children
            .binary_search_by(|c| c.segment.as_str().cmp(segment))
            .ok()
            .map(|i| &self.static_children[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: &str = "3d2f0e60-8e52-4c5e-a2fb-8d3c1f5f3f0a";

    fn insert(root: &mut Node, template: &str, method: &Method, endpoint: &str) {
        let template = PathTemplate::parse(template).unwrap();
        root.insert(&template, method, endpoint).unwrap();
    }

    #[test]
    fn test_insert_and_match_static() {
        let mut root = Node::root();
        insert(&mut root, "/person", &Method::GET, "person.search.v1");

        let (methods, params) = root.match_path("/person").unwrap();
        assert_eq!(methods.get_endpoint(&Method::GET), Some("person.search.v1"));
        assert!(params.is_empty());
    }

    #[test]
    fn test_insert_and_match_uuid_param() {
        let mut root = Node::root();
        insert(&mut root, "/person/<uuid:person_id>", &Method::GET, "person.retrieve.v1");

        let (methods, params) = root.match_path(&format!("/person/{ID}")).unwrap();
        assert_eq!(methods.get_endpoint(&Method::GET), Some("person.retrieve.v1"));
        assert_eq!(params.get("person_id"), Some(ID));

        assert!(root.match_path("/person/not-a-uuid").is_none());
    }

    #[test]
    fn test_insert_and_match_wildcard() {
        let mut root = Node::root();
        insert(&mut root, "/files/<path:rest>", &Method::GET, "files.retrieve.v1");

        let (_, params) = root.match_path("/files/images/logo.png").unwrap();
        assert_eq!(params.get("rest"), Some("images/logo.png"));
    }

    #[test]
    fn test_static_priority_over_param() {
        let mut root = Node::root();
        insert(&mut root, "/person/me", &Method::GET, "me.query.v1");
        insert(&mut root, "/person/<person_id>", &Method::GET, "person.retrieve.v1");

        let (methods, params) = root.match_path("/person/me").unwrap();
        assert_eq!(methods.get_endpoint(&Method::GET), Some("me.query.v1"));
        assert!(params.is_empty());

        let (methods, params) = root.match_path("/person/123").unwrap();
        assert_eq!(methods.get_endpoint(&Method::GET), Some("person.retrieve.v1"));
        assert_eq!(params.get("person_id"), Some("123"));
    }

    #[test]
    fn test_failed_param_branch_does_not_leak() {
        let mut root = Node::root();
        insert(&mut root, "/a/<x>/b", &Method::GET, "a.retrieve.v1");
        insert(&mut root, "/a/<path:rest>", &Method::GET, "a.query.v1");

        let (methods, params) = root.match_path("/a/1/c").unwrap();
        assert_eq!(methods.get_endpoint(&Method::GET), Some("a.query.v1"));
        assert_eq!(params.get("x"), None);
        assert_eq!(params.get("rest"), Some("1/c"));
    }

    #[test]
    fn test_conflicting_placeholders_rejected() {
        let mut root = Node::root();
        insert(&mut root, "/person/<uuid:person_id>", &Method::GET, "person.retrieve.v1");
        let template = PathTemplate::parse("/person/<int:index>").unwrap();
        assert!(root.insert(&template, &Method::PUT, "person.replace.v1").is_err());
    }

    #[test]
    fn test_percent_decoded_segments() {
        let mut root = Node::root();
        insert(&mut root, "/tag/<name>", &Method::GET, "tag.retrieve.v1");

        let (_, params) = root.match_path("/tag/a%20b").unwrap();
        assert_eq!(params.get("name"), Some("a b"));
    }
}
