//! Hypermedia links.
//!
//! Links are resolved against the route table through a [`UrlContext`].
//! Resolution is two-phase: a strict reverse lookup first, and only when
//! that reports a missing path parameter and templates are allowed, a second
//! lookup that renders the missing placeholders as `{name}`.

use indexmap::IndexMap;
use meridian_router::{Params, Router, RouterError};
use serde::{Deserialize, Serialize};

use crate::error::{MeridianError, MeridianResult};
use crate::namespace::Namespace;
use crate::operation::Operation;

/// Everything needed to turn an endpoint into an external URL.
#[derive(Debug, Clone, Copy)]
pub struct UrlContext<'a> {
    router: &'a Router,
    url_root: &'a str,
}

impl<'a> UrlContext<'a> {
    /// Creates a URL context; `url_root` is scheme and authority, e.g.
    /// `http://localhost`.
    #[must_use]
    pub fn new(router: &'a Router, url_root: &'a str) -> Self {
        Self { router, url_root }
    }

    /// The route table.
    #[must_use]
    pub fn router(&self) -> &'a Router {
        self.router
    }

    /// The external URL root.
    #[must_use]
    pub fn url_root(&self) -> &'a str {
        self.url_root
    }

    /// Joins the root, a path and an ordered query string.
    pub fn external(&self, path: &str, qs: &[(String, String)]) -> MeridianResult<String> {
        let root = self.url_root.trim_end_matches('/');
        if qs.is_empty() {
            return Ok(format!("{root}{path}"));
        }
        let query = serde_urlencoded::to_string(qs)
            .map_err(|e| MeridianError::internal_with_source("could not encode query string", e))?;
        Ok(format!("{root}{path}?{query}"))
    }
}

impl Operation {
    /// The path of this operation in `ns`, via the route table.
    pub fn url_for(self, urls: &UrlContext<'_>, ns: &Namespace, params: &Params) -> MeridianResult<String> {
        Ok(urls.router().url_for(&ns.endpoint_for(self), params)?)
    }

    /// The external URL of this operation in `ns`.
    pub fn href_for(
        self,
        urls: &UrlContext<'_>,
        ns: &Namespace,
        params: &Params,
        qs: &[(String, String)],
    ) -> MeridianResult<String> {
        urls.external(&self.url_for(urls, ns, params)?, qs)
    }
}

/// A hypermedia link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Target URL
    pub href: String,
    /// Optional type hint
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub link_type: Option<String>,
    /// True when `href` contains `{param}` placeholders
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub templated: bool,
}

impl Link {
    /// A plain link.
    #[must_use]
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            link_type: None,
            templated: false,
        }
    }

    /// Starts building a link to `operation` in `ns`.
    ///
    /// ```
    /// use http::Method;
    /// use meridian_core::{Link, Namespace, Operation, UrlContext};
    /// use meridian_router::Router;
    ///
    /// let mut router = Router::new();
    /// router.add("/api/foo/<uuid:foo_id>", Method::GET, "foo.retrieve.v1").unwrap();
    /// let urls = UrlContext::new(&router, "http://localhost");
    ///
    /// let link = Link::to(Operation::Retrieve, &Namespace::new("foo"))
    ///     .allow_templates()
    ///     .resolve(&urls)
    ///     .unwrap();
    /// assert_eq!(link.href, "http://localhost/api/foo/{foo_id}");
    /// assert!(link.templated);
    /// ```
    #[must_use]
    pub fn to(operation: Operation, ns: &Namespace) -> LinkTarget {
        LinkTarget {
            operation,
            namespace: ns.clone(),
            params: Params::new(),
            qs: Vec::new(),
            link_type: None,
            allow_templates: false,
        }
    }
}

/// A link that has not been resolved yet.
#[derive(Debug, Clone)]
pub struct LinkTarget {
    operation: Operation,
    namespace: Namespace,
    params: Params,
    qs: Vec<(String, String)>,
    link_type: Option<String>,
    allow_templates: bool,
}

impl LinkTarget {
    /// Supplies one path parameter.
    #[must_use]
    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push(name, value);
        self
    }

    /// Supplies several path parameters.
    #[must_use]
    pub fn params<'p>(mut self, params: impl IntoIterator<Item = (&'p str, &'p str)>) -> Self {
        for (name, value) in params {
            self.params.push(name, value);
        }
        self
    }

    /// Sets the ordered query string.
    #[must_use]
    pub fn qs(mut self, qs: Vec<(String, String)>) -> Self {
        self.qs = qs;
        self
    }

    /// Sets the link type.
    #[must_use]
    pub fn link_type(mut self, link_type: impl Into<String>) -> Self {
        self.link_type = Some(link_type.into());
        self
    }

    /// Allows a templated link when path parameters are missing.
    #[must_use]
    pub fn allow_templates(mut self) -> Self {
        self.allow_templates = true;
        self
    }

    /// Resolves the link against the route table.
    pub fn resolve(&self, urls: &UrlContext<'_>) -> MeridianResult<Link> {
        let endpoint = self.namespace.endpoint_for(self.operation);
        let (path, templated) = match urls.router().url_for(&endpoint, &self.params) {
            Ok(path) => (path, false),
            Err(RouterError::MissingParameter { parameter, .. }) if self.allow_templates => {
                tracing::trace!(endpoint = %endpoint, parameter = %parameter, "rendering templated link");
                (urls.router().template_for(&endpoint, &self.params)?, true)
            }
            Err(err) => return Err(err.into()),
        };
        Ok(Link {
            href: urls.external(&path, &self.qs)?,
            link_type: self.link_type.clone(),
            templated,
        })
    }
}

/// A link relation value: one link or an ordered list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LinkValue {
    /// A single link
    One(Link),
    /// Several links
    Many(Vec<Link>),
}

/// Ordered mapping from relation name to links.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Links(IndexMap<String, LinkValue>);

impl Links {
    /// Creates an empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a single link.
    pub fn insert(&mut self, rel: impl Into<String>, link: Link) {
        self.0.insert(rel.into(), LinkValue::One(link));
    }

    /// Sets a list of links.
    pub fn insert_many(&mut self, rel: impl Into<String>, links: Vec<Link>) {
        self.0.insert(rel.into(), LinkValue::Many(links));
    }

    /// Looks up a relation.
    #[must_use]
    pub fn get(&self, rel: &str) -> Option<&LinkValue> {
        self.0.get(rel)
    }

    /// Returns true if there are no relations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Serializes to `{rel: link | [link, ...]}`.
    #[must_use]
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;
    use serde_json::json;

    const ID: &str = "3d2f0e60-8e52-4c5e-a2fb-8d3c1f5f3f0a";

    fn router() -> Router {
        let mut router = Router::new();
        router.add("/api/foo", Method::GET, "foo.search.v1").unwrap();
        router
            .add("/api/foo/<uuid:foo_id>", Method::GET, "foo.retrieve.v1")
            .unwrap();
        router
    }

    #[test]
    fn test_link_to_dict_omits_absent_fields() {
        let link = Link::new("http://localhost/api/foo");
        assert_eq!(serde_json::to_value(&link).unwrap(), json!({"href": "http://localhost/api/foo"}));

        let link = Link {
            link_type: Some("foo".to_string()),
            templated: true,
            ..link
        };
        assert_eq!(
            serde_json::to_value(&link).unwrap(),
            json!({"href": "http://localhost/api/foo", "type": "foo", "templated": true})
        );
    }

    #[test]
    fn test_link_for_operation() {
        let router = router();
        let urls = UrlContext::new(&router, "http://localhost");
        let link = Link::to(Operation::Retrieve, &Namespace::new("foo"))
            .param("foo_id", ID)
            .resolve(&urls)
            .unwrap();
        assert_eq!(link.href, format!("http://localhost/api/foo/{ID}"));
        assert!(!link.templated);
    }

    #[test]
    fn test_link_with_query_string_keeps_order() {
        let router = router();
        let urls = UrlContext::new(&router, "http://localhost");
        let link = Link::to(Operation::Search, &Namespace::new("foo"))
            .qs(vec![
                ("offset".to_string(), "0".to_string()),
                ("limit".to_string(), "20".to_string()),
            ])
            .link_type("foo")
            .resolve(&urls)
            .unwrap();
        assert_eq!(link.href, "http://localhost/api/foo?offset=0&limit=20");
        assert_eq!(link.link_type.as_deref(), Some("foo"));
    }

    #[test]
    fn test_templated_fallback() {
        let router = router();
        let urls = UrlContext::new(&router, "http://localhost");
        let link = Link::to(Operation::Retrieve, &Namespace::new("foo"))
            .allow_templates()
            .resolve(&urls)
            .unwrap();
        assert_eq!(link.href, "http://localhost/api/foo/{foo_id}");
        assert!(link.templated);
    }

    #[test]
    fn test_missing_parameter_propagates_without_templates() {
        let router = router();
        let urls = UrlContext::new(&router, "http://localhost");
        let err = Link::to(Operation::Retrieve, &Namespace::new("foo"))
            .resolve(&urls)
            .unwrap_err();
        assert!(matches!(
            err,
            MeridianError::Router(RouterError::MissingParameter { .. })
        ));
    }

    #[test]
    fn test_href_for() {
        let router = router();
        let urls = UrlContext::new(&router, "http://localhost/");
        let href = Operation::Search
            .href_for(&urls, &Namespace::new("foo"), &Params::new(), &[])
            .unwrap();
        assert_eq!(href, "http://localhost/api/foo");
    }

    #[test]
    fn test_links_serialization() {
        let mut links = Links::new();
        links.insert("self", Link::new("http://localhost/api/"));
        links.insert_many(
            "search",
            vec![Link {
                link_type: Some("foo".to_string()),
                ..Link::new("http://localhost/api/foo")
            }],
        );
        assert_eq!(
            links.to_value(),
            json!({
                "self": {"href": "http://localhost/api/"},
                "search": [{"href": "http://localhost/api/foo", "type": "foo"}],
            })
        );
        assert!(matches!(links.get("search"), Some(LinkValue::Many(v)) if v.len() == 1));
    }
}
