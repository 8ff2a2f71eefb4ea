//! High-level router API.
//!
//! [`Router`] is the route registry: it matches requests through the radix
//! tree, and keeps every registration in order so endpoints can be reversed
//! into URLs and enumerated for discovery and documentation.

use std::collections::HashMap;

use http::Method;

use crate::error::{RouterError, RouterResult};
use crate::method_router::MethodRouter;
use crate::node::Node;
use crate::params::Params;
use crate::template::PathTemplate;
use crate::RouteMatch;

/// One registered route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// Globally unique endpoint identifier
    pub endpoint: String,
    /// The parsed path template
    pub template: PathTemplate,
    /// The bound HTTP method
    pub method: Method,
}

/// A typed-template radix tree router with reverse URL generation.
///
/// # Example
///
/// ```rust
/// use meridian_router::{Params, Router};
/// use http::Method;
///
/// let mut router = Router::new();
/// router.add("/api/person", Method::GET, "person.search.v1").unwrap();
/// router
///     .add("/api/person/<uuid:person_id>", Method::GET, "person.retrieve.v1")
///     .unwrap();
///
/// let id = "3d2f0e60-8e52-4c5e-a2fb-8d3c1f5f3f0a";
/// let found = router.match_route(&Method::GET, &format!("/api/person/{id}")).unwrap();
/// assert_eq!(found.endpoint, "person.retrieve.v1");
///
/// let url = router
///     .url_for("person.retrieve.v1", &Params::new().with("person_id", id))
///     .unwrap();
/// assert_eq!(url, format!("/api/person/{id}"));
/// ```
///
/// # Route Priority
///
/// 1. **Static segments** (e.g., `/person/me`)
/// 2. **Typed parameters** (e.g., `/person/<uuid:person_id>`)
/// 3. **Catch-all segments** (e.g., `/files/<path:rest>`)
#[derive(Debug, Clone)]
pub struct Router {
    root: Node,
    routes: Vec<Route>,
    by_endpoint: HashMap<String, usize>,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    /// Creates a new empty router.
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: Node::root(),
            routes: Vec::new(),
            by_endpoint: HashMap::new(),
        }
    }

    /// Registers a route.
    ///
    /// Fails if the template is malformed, the endpoint identifier is
    /// already taken, or the (path, method) pair is already bound.
    pub fn add(
        &mut self,
        template: &str,
        method: Method,
        endpoint: impl Into<String>,
    ) -> RouterResult<()> {
        let endpoint = endpoint.into();
        if self.by_endpoint.contains_key(&endpoint) {
            return Err(RouterError::DuplicateEndpoint { endpoint });
        }

        let template = PathTemplate::parse(template)?;
        self.root.insert(&template, &method, &endpoint)?;

        self.by_endpoint.insert(endpoint.clone(), self.routes.len());
        self.routes.push(Route {
            endpoint,
            template,
            method,
        });
        Ok(())
    }

    /// Matches a path and method against the router.
    #[must_use]
    pub fn match_route(&self, method: &Method, path: &str) -> Option<RouteMatch<'_>> {
        let (methods, params) = self.root.match_path(path)?;
        let endpoint = methods.get_endpoint(method)?;
        Some(RouteMatch::new(endpoint, params))
    }

    /// Matches a path regardless of method.
    ///
    /// Useful for telling "no such path" (404) from "wrong method" (405).
    #[must_use]
    pub fn match_path(&self, path: &str) -> Option<(&MethodRouter, Params)> {
        self.root.match_path(path)
    }

    /// Looks up a route by endpoint identifier.
    #[must_use]
    pub fn route(&self, endpoint: &str) -> Option<&Route> {
        self.by_endpoint.get(endpoint).map(|&i| &self.routes[i])
    }

    /// Builds the path for `endpoint`, requiring every placeholder.
    pub fn url_for(&self, endpoint: &str, params: &Params) -> RouterResult<String> {
        let route = self.lookup(endpoint)?;
        route
            .template
            .expand(params)
            .map_err(|parameter| RouterError::MissingParameter {
                endpoint: endpoint.to_string(),
                parameter,
            })
    }

    /// Builds the path for `endpoint`, rendering missing placeholders as
    /// `{name}`.
    pub fn template_for(&self, endpoint: &str, params: &Params) -> RouterResult<String> {
        let route = self.lookup(endpoint)?;
        Ok(route.template.expand_templated(params))
    }

    fn lookup(&self, endpoint: &str) -> RouterResult<&Route> {
        self.route(endpoint)
            .ok_or_else(|| RouterError::UnknownEndpoint {
                endpoint: endpoint.to_string(),
            })
    }

    /// Iterates over registered routes in registration order.
    pub fn iter_routes(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }

    /// Returns the number of routes registered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns true if no routes are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: &str = "3d2f0e60-8e52-4c5e-a2fb-8d3c1f5f3f0a";

    fn crud_router() -> Router {
        let mut router = Router::new();
        router.add("/api/person", Method::GET, "person.search.v1").unwrap();
        router.add("/api/person", Method::POST, "person.create.v1").unwrap();
        router
            .add("/api/person/<uuid:person_id>", Method::GET, "person.retrieve.v1")
            .unwrap();
        router
            .add("/api/person/<uuid:person_id>", Method::DELETE, "person.delete.v1")
            .unwrap();
        router
            .add(
                "/api/person/<uuid:person_id>/address",
                Method::GET,
                "person.search_for.address.v1",
            )
            .unwrap();
        router
    }

    #[test]
    fn test_router_new() {
        let router = Router::new();
        assert!(router.is_empty());
        assert_eq!(router.len(), 0);
    }

    #[test]
    fn test_router_match_static() {
        let router = crud_router();
        let found = router.match_route(&Method::GET, "/api/person").unwrap();
        assert_eq!(found.endpoint, "person.search.v1");
        assert!(found.params.is_empty());

        let found = router.match_route(&Method::POST, "/api/person").unwrap();
        assert_eq!(found.endpoint, "person.create.v1");
    }

    #[test]
    fn test_router_match_param() {
        let router = crud_router();
        let found = router
            .match_route(&Method::GET, &format!("/api/person/{ID}/address"))
            .unwrap();
        assert_eq!(found.endpoint, "person.search_for.address.v1");
        assert_eq!(found.params.get("person_id"), Some(ID));
    }

    #[test]
    fn test_router_method_not_allowed() {
        let router = crud_router();
        assert!(router.match_route(&Method::PUT, "/api/person").is_none());

        let (methods, _) = router.match_path("/api/person").unwrap();
        assert_eq!(methods.allowed_methods(), vec![Method::GET, Method::POST]);
    }

    #[test]
    fn test_router_trailing_slash() {
        let router = crud_router();
        let found = router.match_route(&Method::GET, "/api/person/").unwrap();
        assert_eq!(found.endpoint, "person.search.v1");
    }

    #[test]
    fn test_router_rejects_duplicate_endpoint() {
        let mut router = crud_router();
        let err = router
            .add("/api/other", Method::GET, "person.search.v1")
            .unwrap_err();
        assert!(matches!(err, RouterError::DuplicateEndpoint { .. }));
        assert_eq!(router.len(), 5);
    }

    #[test]
    fn test_router_rejects_duplicate_route() {
        let mut router = crud_router();
        let err = router
            .add("/api/person", Method::GET, "people.search.v1")
            .unwrap_err();
        assert!(matches!(err, RouterError::DuplicateRoute { .. }));
    }

    #[test]
    fn test_url_for() {
        let router = crud_router();
        assert_eq!(
            router.url_for("person.search.v1", &Params::new()).unwrap(),
            "/api/person"
        );
        assert_eq!(
            router
                .url_for("person.retrieve.v1", &Params::new().with("person_id", ID))
                .unwrap(),
            format!("/api/person/{ID}")
        );
    }

    #[test]
    fn test_url_for_missing_parameter() {
        let router = crud_router();
        let err = router
            .url_for("person.retrieve.v1", &Params::new())
            .unwrap_err();
        assert_eq!(
            err,
            RouterError::MissingParameter {
                endpoint: "person.retrieve.v1".to_string(),
                parameter: "person_id".to_string(),
            }
        );
    }

    #[test]
    fn test_url_for_unknown_endpoint() {
        let router = crud_router();
        let err = router.url_for("nope.search.v1", &Params::new()).unwrap_err();
        assert!(matches!(err, RouterError::UnknownEndpoint { .. }));
    }

    #[test]
    fn test_template_for() {
        let router = crud_router();
        assert_eq!(
            router
                .template_for("person.retrieve.v1", &Params::new())
                .unwrap(),
            "/api/person/{person_id}"
        );
    }

    #[test]
    fn test_iter_routes_in_registration_order() {
        let router = crud_router();
        let endpoints: Vec<_> = router.iter_routes().map(|r| r.endpoint.as_str()).collect();
        assert_eq!(
            endpoints,
            vec![
                "person.search.v1",
                "person.create.v1",
                "person.retrieve.v1",
                "person.delete.v1",
                "person.search_for.address.v1",
            ]
        );
    }

    #[test]
    fn test_router_empty_path() {
        let mut router = Router::new();
        router.add("/", Method::GET, "all.discover.v1").unwrap();

        let found = router.match_route(&Method::GET, "/").unwrap();
        assert_eq!(found.endpoint, "all.discover.v1");
        assert_eq!(router.url_for("all.discover.v1", &Params::new()).unwrap(), "/");
    }
}
