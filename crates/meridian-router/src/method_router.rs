//! HTTP method-based routing.
//!
//! [`MethodRouter`] maps the HTTP methods used by REST operations to
//! endpoint identifiers for a single path.

use http::Method;

use crate::error::{RouterError, RouterResult};

/// Maps HTTP methods to endpoint identifiers for a single path.
///
/// # Example
///
/// ```rust
/// use meridian_router::MethodRouter;
/// use http::Method;
///
/// let router = MethodRouter::new()
///     .get("person.search.v1")
///     .post("person.create.v1");
///
/// assert_eq!(router.get_endpoint(&Method::GET), Some("person.search.v1"));
/// assert_eq!(router.get_endpoint(&Method::DELETE), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MethodRouter {
    get: Option<String>,
    post: Option<String>,
    put: Option<String>,
    patch: Option<String>,
    delete: Option<String>,
}

impl MethodRouter {
    /// Creates a new empty method router.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a GET endpoint.
    #[must_use]
    pub fn get(mut self, endpoint: impl Into<String>) -> Self {
        self.get = Some(endpoint.into());
        self
    }

    /// Registers a POST endpoint.
    #[must_use]
    pub fn post(mut self, endpoint: impl Into<String>) -> Self {
        self.post = Some(endpoint.into());
        self
    }

    /// Registers a PUT endpoint.
    #[must_use]
    pub fn put(mut self, endpoint: impl Into<String>) -> Self {
        self.put = Some(endpoint.into());
        self
    }

    /// Registers a PATCH endpoint.
    #[must_use]
    pub fn patch(mut self, endpoint: impl Into<String>) -> Self {
        self.patch = Some(endpoint.into());
        self
    }

    /// Registers a DELETE endpoint.
    #[must_use]
    pub fn delete(mut self, endpoint: impl Into<String>) -> Self {
        self.delete = Some(endpoint.into());
        self
    }

    fn slot_mut(&mut self, method: &Method) -> RouterResult<&mut Option<String>> {
        match *method {
            Method::GET => Ok(&mut self.get),
            Method::POST => Ok(&mut self.post),
            Method::PUT => Ok(&mut self.put),
            Method::PATCH => Ok(&mut self.patch),
            Method::DELETE => Ok(&mut self.delete),
            _ => Err(RouterError::UnsupportedMethod {
                method: method.to_string(),
            }),
        }
    }

    /// Binds `endpoint` to `method`, failing if the method is already bound.
    pub fn bind(
        &mut self,
        method: &Method,
        endpoint: impl Into<String>,
        template: &str,
    ) -> RouterResult<()> {
        let slot = self.slot_mut(method)?;
        if slot.is_some() {
            return Err(RouterError::DuplicateRoute {
                method: method.to_string(),
                template: template.to_string(),
            });
        }
        *slot = Some(endpoint.into());
        Ok(())
    }

    /// Returns the endpoint identifier for a given HTTP method.
    #[must_use]
    pub fn get_endpoint(&self, method: &Method) -> Option<&str> {
        match *method {
            Method::GET => self.get.as_deref(),
            Method::POST => self.post.as_deref(),
            Method::PUT => self.put.as_deref(),
            Method::PATCH => self.patch.as_deref(),
            Method::DELETE => self.delete.as_deref(),
            _ => None,
        }
    }

    /// Returns true if any methods are registered.
    #[must_use]
    pub fn has_any_method(&self) -> bool {
        !self.allowed_methods().is_empty()
    }

    /// Returns the methods bound on this path.
    #[must_use]
    pub fn allowed_methods(&self) -> Vec<Method> {
        [
            (Method::GET, &self.get),
            (Method::POST, &self.post),
            (Method::PUT, &self.put),
            (Method::PATCH, &self.patch),
            (Method::DELETE, &self.delete),
        ]
        .into_iter()
        .filter(|(_, slot)| slot.is_some())
        .map(|(method, _)| method)
        .collect()
    }
}
