//! Typed-template radix tree router for Meridian.
//!
//! Routes are registered as `(template, method, endpoint)` triples. The
//! endpoint identifier is the only key from a route back to its logical
//! operation, so the router supports reverse lookup as well as matching.
//!
//! # Features
//!
//! - **Typed placeholders**: `<uuid:person_id>`, `<int:index>`, `<name>`, `<path:rest>`
//! - **Radix tree matching** with static > typed parameter > catch-all priority
//! - **Reverse URLs** with a typed [`RouterError::MissingParameter`] result, and a
//!   templated variant that renders missing placeholders as `{name}`
//! - **Ordered iteration** over every registered route
//!
//! # Example
//!
//! ```rust
//! use meridian_router::{Params, Router};
//! use http::Method;
//!
//! let mut router = Router::new();
//! router.add("/api/person/<uuid:person_id>", Method::GET, "person.retrieve.v1").unwrap();
//!
//! let err = router.url_for("person.retrieve.v1", &Params::new()).unwrap_err();
//! assert!(err.is_missing_parameter());
//!
//! let templated = router.template_for("person.retrieve.v1", &Params::new()).unwrap();
//! assert_eq!(templated, "/api/person/{person_id}");
//! ```
//!
//! # Architecture
//!
//! ```text
//!                    (root)
//!                      │
//!                    "api"
//!                      │
//!                   "person"          [GET search, POST create]
//!                      │
//!              <uuid:person_id>       [GET retrieve, DELETE delete]
//!                      │
//!                  "address"          [GET search_for]
//! ```

mod error;
mod method_router;
mod node;
mod params;
mod router;
mod template;

pub use error::{RouterError, RouterResult};
pub use method_router::MethodRouter;
pub use node::{Node, SegmentKind};
pub use params::Params;
pub use router::{Route, Router};
pub use template::{Converter, PathTemplate, Segment};

/// A matched route with its endpoint identifier and converted parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'a> {
    /// The endpoint identifier for the matched route
    pub endpoint: &'a str,
    /// Converted path parameters
    pub params: Params,
}

impl<'a> RouteMatch<'a> {
    /// Creates a new route match.
    #[must_use]
    pub fn new(endpoint: &'a str, params: Params) -> Self {
        Self { endpoint, params }
    }
}
