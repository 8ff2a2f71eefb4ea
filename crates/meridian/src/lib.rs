//! # Meridian
//!
//! **REST conventions over a typed route registry**
//!
//! Meridian turns a resource name and a handful of handlers into a consistent
//! HTTP API:
//!
//! - **Conventions** – CRUD, relation and query recipes register routes with
//!   predictable paths, methods, status codes and endpoint identifiers
//! - **Validation** – request bodies and query strings are decoded against
//!   field schemas; every failing field is reported in one 422 response
//! - **Hypermedia** – paginated envelopes and `_links` are generated from the
//!   route table
//! - **Discovery and Swagger** – both are rebuilt from the registry on every
//!   request
//!
//! ## Quick Start
//!
//! ```
//! use meridian::prelude::*;
//! use meridian_test::TestClient;
//! use serde_json::json;
//!
//! let person = Schema::new("PersonSchema")
//!     .field(Field::uuid("id"))
//!     .field(Field::string("name").required())
//!     .shared();
//!
//! let mut app = Application::new(MeridianConfig::default());
//! configure_crud(
//!     &mut app,
//!     &Namespace::new("person"),
//!     Mappings::new().with(
//!         Operation::Create,
//!         (Handler::item(|record| Ok(Some(record))), person.clone(), person),
//!     ),
//! )
//! .unwrap();
//!
//! let client = TestClient::new(app);
//! client
//!     .post("/api/person")
//!     .json(&json!({"name": "Alice"}))
//!     .send()
//!     .assert_status(http::StatusCode::CREATED)
//!     .assert_json_field("name", &json!("Alice"));
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Request → match route → decode (422) → handler → encode → Response
//!               ↓                           ↓
//!          404 / 405                  None ⇒ 404
//! ```

#![doc(html_root_url = "https://docs.rs/meridian/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod app;
pub mod convention;
mod dispatch;
mod endpoint;
pub mod response;

pub use app::{Application, RouteEntry};
pub use convention::{
    configure_crud, configure_discovery, configure_query, configure_relation, configure_swagger,
    Convention, CrudConvention, Mappings, RelationConvention,
};
pub use endpoint::{DeleteFn, EndpointDefinition, Handler, ItemFn, SearchFn, SearchResult};

// Re-export core types
pub use meridian_core as core;

// Re-export router types
pub use meridian_router as router;

// Re-export schema types
pub use meridian_schema as schema;

// Re-export documentation types
pub use meridian_docs as docs;

// Re-export configuration types
pub use meridian_config as config;

// Re-export telemetry types
pub use meridian_telemetry as telemetry;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```
/// use meridian::prelude::*;
///
/// let app = Application::default();
/// assert_eq!(app.endpoints().count(), 0);
/// ```
pub mod prelude {
    pub use crate::{
        configure_crud, configure_discovery, configure_query, configure_relation,
        configure_swagger, Application, Convention, EndpointDefinition, Handler, Mappings,
        SearchResult,
    };
    pub use meridian_config::{ConfigLoader, MeridianConfig};
    pub use meridian_core::{
        Link, MeridianError, MeridianResult, Namespace, Operation, Page, Record, Service,
        UrlContext,
    };
    pub use meridian_router::Params;
    pub use meridian_schema::{EnumSpec, Field, FieldKind, Schema, SchemaRef};
}
