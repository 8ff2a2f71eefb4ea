//! # Meridian Docs
//!
//! Swagger 2.0 generation for Meridian applications.
//!
//! This crate provides:
//! - **Schema introspection**: [`build_parameter`] and [`build_schema`] turn
//!   field metadata into Swagger descriptors
//! - **Definitions**: nested schemas are hoisted into a flat [`Definitions`]
//!   table keyed by type name, with cycle protection and collision detection
//! - **Document assembly**: [`SwaggerBuilder`] groups operations by path and
//!   method and derives parameters and responses
//!
//! ## Quick Start
//!
//! ```
//! use meridian_core::{Namespace, Operation};
//! use meridian_docs::{DocumentedOperation, SwaggerBuilder};
//! use meridian_schema::{Field, Schema};
//!
//! let new_person = Schema::new("NewPersonSchema")
//!     .field(Field::string("first_name").wire_name("firstName").required())
//!     .shared();
//!
//! let create = DocumentedOperation::new(
//!     Operation::Create,
//!     Namespace::new("person").with_version("v1"),
//!     "/api/v1/person",
//! )
//! .request_schema(new_person);
//!
//! let doc = SwaggerBuilder::new("example")
//!     .version("v1")
//!     .base_path("/api/v1")
//!     .build(&[create])
//!     .unwrap();
//!
//! assert!(doc.definitions.contains_key("NewPerson"));
//! assert!(doc.definitions.contains_key("Error"));
//! ```

#![doc(html_root_url = "https://docs.rs/meridian-docs/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod builder;
mod error;
mod introspect;
mod swagger;

pub use builder::{default_description, swagger_path, DocumentedOperation, SwaggerBuilder};
pub use error::{DocsError, DocsResult};
pub use introspect::{build_parameter, build_schema, Definitions};
pub use swagger::{
    Info, OperationObject, Parameter, ParameterIn, PathItem, Response, SchemaObject, SchemaType,
    SwaggerDocument, JSON_MEDIA_TYPE,
};
