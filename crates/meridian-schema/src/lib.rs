//! # Meridian Schema
//!
//! Field-based record schemas. A [`Schema`] is an ordered list of
//! [`Field`]s; it decodes JSON bodies and query strings into records,
//! reporting every failing field at once, and encodes records back to JSON
//! using each field's wire name.
//!
//! ```
//! use meridian_schema::{EnumSpec, Field, Schema};
//! use serde_json::json;
//!
//! let schema = Schema::new("PetSchema")
//!     .field(Field::string("name").required())
//!     .field(Field::enumeration("kind", EnumSpec::new("Kind", [("Cat", 1), ("Dog", 2)]).by_value()));
//!
//! let pet = schema.decode(&json!({"name": "Rex", "kind": "2"}), false).unwrap();
//! assert_eq!(pet["kind"], "Dog");
//! ```
//!
//! The same field metadata drives the Swagger definitions built by
//! `meridian-docs`.

#![doc(html_root_url = "https://docs.rs/meridian-schema/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod decode;
mod encode;
mod field;
mod paging;
mod schema;
mod uri;

pub use field::{ComputeFn, EnumSpec, Field, FieldKind, SchemaRef};
pub use paging::{page_schema, page_schema_with_limit, paginated_list_schema};
pub use schema::Schema;
pub use uri::normalize_uri;
