//! # Meridian Core
//!
//! The naming, routing-identity and hypermedia model shared by every
//! Meridian crate:
//!
//! - [`naming`] - resource names and path fragments
//! - [`Operation`] - the closed set of REST operation kinds
//! - [`Namespace`] - where operations are mounted, and their endpoint identifiers
//! - [`Link`] / [`Links`] - hypermedia links resolved through the route table
//! - [`Page`] / [`PaginatedList`] - offset/limit paging
//! - [`MeridianError`] - the error taxonomy and its JSON envelope

#![doc(html_root_url = "https://docs.rs/meridian-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod context;
mod error;
mod link;
mod namespace;
pub mod naming;
mod operation;
mod paging;
mod service;

pub use context::{RequestId, RequestMetadata};
pub use error::{ErrorCategory, ErrorContext, ErrorEnvelope, MeridianError, MeridianResult, SubError};
pub use link::{Link, LinkTarget, LinkValue, Links, UrlContext};
pub use namespace::{Namespace, DEFAULT_VERSION};
pub use naming::{Resource, ResourceName};
pub use operation::{EndpointPattern, Operation};
pub use paging::{Page, PaginatedList, DEFAULT_LIMIT};
pub use service::Service;

/// A decoded record, keyed by attribute name.
pub type Record = serde_json::Map<String, serde_json::Value>;
