//! Handlers and endpoint definitions.
//!
//! A convention maps each operation to an [`EndpointDefinition`]: an
//! optional handler, optional request and response schemas and an optional
//! description for the generated documentation.
//!
//! Handlers are synchronous and type-erased. Every handler receives a single
//! [`Record`] holding the path parameters followed by the decoded query or
//! body fields.
//!
//! # Example
//!
//! ```
//! use meridian::{EndpointDefinition, Handler};
//! use meridian_schema::{Field, Schema};
//!
//! let person = Schema::new("PersonSchema").field(Field::uuid("id")).shared();
//!
//! let retrieve: EndpointDefinition = (
//!     Handler::item(|record| Ok(Some(record))),
//!     person,
//! )
//!     .into();
//! assert!(retrieve.handler().is_some());
//! assert!(retrieve.request_schema().is_none());
//! ```

use std::fmt;
use std::sync::Arc;

use meridian_core::{MeridianResult, Record};
use meridian_router::Params;
use meridian_schema::Schema;

/// A handler producing at most one item.
pub type ItemFn = dyn Fn(Record) -> MeridianResult<Option<Record>> + Send + Sync;

/// A handler producing one page of items.
pub type SearchFn = dyn Fn(Record) -> MeridianResult<SearchResult> + Send + Sync;

/// A handler reporting whether something was deleted.
pub type DeleteFn = dyn Fn(Record) -> MeridianResult<bool> + Send + Sync;

/// A type-erased request handler.
#[derive(Clone)]
pub enum Handler {
    /// Create, update, replace, retrieve and their relation forms.
    Item(Arc<ItemFn>),
    /// Search and search-for.
    Search(Arc<SearchFn>),
    /// Delete and delete-for.
    Delete(Arc<DeleteFn>),
}

impl Handler {
    /// Wraps an item handler. `Ok(None)` means "no such item".
    pub fn item<F>(handler: F) -> Self
    where
        F: Fn(Record) -> MeridianResult<Option<Record>> + Send + Sync + 'static,
    {
        Self::Item(Arc::new(handler))
    }

    /// Wraps a search handler.
    pub fn search<F>(handler: F) -> Self
    where
        F: Fn(Record) -> MeridianResult<SearchResult> + Send + Sync + 'static,
    {
        Self::Search(Arc::new(handler))
    }

    /// Wraps a delete handler. `Ok(false)` means "no such item".
    pub fn delete<F>(handler: F) -> Self
    where
        F: Fn(Record) -> MeridianResult<bool> + Send + Sync + 'static,
    {
        Self::Delete(Arc::new(handler))
    }

    /// `"item"`, `"search"` or `"delete"`.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Item(_) => "item",
            Self::Search(_) => "search",
            Self::Delete(_) => "delete",
        }
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handler::{}", self.kind())
    }
}

/// What a search handler returns.
///
/// `context` carries the path parameters needed to link back to a nested
/// collection, e.g. the parent id of a relation search. Relation searches
/// must supply it.
#[derive(Debug, Clone, Default)]
pub struct SearchResult {
    /// The items on this page, before serialisation.
    pub items: Vec<Record>,
    /// The total number of matching items.
    pub count: u64,
    /// Path parameters for pagination links.
    pub context: Option<Params>,
}

impl SearchResult {
    /// A page of `items` out of `count`.
    #[must_use]
    pub fn new(items: Vec<Record>, count: u64) -> Self {
        Self {
            items,
            count,
            context: None,
        }
    }

    /// Sets the link context.
    #[must_use]
    pub fn with_context(mut self, context: Params) -> Self {
        self.context = Some(context);
        self
    }

    /// Adds one link context parameter.
    #[must_use]
    pub fn context(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.get_or_insert_with(Params::new).push(name, value);
        self
    }
}

/// How one operation is served: handler, schemas and description.
#[derive(Debug, Clone, Default)]
pub struct EndpointDefinition {
    handler: Option<Handler>,
    request_schema: Option<Arc<Schema>>,
    response_schema: Option<Arc<Schema>>,
    description: Option<String>,
}

impl EndpointDefinition {
    /// An empty definition. Registering it fails; it exists so mappings can
    /// be filled in incrementally.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the handler.
    #[must_use]
    pub fn with_handler(mut self, handler: Handler) -> Self {
        self.handler = Some(handler);
        self
    }

    /// Sets the request schema (body or query string, depending on the
    /// operation).
    #[must_use]
    pub fn with_request(mut self, schema: Arc<Schema>) -> Self {
        self.request_schema = Some(schema);
        self
    }

    /// Sets the response schema.
    #[must_use]
    pub fn with_response(mut self, schema: Arc<Schema>) -> Self {
        self.response_schema = Some(schema);
        self
    }

    /// Sets the documented success description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// The handler, if any.
    pub fn handler(&self) -> Option<&Handler> {
        self.handler.as_ref()
    }

    /// The request schema, if any.
    pub fn request_schema(&self) -> Option<&Arc<Schema>> {
        self.request_schema.as_ref()
    }

    /// The response schema, if any.
    pub fn response_schema(&self) -> Option<&Arc<Schema>> {
        self.response_schema.as_ref()
    }

    /// The documented description, if any.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub(crate) fn into_parts(
        self,
    ) -> (
        Option<Handler>,
        Option<Arc<Schema>>,
        Option<Arc<Schema>>,
        Option<String>,
    ) {
        (
            self.handler,
            self.request_schema,
            self.response_schema,
            self.description,
        )
    }
}

impl From<()> for EndpointDefinition {
    fn from((): ()) -> Self {
        Self::new()
    }
}

impl From<Handler> for EndpointDefinition {
    fn from(handler: Handler) -> Self {
        Self::new().with_handler(handler)
    }
}

impl From<(Handler, Arc<Schema>)> for EndpointDefinition {
    fn from((handler, response): (Handler, Arc<Schema>)) -> Self {
        Self::new().with_handler(handler).with_response(response)
    }
}

impl From<(Handler, Arc<Schema>, Arc<Schema>)> for EndpointDefinition {
    fn from((handler, request, response): (Handler, Arc<Schema>, Arc<Schema>)) -> Self {
        Self::new()
            .with_handler(handler)
            .with_request(request)
            .with_response(response)
    }
}
