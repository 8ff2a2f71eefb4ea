//! The application: configuration plus the route registry.
//!
//! Routes are registered once at start-up through the conventions and are
//! read-only afterwards. Each route is stored twice: its template in the
//! [`Router`] (for matching and reverse URLs) and its [`RouteEntry`] in
//! registration order (for dispatch, discovery and documentation).

use std::sync::Arc;

use indexmap::IndexMap;
use meridian_config::MeridianConfig;
use meridian_core::{MeridianError, MeridianResult, Namespace, Operation, UrlContext};
use meridian_router::Router;
use meridian_schema::Schema;

use crate::endpoint::{DeleteFn, ItemFn, SearchFn};

/// Where an operation reads its input from.
#[derive(Debug, Clone)]
pub(crate) enum Input {
    /// Path parameters only.
    None,
    /// A JSON body, decoded fully or partially.
    Body {
        schema: Option<Arc<Schema>>,
        partial: bool,
    },
    /// The query string.
    Query(Arc<Schema>),
}

/// What to do once the input is decoded.
#[derive(Clone)]
pub(crate) enum Action {
    /// Call an item handler. With `require`, no item is a 404; otherwise it
    /// is a handler bug.
    Item { handler: Arc<ItemFn>, require: bool },
    /// Call a search handler and wrap the page.
    Search {
        handler: Arc<SearchFn>,
        require_context: bool,
    },
    /// Call a delete handler.
    Delete { handler: Arc<DeleteFn> },
    /// List the registered operations in the allow-list.
    Discovery { operations: Vec<Operation> },
    /// Build the Swagger document for the allow-listed operations.
    Swagger { operations: Vec<Operation> },
}

/// One route: where it dispatches to and how it reads and writes data.
#[derive(Clone)]
pub struct RouteEntry {
    pub(crate) operation: Operation,
    pub(crate) namespace: Namespace,
    /// Full template, including the global path prefix.
    pub(crate) template: String,
    pub(crate) input: Input,
    /// Schema used to serialise each returned item.
    pub(crate) item_schema: Option<Arc<Schema>>,
    /// Schema of the whole response body, for documentation.
    pub(crate) response_schema: Option<Arc<Schema>>,
    pub(crate) description: Option<String>,
    pub(crate) action: Action,
}

impl RouteEntry {
    pub(crate) fn new(operation: Operation, namespace: &Namespace, action: Action) -> Self {
        Self {
            operation,
            namespace: namespace.clone(),
            template: String::new(),
            input: Input::None,
            item_schema: None,
            response_schema: None,
            description: None,
            action,
        }
    }

    pub(crate) fn input(mut self, input: Input) -> Self {
        self.input = input;
        self
    }

    /// Serialises items with `schema` and documents the body as `schema`.
    pub(crate) fn item_schema(mut self, schema: Option<Arc<Schema>>) -> Self {
        self.response_schema = schema.clone();
        self.item_schema = schema;
        self
    }

    pub(crate) fn response_schema(mut self, schema: Option<Arc<Schema>>) -> Self {
        self.response_schema = schema;
        self
    }

    pub(crate) fn description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    /// The query-string schema, if this operation reads one.
    pub(crate) fn query_schema(&self) -> Option<&Arc<Schema>> {
        match &self.input {
            Input::Query(schema) => Some(schema),
            _ => None,
        }
    }

    /// The body schema, if this operation reads one.
    pub(crate) fn body_schema(&self) -> Option<&Arc<Schema>> {
        match &self.input {
            Input::Body { schema, .. } => schema.as_ref(),
            _ => None,
        }
    }
}

/// A configured set of REST routes.
///
/// `Application` implements [`meridian_core::Service`], so a transport or the
/// in-memory test client can drive it directly.
///
/// # Example
///
/// ```
/// use meridian::prelude::*;
///
/// let mut app = Application::default();
/// configure_crud(
///     &mut app,
///     &Namespace::new("person"),
///     Mappings::new().with(Operation::Delete, Handler::delete(|_| Ok(true))),
/// )
/// .unwrap();
///
/// assert_eq!(
///     app.endpoints().collect::<Vec<_>>(),
///     vec!["person.delete.v1"]
/// );
/// ```
pub struct Application {
    config: MeridianConfig,
    router: Router,
    routes: IndexMap<String, RouteEntry>,
}

impl Application {
    /// Creates an application with no routes.
    #[must_use]
    pub fn new(config: MeridianConfig) -> Self {
        Self {
            config,
            router: Router::new(),
            routes: IndexMap::new(),
        }
    }

    /// The configuration.
    #[must_use]
    pub fn config(&self) -> &MeridianConfig {
        &self.config
    }

    /// The route table.
    #[must_use]
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Registered endpoint identifiers, in registration order.
    pub fn endpoints(&self) -> impl Iterator<Item = &str> {
        self.routes.keys().map(String::as_str)
    }

    /// The full template registered for `endpoint`.
    #[must_use]
    pub fn template_of(&self, endpoint: &str) -> Option<&str> {
        self.routes.get(endpoint).map(|entry| entry.template.as_str())
    }

    /// A URL context rooted at `url_root`.
    #[must_use]
    pub fn url_context<'a>(&'a self, url_root: &'a str) -> UrlContext<'a> {
        UrlContext::new(&self.router, url_root)
    }

    /// Page size used when a request does not ask for one.
    #[must_use]
    pub fn default_limit(&self) -> i64 {
        self.config.route.default_limit
    }

    pub(crate) fn routes(&self) -> impl Iterator<Item = &RouteEntry> {
        self.routes.values()
    }

    pub(crate) fn entry(&self, endpoint: &str) -> Option<&RouteEntry> {
        self.routes.get(endpoint)
    }

    /// Binds `entry` at `path` below the global path prefix.
    pub(crate) fn register(&mut self, path: &str, entry: RouteEntry) -> MeridianResult<()> {
        let (endpoint, entry) = bind(&mut self.router, &self.config.route.path_prefix, path, entry)?;
        self.routes.insert(endpoint, entry);
        Ok(())
    }

    /// Binds every `(path, entry)` pair, or none of them.
    ///
    /// Routes are staged on a copy of the router; the application only
    /// changes once the whole batch has been accepted.
    pub(crate) fn register_all(&mut self, batch: Vec<(String, RouteEntry)>) -> MeridianResult<()> {
        let mut staged = self.router.clone();
        let mut entries = Vec::with_capacity(batch.len());
        for (path, entry) in batch {
            entries.push(bind(&mut staged, &self.config.route.path_prefix, &path, entry)?);
        }
        self.router = staged;
        self.routes.extend(entries);
        Ok(())
    }
}

/// Adds `entry` to `router` and returns it keyed by its endpoint.
fn bind(
    router: &mut Router,
    prefix: &str,
    path: &str,
    mut entry: RouteEntry,
) -> MeridianResult<(String, RouteEntry)> {
    let template = format!("{prefix}{path}");
    let endpoint = entry.namespace.endpoint_for(entry.operation);
    let (operation, ns) = Namespace::parse_endpoint(&endpoint)?;
    if operation != entry.operation || !ns.is_equivalent(&entry.namespace) {
        return Err(MeridianError::MalformedEndpoint { endpoint });
    }
    let method = entry.operation.method();

    router.add(&template, method.clone(), &endpoint)?;
    tracing::debug!(
        endpoint = %endpoint,
        method = %method,
        path = %template,
        "registered route"
    );

    entry.template = template;
    Ok((endpoint, entry))
}

impl Default for Application {
    fn default() -> Self {
        Self::new(MeridianConfig::default())
    }
}

impl std::fmt::Debug for Application {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Application")
            .field("config", &self.config)
            .field("routes", &self.routes.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meridian_config::RouteConfig;

    fn delete_entry(ns: &Namespace) -> RouteEntry {
        RouteEntry::new(
            Operation::Delete,
            ns,
            Action::Delete {
                handler: Arc::new(|_| Ok(true)),
            },
        )
    }

    #[test]
    fn test_register_applies_path_prefix() {
        let mut app = Application::default();
        let ns = Namespace::new("person");
        app.register(&ns.instance_path(), delete_entry(&ns)).unwrap();

        assert_eq!(
            app.template_of("person.delete.v1"),
            Some("/api/person/<uuid:person_id>")
        );
        assert!(app.router().route("person.delete.v1").is_some());
    }

    #[test]
    fn test_register_rejects_unparseable_endpoint() {
        let mut app = Application::default();
        let ns = Namespace::new("person.v2");
        let err = app.register(&ns.instance_path(), delete_entry(&ns)).unwrap_err();
        assert!(matches!(err, MeridianError::MalformedEndpoint { .. }));
        assert!(err.is_fatal());
        assert_eq!(app.endpoints().count(), 0);
    }

    #[test]
    fn test_register_custom_prefix() {
        let config = MeridianConfig::builder()
            .route(RouteConfig {
                path_prefix: String::new(),
                ..RouteConfig::default()
            })
            .build();
        let mut app = Application::new(config);
        let ns = Namespace::new("person");
        app.register(&ns.instance_path(), delete_entry(&ns)).unwrap();
        assert_eq!(
            app.template_of("person.delete.v1"),
            Some("/person/<uuid:person_id>")
        );
    }

    #[test]
    fn test_duplicate_endpoint_is_rejected() {
        let mut app = Application::default();
        let ns = Namespace::new("person");
        app.register(&ns.instance_path(), delete_entry(&ns)).unwrap();
        let err = app
            .register(&ns.instance_path(), delete_entry(&ns))
            .unwrap_err();
        assert!(matches!(err, MeridianError::Router(_)));
        assert_eq!(app.endpoints().count(), 1);
    }

    #[test]
    fn test_register_all_is_all_or_nothing() {
        let mut app = Application::default();
        let person = Namespace::new("person");
        let pet = Namespace::new("pet");
        app.register(&person.instance_path(), delete_entry(&person)).unwrap();

        let err = app
            .register_all(vec![
                (pet.instance_path(), delete_entry(&pet)),
                (person.instance_path(), delete_entry(&person)),
            ])
            .unwrap_err();
        assert!(matches!(err, MeridianError::Router(_)));
        assert_eq!(app.endpoints().count(), 1);
        assert!(app.router().route("pet.delete.v1").is_none());

        app.register_all(vec![(pet.instance_path(), delete_entry(&pet))])
            .unwrap();
        assert_eq!(app.template_of("pet.delete.v1"), Some("/api/pet/<uuid:pet_id>"));
    }

    #[test]
    fn test_entry_schemas() {
        let schema = Schema::new("PersonSchema").shared();
        let ns = Namespace::new("person");
        let entry = delete_entry(&ns)
            .input(Input::Query(schema.clone()))
            .item_schema(Some(schema));
        assert!(entry.query_schema().is_some());
        assert!(entry.body_schema().is_none());
        assert!(entry.response_schema.is_some());
    }
}
