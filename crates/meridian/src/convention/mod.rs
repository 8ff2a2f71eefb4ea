//! Conventions: reusable recipes that turn operation mappings into routes.
//!
//! Each convention owns a fixed dispatch table from [`Operation`] to the
//! registration logic for that operation. Mappings are checked as a whole
//! before anything is registered, so a rejected mapping leaves the
//! application untouched.

mod crud;
mod discovery;
mod entry;
mod query;
mod relation;
mod swagger;

use std::sync::Arc;

use indexmap::IndexMap;
use meridian_core::{MeridianError, MeridianResult, Namespace, Operation};
use meridian_schema::Schema;

use crate::app::{Application, RouteEntry};
use crate::endpoint::{EndpointDefinition, Handler};

pub use crud::{configure_crud, CrudConvention};
pub use discovery::configure_discovery;
pub use query::configure_query;
pub use relation::{configure_relation, RelationConvention};
pub use swagger::configure_swagger;

/// An ordered mapping from operation to its definition.
///
/// ```
/// use meridian::{Handler, Mappings};
/// use meridian_core::Operation;
///
/// let mappings = Mappings::new()
///     .with(Operation::Delete, Handler::delete(|_| Ok(true)))
///     .with_named("retrieve", Handler::item(|_| Ok(None)))
///     .unwrap();
/// assert_eq!(mappings.len(), 2);
///
/// assert!(Mappings::new().with_named("explode", ()).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Mappings(IndexMap<Operation, EndpointDefinition>);

impl Mappings {
    /// An empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps `operation`, replacing any earlier definition.
    #[must_use]
    pub fn with(mut self, operation: Operation, definition: impl Into<EndpointDefinition>) -> Self {
        self.0.insert(operation, definition.into());
        self
    }

    /// Maps an operation given by name. Unknown names are rejected.
    pub fn with_named(
        self,
        name: &str,
        definition: impl Into<EndpointDefinition>,
    ) -> MeridianResult<Self> {
        Ok(self.with(Operation::from_name(name)?, definition))
    }

    /// Number of mapped operations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if nothing is mapped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Mapped operations, in insertion order.
    pub fn operations(&self) -> impl Iterator<Item = Operation> + '_ {
        self.0.keys().copied()
    }

    fn iter(&self) -> impl Iterator<Item = (Operation, &EndpointDefinition)> {
        self.0.iter().map(|(op, def)| (*op, def))
    }
}

impl IntoIterator for Mappings {
    type Item = (Operation, EndpointDefinition);
    type IntoIter = indexmap::map::IntoIter<Operation, EndpointDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl FromIterator<(Operation, EndpointDefinition)> for Mappings {
    fn from_iter<I: IntoIterator<Item = (Operation, EndpointDefinition)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A registration recipe for one resource shape.
pub trait Convention {
    /// A short name for log and error messages.
    fn name(&self) -> &'static str;

    /// True if this convention knows how to register `operation`.
    fn supports(&self, operation: Operation) -> bool;

    /// Checks anything beyond operation support, e.g. the namespace shape.
    fn check_namespace(&self, _ns: &Namespace) -> MeridianResult<()> {
        Ok(())
    }

    /// Builds the route for one operation as `(path, entry)`, without
    /// registering it.
    fn route_for(
        &self,
        app: &Application,
        ns: &Namespace,
        operation: Operation,
        definition: EndpointDefinition,
    ) -> MeridianResult<(String, RouteEntry)>;

    /// Checks every mapping, then registers all of the routes or none.
    fn configure(
        &self,
        app: &mut Application,
        ns: &Namespace,
        mappings: Mappings,
    ) -> MeridianResult<()> {
        self.check_namespace(ns)?;
        for (operation, definition) in mappings.iter() {
            if !self.supports(operation) {
                return Err(MeridianError::configuration(format!(
                    "{} convention does not support operation '{operation}'",
                    self.name()
                )));
            }
            check_handler(operation, definition)?;
        }

        tracing::debug!(
            convention = self.name(),
            namespace = %ns.subject_name(),
            operations = mappings.len(),
            "configuring convention"
        );
        let batch = mappings
            .into_iter()
            .map(|(operation, definition)| self.route_for(app, ns, operation, definition))
            .collect::<MeridianResult<Vec<_>>>()?;
        app.register_all(batch)
    }
}

/// The handler kind each operation expects.
const fn expected_kind(operation: Operation) -> &'static str {
    match operation {
        Operation::Search | Operation::SearchFor => "search",
        Operation::Delete | Operation::DeleteFor => "delete",
        _ => "item",
    }
}

fn check_handler(operation: Operation, definition: &EndpointDefinition) -> MeridianResult<()> {
    let expected = expected_kind(operation);
    match definition.handler() {
        None => Err(MeridianError::configuration(format!(
            "operation '{operation}' has no handler"
        ))),
        Some(handler) if handler.kind() != expected => {
            Err(MeridianError::configuration(format!(
                "operation '{operation}' expects a {expected} handler, got a {} handler",
                handler.kind()
            )))
        }
        Some(_) => Ok(()),
    }
}

/// Turns a configuration error into a registration error.
pub(crate) fn config_error(err: meridian_config::ConfigError) -> MeridianError {
    MeridianError::configuration(err.to_string())
}

/// A definition whose handler kind has been checked.
pub(crate) struct Checked {
    pub(crate) handler: Handler,
    pub(crate) request: Option<Arc<Schema>>,
    pub(crate) response: Option<Arc<Schema>>,
    pub(crate) description: Option<String>,
}

pub(crate) fn checked(
    operation: Operation,
    definition: EndpointDefinition,
) -> MeridianResult<Checked> {
    check_handler(operation, &definition)?;
    let (handler, request, response, description) = definition.into_parts();
    let handler = handler.ok_or_else(|| {
        MeridianError::configuration(format!("operation '{operation}' has no handler"))
    })?;
    Ok(Checked {
        handler,
        request,
        response,
        description,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::SearchResult;

    #[test]
    fn test_check_handler_kinds() {
        let search: EndpointDefinition = Handler::search(|_| Ok(SearchResult::default())).into();
        assert!(check_handler(Operation::Search, &search).is_ok());
        assert!(check_handler(Operation::SearchFor, &search).is_ok());
        assert!(check_handler(Operation::Retrieve, &search).is_err());

        let err = check_handler(Operation::Create, &EndpointDefinition::new()).unwrap_err();
        assert!(err.to_string().contains("has no handler"));
    }

    #[test]
    fn test_mappings_preserve_order() {
        let mappings = Mappings::new()
            .with(Operation::Retrieve, Handler::item(|_| Ok(None)))
            .with(Operation::Create, Handler::item(|_| Ok(None)));
        assert_eq!(
            mappings.operations().collect::<Vec<_>>(),
            vec![Operation::Retrieve, Operation::Create]
        );
    }
}
