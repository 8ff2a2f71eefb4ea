//! Query convention: a GET on a singleton path that reads its arguments
//! from the query string and returns one item.

use meridian_core::{MeridianResult, Namespace, Operation};

use super::{checked, entry};
use crate::app::Application;
use crate::endpoint::EndpointDefinition;

/// Registers a query at the singleton path of `ns`.
///
/// The request schema, if any, is read from the query string. A handler
/// returning `None` is a 404.
pub fn configure_query(
    app: &mut Application,
    ns: &Namespace,
    definition: impl Into<EndpointDefinition>,
) -> MeridianResult<()> {
    let operation = Operation::Query;
    let checked = checked(operation, definition.into())?;
    let query = checked
        .request
        .clone()
        .unwrap_or_else(|| entry::empty_query(ns, operation));
    let route = entry::read(operation, ns, checked, Some(query))?;
    app.register(&ns.singleton_path(), route)
}
