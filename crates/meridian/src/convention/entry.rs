//! Route entries for each family of operations.
//!
//! The conventions pick the path; these functions pick the input source,
//! the handler contract and the documented response.

use std::sync::Arc;

use meridian_core::{MeridianError, MeridianResult, Namespace, Operation};
use meridian_schema::{page_schema_with_limit, paginated_list_schema, Schema};

use super::Checked;
use crate::app::{Action, Input, RouteEntry};
use crate::endpoint::Handler;

fn mismatch(operation: Operation, handler: &Handler) -> MeridianError {
    MeridianError::configuration(format!(
        "operation '{operation}' cannot use a {} handler",
        handler.kind()
    ))
}

/// Search and search-for: page query in, paginated envelope out.
pub(crate) fn search(
    operation: Operation,
    ns: &Namespace,
    checked: Checked,
    default_limit: i64,
) -> MeridianResult<RouteEntry> {
    let handler = match checked.handler {
        Handler::Search(handler) => handler,
        other => return Err(mismatch(operation, &other)),
    };
    let query = checked
        .request
        .unwrap_or_else(|| page_schema_with_limit(default_limit).shared());
    let envelope = checked
        .response
        .clone()
        .map(|item| paginated_list_schema(item).shared());

    Ok(RouteEntry::new(
        operation,
        ns,
        Action::Search {
            handler,
            require_context: operation == Operation::SearchFor,
        },
    )
    .input(Input::Query(query))
    .item_schema(checked.response)
    .response_schema(envelope)
    .description(checked.description))
}

/// Operations that read a JSON body and return one item.
///
/// With `partial`, required fields are not enforced. With `require`, a
/// handler returning no item means 404.
pub(crate) fn body(
    operation: Operation,
    ns: &Namespace,
    checked: Checked,
    partial: bool,
    require: bool,
) -> MeridianResult<RouteEntry> {
    let handler = match checked.handler {
        Handler::Item(handler) => handler,
        other => return Err(mismatch(operation, &other)),
    };
    Ok(
        RouteEntry::new(operation, ns, Action::Item { handler, require })
            .input(Input::Body {
                schema: checked.request,
                partial,
            })
            .item_schema(checked.response)
            .description(checked.description),
    )
}

/// Operations that read path parameters, and optionally a query string, and
/// return one item or 404.
pub(crate) fn read(
    operation: Operation,
    ns: &Namespace,
    checked: Checked,
    query: Option<Arc<Schema>>,
) -> MeridianResult<RouteEntry> {
    let handler = match checked.handler {
        Handler::Item(handler) => handler,
        other => return Err(mismatch(operation, &other)),
    };
    let input = query.map_or(Input::None, Input::Query);
    Ok(RouteEntry::new(
        operation,
        ns,
        Action::Item {
            handler,
            require: true,
        },
    )
    .input(input)
    .item_schema(checked.response)
    .description(checked.description))
}

/// Delete and delete-for: 204 or 404.
pub(crate) fn delete(
    operation: Operation,
    ns: &Namespace,
    checked: Checked,
) -> MeridianResult<RouteEntry> {
    let handler = match checked.handler {
        Handler::Delete(handler) => handler,
        other => return Err(mismatch(operation, &other)),
    };
    Ok(RouteEntry::new(operation, ns, Action::Delete { handler })
        .description(checked.description))
}

/// An empty query schema named after the namespace.
pub(crate) fn empty_query(ns: &Namespace, operation: Operation) -> Arc<Schema> {
    let name = match ns.object_name() {
        Some(object) => format!("{}_{}_{}", ns.subject_name(), operation.name(), object),
        None => format!("{}_{}", ns.subject_name(), operation.name()),
    };
    Schema::new(name).shared()
}
