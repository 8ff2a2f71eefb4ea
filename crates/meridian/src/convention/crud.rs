//! CRUD conventions for a plain resource.
//!
//! | Operation     | Method | Path                          | Success |
//! |---------------|--------|-------------------------------|---------|
//! | search        | GET    | `/{subject}`                  | 200     |
//! | create        | POST   | `/{subject}`                  | 201     |
//! | update_batch  | PATCH  | `/{subject}`                  | 200     |
//! | retrieve      | GET    | `/{subject}/<uuid:…_id>`      | 200     |
//! | delete        | DELETE | `/{subject}/<uuid:…_id>`      | 204     |
//! | replace       | PUT    | `/{subject}/<uuid:…_id>`      | 200     |
//! | update        | PATCH  | `/{subject}/<uuid:…_id>`      | 200     |
//!
//! Replace does not create missing items: a handler returning `None` is a
//! 404, and create-if-absent is left to the handler.

use meridian_core::{MeridianError, MeridianResult, Namespace, Operation};

use super::{checked, entry, Convention, Mappings};
use crate::app::{Application, RouteEntry};
use crate::endpoint::EndpointDefinition;

/// Registers search, create, update-batch, retrieve, delete, replace and
/// update for a resource.
#[derive(Debug, Clone, Copy, Default)]
pub struct CrudConvention;

impl Convention for CrudConvention {
    fn name(&self) -> &'static str {
        "crud"
    }

    fn supports(&self, operation: Operation) -> bool {
        matches!(
            operation,
            Operation::Search
                | Operation::Create
                | Operation::UpdateBatch
                | Operation::Retrieve
                | Operation::Delete
                | Operation::Replace
                | Operation::Update
        )
    }

    fn route_for(
        &self,
        app: &Application,
        ns: &Namespace,
        operation: Operation,
        definition: EndpointDefinition,
    ) -> MeridianResult<(String, RouteEntry)> {
        let checked = checked(operation, definition)?;
        let (path, route) = match operation {
            Operation::Search => (
                ns.collection_path(),
                entry::search(operation, ns, checked, app.default_limit())?,
            ),
            Operation::Create | Operation::UpdateBatch => (
                ns.collection_path(),
                entry::body(operation, ns, checked, false, false)?,
            ),
            Operation::Retrieve => (ns.instance_path(), entry::read(operation, ns, checked, None)?),
            Operation::Delete => (ns.instance_path(), entry::delete(operation, ns, checked)?),
            Operation::Replace => (
                ns.instance_path(),
                entry::body(operation, ns, checked, false, true)?,
            ),
            Operation::Update => (
                ns.instance_path(),
                entry::body(operation, ns, checked, true, true)?,
            ),
            other => {
                return Err(MeridianError::configuration(format!(
                    "crud convention does not support operation '{other}'"
                )))
            }
        };
        Ok((path, route))
    }
}

/// Registers `mappings` for `ns` with the [`CrudConvention`].
///
/// Every mapping is checked before any route is registered.
pub fn configure_crud(app: &mut Application, ns: &Namespace, mappings: Mappings) -> MeridianResult<()> {
    CrudConvention.configure(app, ns, mappings)
}
