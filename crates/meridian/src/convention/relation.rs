//! Relation conventions: operations on the objects of a subject.
//!
//! Every route lives on the relation path,
//! `/{subject}/<uuid:{subject}_id>/{object}`, and the namespace must name an
//! object. Search-for handlers must return a link context (usually the
//! parent id) so pagination links can be built.

use meridian_core::{MeridianError, MeridianResult, Namespace, Operation};

use super::{checked, entry, Convention, Mappings};
use crate::app::{Application, RouteEntry};
use crate::endpoint::EndpointDefinition;

/// Registers create-for, delete-for, replace-for, retrieve-for and
/// search-for.
#[derive(Debug, Clone, Copy, Default)]
pub struct RelationConvention;

impl Convention for RelationConvention {
    fn name(&self) -> &'static str {
        "relation"
    }

    fn supports(&self, operation: Operation) -> bool {
        operation.is_relation()
    }

    fn check_namespace(&self, ns: &Namespace) -> MeridianResult<()> {
        if ns.object_name().is_none() {
            return Err(MeridianError::configuration(format!(
                "relation namespace '{}' has no object",
                ns.subject_name()
            )));
        }
        Ok(())
    }

    fn route_for(
        &self,
        app: &Application,
        ns: &Namespace,
        operation: Operation,
        definition: EndpointDefinition,
    ) -> MeridianResult<(String, RouteEntry)> {
        let path = ns.relation_path().ok_or_else(|| {
            MeridianError::configuration(format!(
                "relation namespace '{}' has no object",
                ns.subject_name()
            ))
        })?;
        let checked = checked(operation, definition)?;
        let route = match operation {
            Operation::CreateFor | Operation::ReplaceFor => {
                entry::body(operation, ns, checked, false, true)?
            }
            Operation::DeleteFor => entry::delete(operation, ns, checked)?,
            Operation::RetrieveFor => {
                let query = checked
                    .request
                    .clone()
                    .unwrap_or_else(|| entry::empty_query(ns, operation));
                entry::read(operation, ns, checked, Some(query))?
            }
            Operation::SearchFor => entry::search(operation, ns, checked, app.default_limit())?,
            other => {
                return Err(MeridianError::configuration(format!(
                    "relation convention does not support operation '{other}'"
                )))
            }
        };
        Ok((path, route))
    }
}

/// Registers `mappings` for the relation namespace `ns`.
pub fn configure_relation(
    app: &mut Application,
    ns: &Namespace,
    mappings: Mappings,
) -> MeridianResult<()> {
    RelationConvention.configure(app, ns, mappings)
}
