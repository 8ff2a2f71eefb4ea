//! The discovery endpoint: a singleton that links to other endpoints.
//!
//! `GET /api/{name}` answers
//!
//! ```json
//! {"_links": {"self": {...}, "search": [{"href": ..., "type": "person"}, ...]}}
//! ```
//!
//! `search` holds one link per registered route whose operation is in the
//! configured allow-list, in registration order. Nested collections are
//! listed as templated links.

use meridian_core::{MeridianResult, Namespace, Operation};

use super::config_error;
use crate::app::{Action, Application, RouteEntry};

/// Registers the discovery endpoint described by the `[discovery]` section.
///
/// Returns the discovery namespace name.
pub fn configure_discovery(app: &mut Application) -> MeridianResult<String> {
    let name = app.config().discovery.name.clone();
    let operations = app.config().discovery_operations().map_err(config_error)?;
    let ns = Namespace::new(name.as_str());

    tracing::debug!(name = %name, operations = ?operations, "configuring discovery");
    let route = RouteEntry::new(Operation::Discover, &ns, Action::Discovery { operations });
    app.register(&ns.singleton_path(), route)?;
    Ok(name)
}
