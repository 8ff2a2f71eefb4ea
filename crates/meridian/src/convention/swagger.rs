//! The Swagger endpoint.
//!
//! Registered at `{route prefix}{swagger prefix}/{version}/{name}`. Each
//! request rebuilds the document from the route registry, keeping routes
//! below `{route prefix}{swagger prefix}/{version}` whose operation is in
//! the configured allow-list.

use meridian_core::{MeridianResult, Namespace, Operation};

use super::config_error;
use crate::app::{Action, Application, RouteEntry};

/// Registers the Swagger endpoint described by the `[swagger]` section.
///
/// Returns the Swagger namespace.
pub fn configure_swagger(app: &mut Application) -> MeridianResult<Namespace> {
    let swagger = &app.config().swagger;
    let ns = Namespace::new(swagger.name.as_str())
        .with_prefix(swagger.path_prefix.clone())
        .with_version(swagger.version.clone());
    let operations = app.config().swagger_operations().map_err(config_error)?;

    tracing::debug!(
        name = %ns.subject_name(),
        version = %ns.effective_version(),
        operations = ?operations,
        "configuring swagger"
    );
    let route = RouteEntry::new(Operation::Discover, &ns, Action::Swagger { operations });
    app.register(&ns.singleton_path(), route)?;
    Ok(ns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use meridian_config::{MeridianConfig, SwaggerConfig};

    #[test]
    fn test_registers_versioned_singleton() {
        let mut app = Application::default();
        let ns = configure_swagger(&mut app).unwrap();
        assert_eq!(ns.path(), "/v1");
        assert_eq!(app.template_of("swagger.discover.v1"), Some("/api/v1/swagger"));
    }

    #[test]
    fn test_custom_prefix_and_version() {
        let config = MeridianConfig::builder()
            .swagger(SwaggerConfig {
                name: "docs".to_string(),
                version: "v2".to_string(),
                path_prefix: "/internal".to_string(),
                ..SwaggerConfig::default()
            })
            .build();
        let mut app = Application::new(config);
        configure_swagger(&mut app).unwrap();
        assert_eq!(
            app.template_of("docs.discover.v2"),
            Some("/api/internal/v2/docs")
        );
    }

    #[test]
    fn test_rejects_unknown_operation() {
        let config = MeridianConfig::builder()
            .swagger(SwaggerConfig {
                operations: vec!["teleport".to_string()],
                ..SwaggerConfig::default()
            })
            .build();
        let mut app = Application::new(config);
        assert!(configure_swagger(&mut app).is_err());
    }
}
