//! Top-level configuration.

use meridian_core::Operation;
use meridian_telemetry::LogConfig;
use serde::{Deserialize, Serialize};

use crate::{ConfigError, ConfigResult, ContextConfig, DiscoveryConfig, RouteConfig, SwaggerConfig};

/// Complete Meridian service configuration.
///
/// ```
/// use meridian_config::MeridianConfig;
///
/// let config = MeridianConfig::default();
/// assert_eq!(config.route.path_prefix, "/api");
/// assert_eq!(config.discovery.name, "all");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct MeridianConfig {
    /// Route registration.
    #[serde(default)]
    pub route: RouteConfig,

    /// Discovery endpoint.
    #[serde(default)]
    pub discovery: DiscoveryConfig,

    /// Swagger endpoint.
    #[serde(default)]
    pub swagger: SwaggerConfig,

    /// Request context capture.
    #[serde(default)]
    pub context: ContextConfig,

    /// Logging.
    #[serde(default)]
    pub logging: LogConfig,
}

impl MeridianConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> MeridianConfigBuilder {
        MeridianConfigBuilder::new()
    }

    /// Debug logging with pretty output.
    #[must_use]
    pub fn development() -> Self {
        Self {
            logging: LogConfig::development(),
            ..Self::default()
        }
    }

    /// JSON logging at `info`.
    #[must_use]
    pub fn production() -> Self {
        Self {
            logging: LogConfig::production(),
            ..Self::default()
        }
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if:
    /// - `route.default_limit` is not positive
    /// - a path prefix is neither empty nor starts with `/`
    /// - `route.url_root` is not an http(s) URL
    /// - a name or the swagger version is empty
    /// - the logging level is not a valid filter
    ///
    /// Returns `ConfigError::UnknownOperation` if an operation list names an
    /// operation that does not exist.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.route.default_limit <= 0 {
            return Err(ConfigError::invalid_value(
                "route.default_limit",
                format!("must be positive, got {}", self.route.default_limit),
            ));
        }
        check_prefix("route.path_prefix", &self.route.path_prefix)?;
        check_prefix("swagger.path_prefix", &self.swagger.path_prefix)?;

        if !(self.route.url_root.starts_with("http://") || self.route.url_root.starts_with("https://")) {
            return Err(ConfigError::invalid_value(
                "route.url_root",
                format!("expected an http(s) URL, got '{}'", self.route.url_root),
            ));
        }

        check_non_empty("discovery.name", &self.discovery.name)?;
        check_non_empty("swagger.name", &self.swagger.name)?;
        check_non_empty("swagger.version", &self.swagger.version)?;

        parse_operations("discovery.operations", &self.discovery.operations)?;
        parse_operations("swagger.operations", &self.swagger.operations)?;

        meridian_telemetry::create_env_filter(&self.logging.level)
            .map_err(|e| ConfigError::invalid_value("logging.level", e.to_string()))?;

        Ok(())
    }

    /// The operations listed by the discovery endpoint.
    pub fn discovery_operations(&self) -> ConfigResult<Vec<Operation>> {
        parse_operations("discovery.operations", &self.discovery.operations)
    }

    /// The operations included in the swagger document.
    pub fn swagger_operations(&self) -> ConfigResult<Vec<Operation>> {
        parse_operations("swagger.operations", &self.swagger.operations)
    }
}

fn check_prefix(field: &str, prefix: &str) -> ConfigResult<()> {
    if prefix.is_empty() || prefix.starts_with('/') {
        Ok(())
    } else {
        Err(ConfigError::invalid_value(
            field,
            format!("must be empty or start with '/', got '{prefix}'"),
        ))
    }
}

fn check_non_empty(field: &str, value: &str) -> ConfigResult<()> {
    if value.trim().is_empty() {
        Err(ConfigError::invalid_value(field, "must not be empty"))
    } else {
        Ok(())
    }
}

fn parse_operations(field: &str, names: &[String]) -> ConfigResult<Vec<Operation>> {
    names
        .iter()
        .map(|name| {
            Operation::from_name(name).map_err(|_| ConfigError::unknown_operation(field, name))
        })
        .collect()
}

/// Builder for [`MeridianConfig`].
#[derive(Debug, Default)]
pub struct MeridianConfigBuilder {
    config: MeridianConfig,
}

impl MeridianConfigBuilder {
    /// Start from defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the route section.
    #[must_use]
    pub fn route(mut self, route: RouteConfig) -> Self {
        self.config.route = route;
        self
    }

    /// Set the discovery section.
    #[must_use]
    pub fn discovery(mut self, discovery: DiscoveryConfig) -> Self {
        self.config.discovery = discovery;
        self
    }

    /// Set the swagger section.
    #[must_use]
    pub fn swagger(mut self, swagger: SwaggerConfig) -> Self {
        self.config.swagger = swagger;
        self
    }

    /// Set the context section.
    #[must_use]
    pub fn context(mut self, context: ContextConfig) -> Self {
        self.config.context = context;
        self
    }

    /// Set the logging section.
    #[must_use]
    pub fn logging(mut self, logging: LogConfig) -> Self {
        self.config.logging = logging;
        self
    }

    /// Build without validation.
    #[must_use]
    pub fn build(self) -> MeridianConfig {
        self.config
    }

    /// Build and validate.
    pub fn build_validated(self) -> ConfigResult<MeridianConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(MeridianConfig::default().validate().is_ok());
        assert!(MeridianConfig::development().validate().is_ok());
        assert!(MeridianConfig::production().validate().is_ok());
    }

    #[test]
    fn test_builder_sections() {
        let config = MeridianConfig::builder()
            .route(RouteConfig {
                path_prefix: "/v2".to_string(),
                ..RouteConfig::default()
            })
            .build();
        assert_eq!(config.route.path_prefix, "/v2");
        assert_eq!(config.swagger.name, "swagger");
    }

    #[test]
    fn test_validate_limit() {
        let config = MeridianConfig::builder()
            .route(RouteConfig {
                default_limit: 0,
                ..RouteConfig::default()
            })
            .build();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "route.default_limit"
        ));
    }

    #[test]
    fn test_validate_prefixes() {
        let config = MeridianConfig::builder()
            .route(RouteConfig {
                path_prefix: "api".to_string(),
                ..RouteConfig::default()
            })
            .build();
        assert!(config.validate().is_err());

        let config = MeridianConfig::builder()
            .route(RouteConfig {
                path_prefix: String::new(),
                ..RouteConfig::default()
            })
            .build();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_unknown_operation() {
        let config = MeridianConfig::builder()
            .swagger(SwaggerConfig {
                operations: vec!["search".to_string(), "frobnicate".to_string()],
                ..SwaggerConfig::default()
            })
            .build_validated();
        match config {
            Err(ConfigError::UnknownOperation { field, name }) => {
                assert_eq!(field, "swagger.operations");
                assert_eq!(name, "frobnicate");
            }
            other => panic!("expected unknown operation, got {other:?}"),
        }
    }

    #[test]
    fn test_operation_lists() {
        let config = MeridianConfig::default();
        assert_eq!(config.discovery_operations().unwrap(), vec![Operation::Search]);
        let swagger = config.swagger_operations().unwrap();
        assert_eq!(swagger.len(), 7);
        assert!(swagger.contains(&Operation::SearchFor));
        assert!(!swagger.contains(&Operation::Discover));
    }

    #[test]
    fn test_validate_url_root() {
        let config = MeridianConfig::builder()
            .route(RouteConfig {
                url_root: "localhost".to_string(),
                ..RouteConfig::default()
            })
            .build();
        assert!(config.validate().is_err());
    }
}
