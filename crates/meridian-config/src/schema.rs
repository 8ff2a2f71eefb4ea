//! Configuration section types.

use meridian_core::{DEFAULT_LIMIT, DEFAULT_VERSION};
use serde::{Deserialize, Serialize};

/// Route registration settings.
///
/// ```
/// use meridian_config::RouteConfig;
///
/// let config = RouteConfig::default();
/// assert_eq!(config.path_prefix, "/api");
/// assert_eq!(config.default_limit, 20);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RouteConfig {
    /// Prefix prepended to every registered route.
    #[serde(default = "default_path_prefix")]
    pub path_prefix: String,

    /// Page size used when a search request omits `limit`.
    #[serde(default = "default_limit")]
    pub default_limit: i64,

    /// Fallback external URL root when the request carries no `Host`.
    #[serde(default = "default_url_root")]
    pub url_root: String,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            path_prefix: default_path_prefix(),
            default_limit: default_limit(),
            url_root: default_url_root(),
        }
    }
}

fn default_path_prefix() -> String {
    "/api".to_string()
}

fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

fn default_url_root() -> String {
    "http://localhost".to_string()
}

/// Discovery endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DiscoveryConfig {
    /// Subject name the discovery endpoint is registered under.
    #[serde(default = "default_discovery_name")]
    pub name: String,

    /// Operations whose endpoints are listed.
    #[serde(default = "default_discovery_operations")]
    pub operations: Vec<String>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            name: default_discovery_name(),
            operations: default_discovery_operations(),
        }
    }
}

fn default_discovery_name() -> String {
    "all".to_string()
}

fn default_discovery_operations() -> Vec<String> {
    vec!["search".to_string()]
}

/// Swagger endpoint settings.
///
/// The document is served at `{path_prefix}/{version}/{name}` below the
/// route prefix and covers routes under `{path_prefix}/{version}` only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct SwaggerConfig {
    /// Subject name of the swagger endpoint.
    #[serde(default = "default_swagger_name")]
    pub name: String,

    /// API version; also the document's `info.version`.
    #[serde(default = "default_swagger_version")]
    pub version: String,

    /// Extra prefix between the route prefix and the version.
    #[serde(default)]
    pub path_prefix: String,

    /// Operations included in the document.
    #[serde(default = "default_swagger_operations")]
    pub operations: Vec<String>,

    /// Document title; the swagger subject name is used when unset.
    #[serde(default)]
    pub title: Option<String>,
}

impl Default for SwaggerConfig {
    fn default() -> Self {
        Self {
            name: default_swagger_name(),
            version: default_swagger_version(),
            path_prefix: String::new(),
            operations: default_swagger_operations(),
            title: None,
        }
    }
}

fn default_swagger_name() -> String {
    "swagger".to_string()
}

fn default_swagger_version() -> String {
    DEFAULT_VERSION.to_string()
}

fn default_swagger_operations() -> Vec<String> {
    ["create", "delete", "replace", "retrieve", "search", "search_for", "update"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// Request context capture.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ContextConfig {
    /// Request headers starting with this prefix are captured.
    #[serde(default = "default_header_prefix")]
    pub include_header_prefix: String,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            include_header_prefix: default_header_prefix(),
        }
    }
}

fn default_header_prefix() -> String {
    meridian_core::context::DEFAULT_CONTEXT_HEADER_PREFIX.to_string()
}
