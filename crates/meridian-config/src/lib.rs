//! Typed configuration for Meridian services.
//!
//! [`MeridianConfig`] groups the settings of the convention layer:
//!
//! - [`RouteConfig`]: global path prefix, default page size, fallback URL root
//! - [`DiscoveryConfig`]: where the discovery endpoint lives and what it lists
//! - [`SwaggerConfig`]: where the Swagger document lives and what it covers
//! - [`ContextConfig`]: which request headers are captured as context
//! - [`LogConfig`](meridian_telemetry::LogConfig): logging
//!
//! Unknown fields are rejected, operation names are checked against the
//! operation registry, and [`ConfigLoader`] layers defaults, files and
//! environment variables.
//!
//! # Configuration File Format
//!
//! ```toml
//! [route]
//! path_prefix = "/api"
//! default_limit = 20
//! url_root = "http://localhost"
//!
//! [discovery]
//! name = "all"
//! operations = ["search"]
//!
//! [swagger]
//! name = "swagger"
//! version = "v1"
//! path_prefix = ""
//! operations = ["create", "delete", "replace", "retrieve", "search", "search_for", "update"]
//!
//! [context]
//! include_header_prefix = "X-Request"
//!
//! [logging]
//! level = "info"
//! format = "json"
//! ```

#![doc(html_root_url = "https://docs.rs/meridian-config/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::{MeridianConfig, MeridianConfigBuilder};
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::{ContextConfig, DiscoveryConfig, RouteConfig, SwaggerConfig};

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
