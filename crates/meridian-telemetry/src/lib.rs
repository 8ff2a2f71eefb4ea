//! Observability for Meridian services.
//!
//! - **Logging**: [`init_logging`] installs a `tracing-subscriber` registry
//!   with an `EnvFilter` and a JSON or pretty formatter.
//! - **Metrics**: [`metrics::record_request`] feeds request counts and latency
//!   through the `metrics` facade.
//!
//! Request spans themselves are opened by the application dispatcher; this
//! crate only decides where they end up.
//!
//! # Example
//!
//! ```rust,ignore
//! use meridian_telemetry::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::production())?;
//! ```

#![doc(html_root_url = "https://docs.rs/meridian-telemetry/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod logging;
pub mod metrics;

pub use error::TelemetryError;
pub use logging::{create_env_filter, init_logging, LogConfig, LogFormat};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
