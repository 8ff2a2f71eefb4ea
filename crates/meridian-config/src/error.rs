//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or validating a [`MeridianConfig`](crate::MeridianConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required configuration file does not exist.
    #[error("configuration file not found: {path}")]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// A configuration file exists but could not be read.
    #[error("failed to read configuration file: {path}")]
    Read {
        /// Path to the file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Neither TOML nor JSON.
    #[error("unsupported configuration format: {format}")]
    UnsupportedFormat {
        /// The format name or file path that was rejected.
        format: String,
    },

    /// TOML parsing error.
    #[error("failed to parse TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON parsing error.
    #[error("failed to parse JSON configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// A `.env` file exists but is malformed.
    #[error("failed to load dotenv file: {0}")]
    Dotenv(#[from] dotenvy::Error),

    /// A section value is out of range or malformed.
    #[error("invalid configuration value for {field}: {reason}")]
    InvalidValue {
        /// Dotted path of the offending value, e.g. `route.default_limit`.
        field: String,
        /// Explanation of why the value is invalid.
        reason: String,
    },

    /// An operation list names an operation that does not exist.
    #[error("{field} names unknown operation '{name}'")]
    UnknownOperation {
        /// Dotted path of the list, e.g. `swagger.operations`.
        field: String,
        /// The unrecognised name.
        name: String,
    },

    /// A `PREFIX__SECTION__KEY` variable could not be applied.
    #[error("failed to apply environment override {var}: {reason}")]
    EnvOverride {
        /// The environment variable name.
        var: String,
        /// What was wrong with it.
        reason: String,
    },
}

impl ConfigError {
    /// A missing required file.
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// An unreadable file.
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// A format other than TOML or JSON.
    pub fn unsupported_format(format: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            format: format.into(),
        }
    }

    /// An invalid section value.
    pub fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// An unknown operation name in `field`.
    pub fn unknown_operation(field: impl Into<String>, name: impl Into<String>) -> Self {
        Self::UnknownOperation {
            field: field.into(),
            name: name.into(),
        }
    }

    /// A malformed environment override.
    pub fn env_override(var: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::EnvOverride {
            var: var.into(),
            reason: reason.into(),
        }
    }
}
