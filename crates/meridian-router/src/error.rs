//! Router error types.

use thiserror::Error;

/// Result type alias for router operations.
pub type RouterResult<T> = Result<T, RouterError>;

/// Errors raised while registering routes or generating URLs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouterError {
    /// A path template could not be parsed.
    #[error("invalid path template '{template}': {reason}")]
    InvalidTemplate {
        /// The offending template
        template: String,
        /// Why it was rejected
        reason: String,
    },

    /// An endpoint identifier was registered twice.
    #[error("endpoint '{endpoint}' is already registered")]
    DuplicateEndpoint {
        /// The endpoint identifier
        endpoint: String,
    },

    /// A (path, method) pair was registered twice.
    #[error("route {method} {template} is already registered")]
    DuplicateRoute {
        /// The HTTP method
        method: String,
        /// The path template
        template: String,
    },

    /// The HTTP method cannot be routed.
    #[error("unsupported method: {method}")]
    UnsupportedMethod {
        /// The HTTP method
        method: String,
    },

    /// Reverse lookup of an endpoint that was never registered.
    #[error("unknown endpoint: {endpoint}")]
    UnknownEndpoint {
        /// The endpoint identifier
        endpoint: String,
    },

    /// Reverse URL generation lacked a required path parameter.
    #[error("could not build url for endpoint '{endpoint}': missing parameter '{parameter}'")]
    MissingParameter {
        /// The endpoint identifier
        endpoint: String,
        /// The first placeholder that had no value
        parameter: String,
    },
}

impl RouterError {
    /// Creates an invalid template error.
    pub fn invalid_template(template: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidTemplate {
            template: template.into(),
            reason: reason.into(),
        }
    }

    /// Returns true if this is the recoverable missing-parameter condition.
    #[must_use]
    pub fn is_missing_parameter(&self) -> bool {
        matches!(self, Self::MissingParameter { .. })
    }
}
