//! Error types for Meridian.
//!
//! [`MeridianError`] is the error type shared by every crate in the
//! workspace. Request-level failures (validation, not found) are recovered at
//! the convention boundary and rendered as a stable JSON envelope:
//!
//! ```json
//! {"code": 422, "message": "Validation error", "retryable": false,
//!  "context": {"errors": [{"field": "firstName", "message": "...", "reasons": ["..."]}]}}
//! ```
//!
//! Registration failures (unknown operations, malformed templates, schema
//! collisions) are returned from start-up code and are expected to abort it.

use http::StatusCode;
use meridian_router::RouterError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using [`MeridianError`].
pub type MeridianResult<T> = Result<T, MeridianError>;

/// Categories of errors for classification and handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Request payload failed schema validation.
    Validation,
    /// Request could not be parsed at all.
    BadRequest,
    /// Resource or route not found.
    NotFound,
    /// Route exists but not for this method.
    MethodNotAllowed,
    /// Error raised by application code with its own status.
    Application,
    /// Programming or configuration errors.
    Internal,
}

impl ErrorCategory {
    /// Returns the default HTTP status code for this error category.
    #[must_use]
    pub const fn default_status_code(&self) -> StatusCode {
        match self {
            Self::Validation => StatusCode::UNPROCESSABLE_ENTITY,
            Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Application | Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Standard error type for Meridian.
#[derive(Error, Debug)]
pub enum MeridianError {
    /// Request validation failed.
    #[error("{message}")]
    Validation {
        /// Human-readable error message.
        message: String,
        /// One entry per failing field.
        errors: Vec<SubError>,
    },

    /// The request body could not be parsed.
    #[error("{message}")]
    BadRequest {
        /// Human-readable error message.
        message: String,
    },

    /// Resource not found.
    #[error("{message}")]
    NotFound {
        /// Human-readable error message.
        message: String,
    },

    /// The path exists but does not accept this method.
    #[error("The method {method} is not allowed for the requested URL.")]
    MethodNotAllowed {
        /// The rejected method.
        method: String,
    },

    /// A registered endpoint identifier does not parse against its own
    /// operation pattern.
    #[error("malformed endpoint identifier: {endpoint}")]
    MalformedEndpoint {
        /// The endpoint identifier.
        endpoint: String,
    },

    /// An operation name is not one of the known kinds.
    #[error("unknown operation: {name}")]
    UnknownOperation {
        /// The rejected name.
        name: String,
    },

    /// Route registration was misconfigured.
    #[error("configuration error: {message}")]
    Configuration {
        /// Human-readable error message.
        message: String,
    },

    /// Two distinct schemas derive the same definition type name.
    #[error("conflicting definitions for type '{type_name}'")]
    DefinitionCollision {
        /// The shared type name.
        type_name: String,
    },

    /// Route table or URL generation error.
    #[error(transparent)]
    Router(#[from] RouterError),

    /// Error raised by a handler with an explicit status.
    #[error("{message}")]
    Http {
        /// Response status.
        status: StatusCode,
        /// Human-readable error message.
        message: String,
        /// Whether the client may retry.
        retryable: bool,
        /// Optional structured detail.
        errors: Vec<SubError>,
    },

    /// Internal server error.
    #[error("{message}")]
    Internal {
        /// Human-readable error message.
        message: String,
        /// The underlying error (not exposed to clients).
        #[source]
        source: Option<anyhow::Error>,
    },
}

impl MeridianError {
    /// Creates a validation error from field errors.
    #[must_use]
    pub fn validation(errors: Vec<SubError>) -> Self {
        Self::Validation {
            message: "Validation error".to_string(),
            errors,
        }
    }

    /// Creates a bad request error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Creates a not found error.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// The standard not found error for unmatched URLs.
    #[must_use]
    pub fn route_not_found() -> Self {
        Self::not_found(
            "The requested URL was not found on the server.  \
             If you entered the URL manually please check your spelling and try again.",
        )
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates an application error with an explicit status.
    #[must_use]
    pub fn http(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
            retryable: false,
            errors: Vec::new(),
        }
    }

    /// Marks an application error as retryable.
    #[must_use]
    pub fn retryable(mut self) -> Self {
        if let Self::Http { retryable, .. } = &mut self {
            *retryable = true;
        }
        self
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an internal error with a source error.
    pub fn internal_with_source(
        message: impl Into<String>,
        source: impl Into<anyhow::Error>,
    ) -> Self {
        Self::Internal {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Returns the error category.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::Validation { .. } => ErrorCategory::Validation,
            Self::BadRequest { .. } => ErrorCategory::BadRequest,
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::MethodNotAllowed { .. } => ErrorCategory::MethodNotAllowed,
            Self::Http { .. } => ErrorCategory::Application,
            Self::MalformedEndpoint { .. }
            | Self::UnknownOperation { .. }
            | Self::Configuration { .. }
            | Self::DefinitionCollision { .. }
            | Self::Router(_)
            | Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Http { status, .. } => *status,
            _ => self.category().default_status_code(),
        }
    }

    /// True for errors that indicate a programming or registration bug.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self.category(), ErrorCategory::Internal)
    }

    /// Converts this error to the response envelope.
    #[must_use]
    pub fn to_envelope(&self) -> ErrorEnvelope {
        let (retryable, errors) = match self {
            Self::Validation { errors, .. } => (false, errors.clone()),
            Self::Http {
                retryable, errors, ..
            } => (*retryable, errors.clone()),
            _ => (false, Vec::new()),
        };
        ErrorEnvelope {
            code: self.status_code().as_u16(),
            message: self.to_string(),
            retryable,
            context: ErrorContext { errors },
        }
    }
}

/// One entry in an error context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubError {
    /// Human-readable error message.
    pub message: String,
    /// The failing field, for validation errors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Why the field failed.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reasons: Vec<String>,
}

impl SubError {
    /// A free-form error entry.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            field: None,
            reasons: Vec::new(),
        }
    }

    /// A validation failure for one field.
    #[must_use]
    pub fn for_field(field: impl Into<String>, reasons: Vec<String>) -> Self {
        let field = field.into();
        Self {
            message: format!("Could not validate field: {field}"),
            field: Some(field),
            reasons,
        }
    }
}

/// Structured error detail.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorContext {
    /// Individual errors; omitted when empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<SubError>,
}

/// Serializable error envelope for HTTP responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// The HTTP status code.
    pub code: u16,
    /// Human-readable error message.
    pub message: String,
    /// Whether the client may retry.
    pub retryable: bool,
    /// Structured detail.
    pub context: ErrorContext,
}
