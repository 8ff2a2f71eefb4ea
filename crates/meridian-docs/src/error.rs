//! Error types for the documentation crate.
//!
//! This module defines errors that can occur while introspecting schemas and
//! assembling a Swagger document.

use meridian_core::MeridianError;
use thiserror::Error;

/// Errors that can occur during documentation generation.
#[derive(Debug, Error)]
pub enum DocsError {
    /// Failed to serialize the document to JSON.
    #[error("Failed to serialize Swagger document: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Two different schemas derive the same definition name.
    #[error("conflicting definitions for type '{type_name}'")]
    DefinitionCollision {
        /// The shared definition name.
        type_name: String,
    },

    /// An operation cannot be placed in the document.
    #[error("Invalid operation '{operation_id}': {reason}")]
    InvalidOperation {
        /// The operation id.
        operation_id: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// Result type for documentation operations.
pub type DocsResult<T> = Result<T, DocsError>;

impl From<DocsError> for MeridianError {
    fn from(err: DocsError) -> Self {
        match err {
            DocsError::DefinitionCollision { type_name } => {
                MeridianError::DefinitionCollision { type_name }
            }
            other => MeridianError::internal_with_source("could not build Swagger document", other),
        }
    }
}
