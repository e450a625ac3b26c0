//! Error types for page builder operations.
//!
//! Document mutators never fail: stale ids and bad geometry are absorbed as
//! no-ops or clamped values. Errors only arise at the boundaries where host
//! input is parsed.

use thiserror::Error;

/// Result type for page builder operations.
pub type BuilderResult<T> = Result<T, BuilderError>;

/// Errors that can occur while parsing host input.
#[derive(Debug, Error)]
pub enum BuilderError {
    /// Unknown element kind name.
    #[error("Unknown element kind: {0}")]
    UnknownKind(String),

    /// Unknown text alignment name.
    #[error("Unknown text alignment: {0}")]
    UnknownAlignment(String),

    /// Unknown device type name.
    #[error("Unknown device type: {0}")]
    UnknownDevice(String),

    /// Element id is not a valid UUID.
    #[error("Invalid element id {id}: {source}")]
    InvalidElementId {
        /// The rejected id text.
        id: String,
        /// Underlying parse failure.
        #[source]
        source: uuid::Error,
    },

    /// Drag source or drop zone tag does not follow the tagging scheme.
    #[error("Unrecognized drag tag: {0}")]
    UnrecognizedTag(String),

    /// Property form field is unknown or its value cannot be coerced.
    #[error("Invalid value for field {field}: {value}")]
    InvalidField {
        /// Form field name.
        field: String,
        /// Raw value from the form.
        value: String,
    },

    /// Snapshot serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
