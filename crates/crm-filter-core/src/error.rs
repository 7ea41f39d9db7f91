//! Error types for crm-filter.
//!
//! The compiler, assembler and decompiler never fail. These errors belong to
//! the fallible edges around them: decoding payloads, validating conditions
//! against a schema, and talking to the remote query engine.

use thiserror::Error;

/// Result type alias using crm-filter's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for crm-filter operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Saved filter not found
    #[error("Saved filter not found: {0}")]
    SavedFilterNotFound(String),

    /// Field is not part of the entity schema
    #[error("Unknown field '{field}' for entity {entity}")]
    UnknownField { entity: String, field: String },

    /// Operator is not offered for the field's type
    #[error("Operator {operator} is not supported for field '{field}'")]
    UnsupportedOperator { field: String, operator: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// HTTP/network request failed
    #[error("Request error: {0}")]
    Request(String),

    /// Remote query engine answered with a non-success status
    #[error("Remote error ({status}): {message}")]
    Remote { status: u16, message: String },

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Request(e.to_string())
    }
}
