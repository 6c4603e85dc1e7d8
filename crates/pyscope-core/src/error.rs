//! Error types for pyscope

use thiserror::Error;

/// Main error type for pyscope operations
///
/// Public entry points in the inspector and package crates never surface
/// these; they degrade to empty/not-found value objects instead. Internal
/// fallible helpers and the CLI's target resolution use this type.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Python error: {0}")]
    Python(#[from] pyo3::PyErr),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Introspection error: {0}")]
    Introspection(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid name: {0}")]
    InvalidName(String),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an introspection error
    pub fn introspection(msg: impl Into<String>) -> Self {
        Error::Introspection(msg.into())
    }

    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Error::NotFound(msg.into())
    }

    /// Create an invalid name error
    pub fn invalid_name(msg: impl Into<String>) -> Self {
        Error::InvalidName(msg.into())
    }
}
