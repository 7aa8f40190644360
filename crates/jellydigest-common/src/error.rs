//! Common error types used throughout jellydigest.
//!
//! This module covers the failure cases the digest core can signal to its
//! immediate caller: a raw library record missing a required field, a value
//! that cannot be coerced into the expected format, and I/O failures on the
//! watermark file.

/// Common error type for jellydigest.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A raw library record lacks a field required to build a typed record.
    #[error("{kind} record has no {field}")]
    MissingField {
        /// Kind of record being parsed (e.g. "episode").
        kind: &'static str,
        /// Name of the missing field as reported by the library.
        field: &'static str,
    },

    /// A value could not be coerced into the expected format.
    #[error("Format error: {0}")]
    Format(String),

    /// An I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid input was provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Create a new MissingField error.
    pub fn missing(kind: &'static str, field: &'static str) -> Self {
        Self::MissingField { kind, field }
    }

    /// Create a new Format error.
    pub fn format<S: Into<String>>(msg: S) -> Self {
        Self::Format(msg.into())
    }

    /// Create a new InvalidInput error.
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
