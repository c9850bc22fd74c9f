//! Error types for the revision model
//!
//! This module defines the error type shared by every part of the crate.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! Two classes of failure live here:
//! - Recoverable outcomes the caller is expected to inspect
//!   (`InvalidBody`, `MalformedRevId`, `SerializationError`, `Limit`)
//! - Contract violations (`ContractViolation`), which mark a caller-side bug.
//!   Operations that detect one build nothing and return immediately.

use crate::limits::LimitError;
use crate::revision::RevIdError;
use std::io;
use thiserror::Error;

/// Result type alias for revision model operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the revision model
#[derive(Debug, Error)]
pub enum Error {
    /// Body holds neither a decoded mapping nor encoded bytes
    #[error("Invalid body: neither properties nor JSON are available")]
    InvalidBody,

    /// Encoded body decoded to something other than a JSON object
    #[error("Body JSON is not an object (found {0})")]
    NotAnObject(&'static str),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Revision identifier does not match `<generation>-<digest>`
    #[error("Malformed revision ID: {0}")]
    MalformedRevId(#[from] RevIdError),

    /// Caller broke an operation's precondition
    #[error("Contract violation: {0}")]
    ContractViolation(String),

    /// Body exceeds a configured limit
    #[error("Limit exceeded: {0}")]
    Limit(#[from] LimitError),

    /// Configuration could not be parsed or is inconsistent
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// I/O error (reading configuration files)
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
}

impl Error {
    /// Build a contract violation error
    pub fn contract(message: impl Into<String>) -> Self {
        Error::ContractViolation(message.into())
    }

    /// Whether this error marks a programming error rather than bad input
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, Error::ContractViolation(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::SerializationError(e.to_string())
    }
}
