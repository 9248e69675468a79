/**
 * SERVICE ERRORS - Single error type shared by the evaluator, the inventory
 * service and the HTTP layer.
 *
 * Every failure carries an ErrorKind. The HTTP layer maps the kind to a status
 * code; nothing below it knows about transport.
 */

use crate::store::StoreError;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Stored collection does not exist (expected before the first write)
    NotFound,
    InvalidThreshold,
    /// Stored bytes or request body do not decode as the expected shape
    MalformedData,
    BadRequest,
    Io,
    /// Evaluation succeeded but nothing qualified
    NoInefficientServers,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::InvalidThreshold => "invalid_threshold",
            ErrorKind::MalformedData => "malformed_data",
            ErrorKind::BadRequest => "bad_request",
            ErrorKind::Io => "io",
            ErrorKind::NoInefficientServers => "no_inefficient_servers",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ServiceError {
    pub kind: ErrorKind,
    pub message: String,
}

impl ServiceError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into() }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn invalid_threshold() -> Self {
        Self::new(ErrorKind::InvalidThreshold, "invalid threshold value")
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedData, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::BadRequest, message)
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Io, message)
    }

    pub fn no_inefficient_servers() -> Self {
        Self::new(ErrorKind::NoInefficientServers, "no inefficient servers found as per threshold")
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => Self::not_found("server information not found"),
            other => Self::io(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        Self::malformed(err.to_string())
    }
}
