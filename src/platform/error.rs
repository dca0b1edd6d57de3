use std::io;
use thiserror::Error;

use crate::execution::CommandError;

/// Result type for platform handler operations
pub type HandlerResult<T> = std::result::Result<T, HandlerError>;

/// Errors that can occur in platform handlers and the factory
#[derive(Error, Debug)]
pub enum HandlerError {
    /// No handler or provider can satisfy the request
    #[error("Unsupported service: {0}")]
    UnsupportedService(String),

    /// Session could not be opened or has been lost
    #[error("Session error: {0}")]
    Session(String),

    /// An operation on the remote/container side failed
    #[error("Remote operation failed: {0}")]
    RemoteOperation(String),

    /// The target descriptor is missing or has a malformed entry
    #[error("Invalid target descriptor: {0}")]
    InvalidDescriptor(String),

    /// Command execution failed before producing an output
    #[error("Command error: {0}")]
    Command(#[from] CommandError),

    /// IO error occurred
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

impl HandlerError {
    /// Create a new unsupported service error
    pub fn unsupported_service(reason: impl Into<String>) -> Self {
        Self::UnsupportedService(reason.into())
    }

    /// Create a new session error
    pub fn session(reason: impl Into<String>) -> Self {
        Self::Session(reason.into())
    }

    /// Create a new remote operation error
    pub fn remote_operation(reason: impl Into<String>) -> Self {
        Self::RemoteOperation(reason.into())
    }

    /// Create a new invalid descriptor error
    pub fn invalid_descriptor(reason: impl Into<String>) -> Self {
        Self::InvalidDescriptor(reason.into())
    }
}

impl From<serde_json::Error> for HandlerError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidDescriptor(err.to_string())
    }
}
