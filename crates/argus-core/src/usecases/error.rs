//! Error type returned by the audit service

use thiserror::Error;

use crate::domain::ValidationError;

/// Caller-visible classification of a [`ServiceError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The input was rejected; nothing was persisted
    Validation,
    /// Storage failure, cancellation, or deadline
    Internal,
}

/// Errors returned by [`AuditService`](super::AuditService) operations
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Malformed or disallowed input
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Failure reported by the repository, passed through unchanged
    #[error(transparent)]
    Repository(anyhow::Error),

    /// The operation context was cancelled before the repository call finished
    #[error("Operation cancelled")]
    Cancelled,

    /// The operation context deadline passed before the repository call finished
    #[error("Operation deadline exceeded")]
    DeadlineExceeded,
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::Validation(_) => ErrorKind::Validation,
            ServiceError::Repository(_)
            | ServiceError::Cancelled
            | ServiceError::DeadlineExceeded => ErrorKind::Internal,
        }
    }

    /// Returns true if the input was rejected by validation
    pub fn is_validation_error(&self) -> bool {
        self.kind() == ErrorKind::Validation
    }

    /// The validation failure, if this is one
    pub fn validation_error(&self) -> Option<&ValidationError> {
        match self {
            ServiceError::Validation(e) => Some(e),
            _ => None,
        }
    }
}
