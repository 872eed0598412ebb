//! Domain error types
//!
//! This module defines the error types produced while turning an incoming
//! audit event into a domain record: identifier parsing failures and
//! per-field validation failures.

use std::fmt;

use thiserror::Error;

/// Errors that can occur in domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// ID parsing error
    #[error("Invalid ID format: {0}")]
    InvalidId(String),

    /// Unknown audit status token
    #[error("Invalid status: {0}")]
    InvalidStatus(String),
}

/// The request field a validation rule is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationField {
    Timestamp,
    ActorType,
    ActorId,
    TargetType,
    Status,
    EventType,
    EventAction,
    TraceId,
}

impl ValidationField {
    /// Wire name of the field, as it appears in a create request
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationField::Timestamp => "timestamp",
            ValidationField::ActorType => "actorType",
            ValidationField::ActorId => "actorId",
            ValidationField::TargetType => "targetType",
            ValidationField::Status => "status",
            ValidationField::EventType => "eventType",
            ValidationField::EventAction => "eventAction",
            ValidationField::TraceId => "traceId",
        }
    }
}

impl fmt::Display for ValidationField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rejected create request, naming the first field that failed
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{field}: {message}")]
pub struct ValidationError {
    /// The offending field
    pub field: ValidationField,
    /// Human-readable explanation
    pub message: String,
}

impl ValidationError {
    pub fn new(field: ValidationField, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}
