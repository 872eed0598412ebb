//! Domain entities and business logic
//!
//! This module contains the core domain types for Argus:
//! - Newtypes for audit log and trace identifiers
//! - The immutable `AuditLog` record and the raw create request
//! - Request validation against the enum registry
//! - Domain-specific error types

pub mod audit_log;
pub mod errors;
pub mod newtypes;
pub mod validation;

// Re-export commonly used types
pub use audit_log::{AuditLog, AuditStatus, CreateAuditLogRequest};
pub use errors::{DomainError, ValidationError, ValidationField};
pub use newtypes::{AuditLogId, TraceId};
pub use validation::Validator;
