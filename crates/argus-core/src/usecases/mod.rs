//! Use cases (interactors) for Argus
//!
//! This module contains the application service that orchestrates the
//! domain validator and the repository port.
//!
//! ## Use Cases
//!
//! - [`AuditService`] - Create audit logs, page through them, and follow a trace

pub mod audit_service;
pub mod context;
pub mod error;

pub use audit_service::{AuditLogQuery, AuditService, PageLimits, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use context::OperationContext;
pub use error::{ErrorKind, ServiceError};
