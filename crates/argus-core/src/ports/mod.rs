//! Port definitions (hexagonal architecture interfaces)
//!
//! Ports are interfaces that the domain core depends on, but whose
//! implementations live in adapter crates.
//!
//! ## Ports Overview
//!
//! - [`IAuditRepository`] - Append-only persistence and querying of audit logs

pub mod audit_repository;

pub use audit_repository::{AuditLogFilter, AuditLogPage, IAuditRepository};
