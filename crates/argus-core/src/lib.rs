//! Argus Core - Audit event validation and query engine
//!
//! This crate contains the hexagonal architecture core with:
//! - **Domain entities** - `AuditLog`, `AuditStatus`, `CreateAuditLogRequest`
//! - **Enum registry** - the merged vocabulary incoming events are checked against
//! - **Use cases** - `AuditService` (create, filtered paging, trace correlation)
//! - **Port definitions** - `IAuditRepository`, implemented by adapter crates
//! - **Configuration** - process settings loaded from YAML
//!
//! # Architecture
//!
//! The domain module holds pure validation logic with no I/O. The enum
//! registry is built once at startup and shared read-only by `Arc`. Ports
//! define trait interfaces that adapter crates implement, and use cases
//! orchestrate domain logic through those ports.

pub mod config;
pub mod domain;
pub mod enums;
pub mod ports;
pub mod usecases;
