//! Argus Store - Audit log persistence
//!
//! Driven (secondary) adapters implementing the `IAuditRepository` port
//! from `argus-core`:
//!
//! - [`SqliteAuditRepository`] - SQLite storage via sqlx
//! - [`InMemoryAuditRepository`] - Process-local storage for tests and
//!   ephemeral use
//!
//! ## Key Components
//!
//! - [`DatabasePool`] - Connection pool with migration support
//! - [`StoreError`] - Error types for storage operations
//!
//! ## Usage
//!
//! ```no_run
//! use std::path::Path;
//! use argus_store::{DatabasePool, PoolOptions, SqliteAuditRepository};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let pool = DatabasePool::new(Path::new("/var/lib/argus/audit.db"), PoolOptions::default()).await?;
//! let repo = SqliteAuditRepository::new(pool.pool().clone());
//! // Use repo as IAuditRepository...
//! # Ok(())
//! # }
//! ```

pub mod memory;
pub mod pool;
pub mod repository;

pub use memory::InMemoryAuditRepository;
pub use pool::{DatabasePool, PoolOptions};
pub use repository::SqliteAuditRepository;

/// Errors that can occur during storage operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Failed to establish a database connection
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// A database query failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Schema migration failed
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// A stored row could not be turned back into a domain value
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::QueryFailed(e.to_string())
    }
}
