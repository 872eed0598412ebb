//! In-memory implementation of IAuditRepository
//!
//! Keeps records in insertion order behind a lock. Query semantics match
//! [`SqliteAuditRepository`](crate::SqliteAuditRepository): filters come from
//! [`AuditLogFilter::matches`], results are sorted by timestamp with ties in
//! insertion order.

use std::sync::RwLock;

use argus_core::domain::{AuditLog, TraceId};
use argus_core::ports::{AuditLogFilter, AuditLogPage, IAuditRepository};

/// Process-local audit log store
#[derive(Debug, Default)]
pub struct InMemoryAuditRepository {
    logs: RwLock<Vec<AuditLog>>,
}

impl InMemoryAuditRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.logs.read().map(|logs| logs.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Matching records, oldest first
    fn select(&self, keep: impl Fn(&AuditLog) -> bool) -> anyhow::Result<Vec<AuditLog>> {
        let logs = self
            .logs
            .read()
            .map_err(|_| anyhow::anyhow!("Audit log store lock poisoned"))?;

        let mut matched: Vec<AuditLog> = logs.iter().filter(|log| keep(log)).cloned().collect();
        // Stable sort keeps insertion order among equal timestamps.
        matched.sort_by_key(|log| log.timestamp());
        Ok(matched)
    }
}

#[async_trait::async_trait]
impl IAuditRepository for InMemoryAuditRepository {
    async fn create_audit_log(&self, log: &AuditLog) -> anyhow::Result<AuditLog> {
        let mut logs = self
            .logs
            .write()
            .map_err(|_| anyhow::anyhow!("Audit log store lock poisoned"))?;

        if logs.iter().any(|existing| existing.id() == log.id()) {
            anyhow::bail!("Audit log {} already exists", log.id());
        }
        logs.push(log.clone());

        tracing::trace!(id = %log.id(), "Saved audit log");
        Ok(log.clone())
    }

    async fn get_audit_logs(&self, filter: &AuditLogFilter) -> anyhow::Result<AuditLogPage> {
        let matched = self.select(|log| filter.matches(log))?;
        let total = matched.len() as u64;

        let logs = matched
            .into_iter()
            .skip(filter.offset as usize)
            .take(filter.limit as usize)
            .collect();

        Ok(AuditLogPage { logs, total })
    }

    async fn get_audit_logs_by_trace_id(
        &self,
        trace_id: &TraceId,
    ) -> anyhow::Result<Vec<AuditLog>> {
        self.select(|log| log.trace_id() == Some(trace_id))
    }
}
