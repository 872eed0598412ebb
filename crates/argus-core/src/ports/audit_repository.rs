//! Audit repository port (driven/secondary port)
//!
//! This module defines the persistence boundary for audit logs: create,
//! filtered paging, and lookup by trace ID.
//!
//! ## Design Notes
//!
//! - Uses `anyhow::Result` because storage errors are adapter-specific
//!   (SQLite, in-memory, etc.) and the service propagates them unchanged.
//! - There are no update or delete operations; records are append-only.
//! - Every query returns records ordered by timestamp ascending, with ties
//!   kept in insertion order.

use chrono::{DateTime, Utc};

use crate::domain::{AuditLog, AuditStatus, TraceId};

/// Filter and paging criteria for [`IAuditRepository::get_audit_logs`]
///
/// All filter fields are optional; when `None`, no filtering is applied for
/// that field. Multiple filters are combined with AND logic. `limit` and
/// `offset` are already clamped by the caller.
///
/// # Example
///
/// ```
/// use argus_core::ports::AuditLogFilter;
///
/// let filter = AuditLogFilter::new(20, 40).with_event_type("MANAGEMENT_EVENT");
/// assert_eq!(filter.limit, 20);
/// assert!(!filter.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuditLogFilter {
    /// Maximum number of records to return
    pub limit: u32,
    /// Number of matching records to skip
    pub offset: u32,
    /// Filter by trace ID (compared as text)
    pub trace_id: Option<String>,
    /// Filter by event type
    pub event_type: Option<String>,
    /// Filter by event action
    pub event_action: Option<String>,
    /// Filter by actor type
    pub actor_type: Option<String>,
    /// Filter by actor ID
    pub actor_id: Option<String>,
    /// Filter by status
    pub status: Option<AuditStatus>,
    /// Only records at or after this instant
    pub since: Option<DateTime<Utc>>,
    /// Only records strictly before this instant
    pub until: Option<DateTime<Utc>>,
}

impl AuditLogFilter {
    /// Creates a filter that matches every record, with the given page window
    pub fn new(limit: u32, offset: u32) -> Self {
        Self {
            limit,
            offset,
            ..Default::default()
        }
    }

    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }

    pub fn with_event_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = Some(event_type.into());
        self
    }

    pub fn with_event_action(mut self, event_action: impl Into<String>) -> Self {
        self.event_action = Some(event_action.into());
        self
    }

    pub fn with_actor_type(mut self, actor_type: impl Into<String>) -> Self {
        self.actor_type = Some(actor_type.into());
        self
    }

    pub fn with_actor_id(mut self, actor_id: impl Into<String>) -> Self {
        self.actor_id = Some(actor_id.into());
        self
    }

    pub fn with_status(mut self, status: AuditStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_since(mut self, since: DateTime<Utc>) -> Self {
        self.since = Some(since);
        self
    }

    pub fn with_until(mut self, until: DateTime<Utc>) -> Self {
        self.until = Some(until);
        self
    }

    /// Returns true if no field filters are set (paging is ignored)
    pub fn is_empty(&self) -> bool {
        self.trace_id.is_none()
            && self.event_type.is_none()
            && self.event_action.is_none()
            && self.actor_type.is_none()
            && self.actor_id.is_none()
            && self.status.is_none()
            && self.since.is_none()
            && self.until.is_none()
    }

    /// Returns true if `log` satisfies every field filter
    ///
    /// Adapters that cannot push filters down to storage use this to keep
    /// the same semantics as the SQL adapter.
    pub fn matches(&self, log: &AuditLog) -> bool {
        fn eq_opt(filter: &Option<String>, value: Option<&str>) -> bool {
            match filter {
                Some(expected) => value == Some(expected.as_str()),
                None => true,
            }
        }

        let trace_id = log.trace_id().map(|t| t.to_string());

        eq_opt(&self.trace_id, trace_id.as_deref())
            && eq_opt(&self.event_type, log.event_type())
            && eq_opt(&self.event_action, log.event_action())
            && eq_opt(&self.actor_type, Some(log.actor_type()))
            && eq_opt(&self.actor_id, Some(log.actor_id()))
            && self.status.map_or(true, |s| s == log.status())
            && self.since.map_or(true, |since| log.timestamp() >= since)
            && self.until.map_or(true, |until| log.timestamp() < until)
    }
}

/// One page of query results plus the total number of matches
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuditLogPage {
    /// Records in this page, oldest first
    pub logs: Vec<AuditLog>,
    /// Number of records matching the filters across all pages
    pub total: u64,
}

/// Port trait for audit log persistence
///
/// ## Implementation Notes
///
/// - `create_audit_log` must be atomic: the record is either fully visible
///   to subsequent reads or not present at all.
/// - Implementations assign nothing; the ID and timestamp come from the
///   service.
#[async_trait::async_trait]
pub trait IAuditRepository: Send + Sync {
    /// Persists a new audit log and returns the stored record
    async fn create_audit_log(&self, log: &AuditLog) -> anyhow::Result<AuditLog>;

    /// Returns one page of matching records and the total match count
    async fn get_audit_logs(&self, filter: &AuditLogFilter) -> anyhow::Result<AuditLogPage>;

    /// Returns every record sharing `trace_id`, ordered by timestamp ascending
    async fn get_audit_logs_by_trace_id(&self, trace_id: &TraceId)
        -> anyhow::Result<Vec<AuditLog>>;
}
