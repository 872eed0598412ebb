//! Audit service use case
//!
//! Validates and records audit events, and serves the read paths:
//! filtered paging and trace correlation. The service holds no mutable
//! state, so a single instance can be shared across concurrent callers.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::validation::parse_trace_id;
use crate::domain::{AuditLog, AuditStatus, CreateAuditLogRequest, TraceId, Validator};
use crate::enums::EnumRegistry;
use crate::ports::{AuditLogFilter, AuditLogPage, IAuditRepository};

use super::context::OperationContext;
use super::error::ServiceError;

/// Page size used when a query gives a non-positive limit
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Upper bound for a single page
pub const MAX_PAGE_SIZE: u32 = 1000;

/// Bounds applied to caller-supplied paging values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    pub default_limit: u32,
    pub max_limit: u32,
}

impl PageLimits {
    /// Clamps raw `limit`/`offset` values into a usable page window
    ///
    /// A non-positive limit becomes the default, a limit above the maximum
    /// becomes the maximum, and a negative offset becomes zero.
    pub fn clamp(&self, limit: i64, offset: i64) -> (u32, u32) {
        let max = i64::from(self.max_limit.max(1));
        let limit = if limit <= 0 {
            i64::from(self.default_limit).clamp(1, max)
        } else {
            limit.min(max)
        };
        let offset = offset.clamp(0, i64::from(u32::MAX));
        // both values are within u32 range after clamping
        (limit as u32, offset as u32)
    }
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_PAGE_SIZE,
            max_limit: MAX_PAGE_SIZE,
        }
    }
}

/// Caller-facing query for [`AuditService::get_audit_logs`]
///
/// Filter values are passed through without vocabulary checks. Empty
/// strings are treated the same as absent filters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuditLogQuery {
    pub limit: i64,
    pub offset: i64,
    pub trace_id: Option<String>,
    pub event_type: Option<String>,
    pub event_action: Option<String>,
    pub actor_type: Option<String>,
    pub actor_id: Option<String>,
    pub status: Option<AuditStatus>,
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
}

impl AuditLogQuery {
    pub fn new(limit: i64, offset: i64) -> Self {
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
}

/// Orchestrates validation, persistence and retrieval of audit logs
pub struct AuditService {
    repository: Arc<dyn IAuditRepository>,
    registry: Arc<EnumRegistry>,
    limits: PageLimits,
}

impl AuditService {
    /// Creates a new AuditService
    ///
    /// # Arguments
    ///
    /// * `repository` - Persistence boundary for audit logs
    /// * `registry` - Fully built, shared enum vocabulary
    pub fn new(repository: Arc<dyn IAuditRepository>, registry: Arc<EnumRegistry>) -> Self {
        Self {
            repository,
            registry,
            limits: PageLimits::default(),
        }
    }

    pub fn with_page_limits(mut self, limits: PageLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn registry(&self) -> &EnumRegistry {
        &self.registry
    }

    pub fn page_limits(&self) -> PageLimits {
        self.limits
    }

    /// Validates `request` and persists it as a new audit log
    ///
    /// # Errors
    ///
    /// - [`ServiceError::Validation`] if any rule fails; the repository is
    ///   not called.
    /// - [`ServiceError::Repository`] with the repository error unchanged.
    /// - [`ServiceError::Cancelled`] / [`ServiceError::DeadlineExceeded`]
    ///   if the context finishes first. The insert is abandoned, not rolled
    ///   back: if it had already reached the database the log may have been
    ///   persisted, so look it up before retrying.
    pub async fn create_audit_log(
        &self,
        ctx: &OperationContext,
        request: &CreateAuditLogRequest,
    ) -> Result<AuditLog, ServiceError> {
        let log = Validator::new(&self.registry).validate(request).map_err(|e| {
            tracing::debug!(field = %e.field, error = %e, "Rejected audit log request");
            e
        })?;

        let stored = ctx.run(self.repository.create_audit_log(&log)).await?;

        tracing::info!(
            id = %stored.id(),
            actor_type = stored.actor_type(),
            actor_id = stored.actor_id(),
            target_type = stored.target_type(),
            status = %stored.status(),
            "Recorded audit log"
        );
        Ok(stored)
    }

    /// Returns one page of audit logs matching `query`, oldest first
    ///
    /// The page carries the total number of matches regardless of paging.
    pub async fn get_audit_logs(
        &self,
        ctx: &OperationContext,
        query: &AuditLogQuery,
    ) -> Result<AuditLogPage, ServiceError> {
        let filter = self.build_filter(query);
        let page = ctx.run(self.repository.get_audit_logs(&filter)).await?;

        tracing::debug!(
            limit = filter.limit,
            offset = filter.offset,
            returned = page.logs.len(),
            total = page.total,
            "Queried audit logs"
        );
        Ok(page)
    }

    /// Returns every audit log sharing `trace_id`, ordered by timestamp
    ///
    /// An unknown trace ID yields an empty list.
    pub async fn get_audit_logs_by_trace_id(
        &self,
        ctx: &OperationContext,
        trace_id: &str,
    ) -> Result<Vec<AuditLog>, ServiceError> {
        let trace_id: TraceId = parse_trace_id(trace_id)?;
        let logs = ctx
            .run(self.repository.get_audit_logs_by_trace_id(&trace_id))
            .await?;

        tracing::debug!(trace_id = %trace_id, count = logs.len(), "Queried audit trace");
        Ok(logs)
    }

    fn build_filter(&self, query: &AuditLogQuery) -> AuditLogFilter {
        let (limit, offset) = self.limits.clamp(query.limit, query.offset);

        // Canonical form when the filter is a UUID; passed through otherwise.
        let trace_id = present(&query.trace_id).map(|raw| match raw.parse::<TraceId>() {
            Ok(trace_id) => trace_id.to_string(),
            Err(_) => raw,
        });

        AuditLogFilter {
            limit,
            offset,
            trace_id,
            event_type: present(&query.event_type),
            event_action: present(&query.event_action),
            actor_type: present(&query.actor_type),
            actor_id: present(&query.actor_id),
            status: query.status,
            since: query.since,
            until: query.until,
        }
    }
}

fn present(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.is_empty()).cloned()
}
