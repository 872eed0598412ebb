//! SQLite implementation of IAuditRepository
//!
//! This module provides the concrete SQLite-based implementation of the
//! audit repository port defined in argus-core. It handles domain type
//! conversion and SQL query construction.
//!
//! ## Type Mapping
//!
//! | Domain Type          | SQL Type | Strategy                                         |
//! |----------------------|----------|--------------------------------------------------|
//! | AuditLogId, TraceId  | TEXT     | UUID string via `.to_string()` / `FromStr`       |
//! | DateTime<Utc>        | TEXT     | RFC 3339, nanoseconds, `Z` suffix (fixed width)  |
//! | AuditStatus          | TEXT     | `SUCCESS` / `FAILURE` via `as_str()` / `FromStr` |
//! | Optional strings     | TEXT     | `NULL` when absent                               |

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use argus_core::domain::{AuditLog, AuditLogId, AuditStatus, TraceId};
use argus_core::ports::{AuditLogFilter, AuditLogPage, IAuditRepository};

use crate::StoreError;

/// SQLite-based implementation of the audit repository port
///
/// All operations are performed through a connection pool for concurrency.
pub struct SqliteAuditRepository {
    pool: SqlitePool,
}

impl SqliteAuditRepository {
    /// Creates a new repository instance with the given connection pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

// ============================================================================
// Helper functions for type conversion
// ============================================================================

/// Format a timestamp so that lexical order equals chronological order
fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            StoreError::SerializationError(format!("Failed to parse datetime '{}': {}", s, e))
        })
}

/// Reconstruct an AuditLog from a database row
fn audit_log_from_row(row: &SqliteRow) -> Result<AuditLog, StoreError> {
    let id_str: String = row.get("id");
    let timestamp_str: String = row.get("timestamp");
    let trace_id_str: Option<String> = row.get("trace_id");
    let status_str: String = row.get("status");
    let actor_type: String = row.get("actor_type");
    let actor_id: String = row.get("actor_id");
    let target_type: String = row.get("target_type");
    let target_id: Option<String> = row.get("target_id");
    let event_type: Option<String> = row.get("event_type");
    let event_action: Option<String> = row.get("event_action");

    let id: AuditLogId = id_str.parse().map_err(|e| {
        StoreError::SerializationError(format!("Invalid audit log id '{}': {}", id_str, e))
    })?;
    let status: AuditStatus = status_str.parse().map_err(|e| {
        StoreError::SerializationError(format!("Invalid status '{}': {}", status_str, e))
    })?;

    let mut log = AuditLog::new(status, actor_type, actor_id, target_type)
        .with_id(id)
        .with_timestamp(parse_datetime(&timestamp_str)?);

    if let Some(raw) = trace_id_str {
        let trace_id: TraceId = raw.parse().map_err(|e| {
            StoreError::SerializationError(format!("Invalid trace id '{}': {}", raw, e))
        })?;
        log = log.with_trace_id(trace_id);
    }
    if let Some(target_id) = target_id {
        log = log.with_target_id(target_id);
    }
    if let Some(event_type) = event_type {
        log = log.with_event_type(event_type);
    }
    if let Some(event_action) = event_action {
        log = log.with_event_action(event_action);
    }

    Ok(log)
}

/// Build the shared `WHERE` clause and its bind values for a filter
fn where_clause(filter: &AuditLogFilter) -> (String, Vec<String>) {
    let mut sql = String::from(" WHERE 1=1");
    let mut binds: Vec<String> = Vec::new();

    let text_filters = [
        ("trace_id", &filter.trace_id),
        ("event_type", &filter.event_type),
        ("event_action", &filter.event_action),
        ("actor_type", &filter.actor_type),
        ("actor_id", &filter.actor_id),
    ];
    for (column, value) in text_filters {
        if let Some(value) = value {
            sql.push_str(&format!(" AND {column} = ?"));
            binds.push(value.clone());
        }
    }

    if let Some(status) = filter.status {
        sql.push_str(" AND status = ?");
        binds.push(status.as_str().to_string());
    }

    if let Some(ref since) = filter.since {
        sql.push_str(" AND timestamp >= ?");
        binds.push(format_datetime(since));
    }

    if let Some(ref until) = filter.until {
        sql.push_str(" AND timestamp < ?");
        binds.push(format_datetime(until));
    }

    (sql, binds)
}

fn rows_to_logs(rows: &[SqliteRow]) -> Result<Vec<AuditLog>, StoreError> {
    rows.iter().map(audit_log_from_row).collect()
}

// ============================================================================
// IAuditRepository implementation
// ============================================================================

#[async_trait::async_trait]
impl IAuditRepository for SqliteAuditRepository {
    async fn create_audit_log(&self, log: &AuditLog) -> anyhow::Result<AuditLog> {
        let id = log.id().to_string();
        let timestamp = format_datetime(&log.timestamp());
        let trace_id = log.trace_id().map(|t| t.to_string());

        sqlx::query(
            "INSERT INTO audit_logs \
             (id, timestamp, trace_id, status, actor_type, actor_id, \
              target_type, target_id, event_type, event_action) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&timestamp)
        .bind(&trace_id)
        .bind(log.status().as_str())
        .bind(log.actor_type())
        .bind(log.actor_id())
        .bind(log.target_type())
        .bind(log.target_id())
        .bind(log.event_type())
        .bind(log.event_action())
        .execute(&self.pool)
        .await?;

        tracing::trace!(id = %id, "Saved audit log");
        Ok(log.clone())
    }

    async fn get_audit_logs(&self, filter: &AuditLogFilter) -> anyhow::Result<AuditLogPage> {
        let (where_sql, binds) = where_clause(filter);

        // Count and page read from the same snapshot.
        let mut tx = self.pool.begin().await?;

        let count_sql = format!("SELECT COUNT(*) FROM audit_logs{where_sql}");
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        for bind in &binds {
            count_query = count_query.bind(bind);
        }
        let total = count_query.fetch_one(&mut *tx).await?;

        let page_sql = format!(
            "SELECT * FROM audit_logs{where_sql} \
             ORDER BY timestamp ASC, rowid ASC LIMIT ? OFFSET ?"
        );
        let mut page_query = sqlx::query(&page_sql);
        for bind in &binds {
            page_query = page_query.bind(bind);
        }
        let rows = page_query
            .bind(i64::from(filter.limit))
            .bind(i64::from(filter.offset))
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;

        let logs = rows_to_logs(&rows)?;
        tracing::trace!(returned = logs.len(), total, "Fetched audit log page");

        Ok(AuditLogPage {
            logs,
            total: u64::try_from(total).unwrap_or_default(),
        })
    }

    async fn get_audit_logs_by_trace_id(
        &self,
        trace_id: &TraceId,
    ) -> anyhow::Result<Vec<AuditLog>> {
        let trace_id_str = trace_id.to_string();

        let rows = sqlx::query(
            "SELECT * FROM audit_logs WHERE trace_id = ? \
             ORDER BY timestamp ASC, rowid ASC",
        )
        .bind(&trace_id_str)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows_to_logs(&rows)?)
    }
}
