//! List command - Page through stored audit logs
//!
//! Provides the `argus list` CLI command which:
//! 1. Builds an audit log query from filter flags
//! 2. Prints one page of matches, oldest first, with the total match count
//! 3. Supports relative and absolute time parsing for `--since` / `--until`

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use clap::Args;
use tracing::info;

use argus_core::domain::AuditStatus;
use argus_core::usecases::AuditLogQuery;

use crate::context::AppContext;
use crate::output::{get_formatter, log_row, OutputFormat, LOG_TABLE_HEADER};

#[derive(Debug, Args)]
pub struct ListCommand {
    /// Only logs belonging to this trace
    #[arg(long)]
    pub trace_id: Option<String>,

    /// Filter by event type
    #[arg(long)]
    pub event_type: Option<String>,

    /// Filter by event action
    #[arg(long)]
    pub event_action: Option<String>,

    /// Filter by actor type
    #[arg(long)]
    pub actor_type: Option<String>,

    /// Filter by actor ID
    #[arg(long)]
    pub actor_id: Option<String>,

    /// Filter by status (SUCCESS or FAILURE)
    #[arg(long)]
    pub status: Option<AuditStatus>,

    /// Only logs at or after this time (e.g., "1h", "2d", "2024-01-01")
    #[arg(long)]
    pub since: Option<String>,

    /// Only logs before this time (same formats as --since)
    #[arg(long)]
    pub until: Option<String>,

    /// Page size; 0 or less uses the configured default
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub limit: i64,

    /// Number of matching logs to skip
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub offset: i64,
}

impl ListCommand {
    pub async fn execute(&self, app: &AppContext, format: OutputFormat) -> Result<()> {
        let formatter = get_formatter(format);
        let service = app.service().await?;

        let query = self.query()?;
        let page = service
            .get_audit_logs(&app.operation(), &query)
            .await
            .context("Failed to query audit logs")?;

        let (limit, offset) = service.page_limits().clamp(query.limit, query.offset);
        info!(returned = page.logs.len(), total = page.total, "Listed audit logs");

        if format.is_json() {
            let json = serde_json::json!({
                "total": page.total,
                "limit": limit,
                "offset": offset,
                "logs": serde_json::to_value(&page.logs)?,
            });
            formatter.print_json(&json);
            return Ok(());
        }

        if page.logs.is_empty() {
            formatter.info(&format!(
                "No audit logs on this page ({} matching in total).",
                page.total
            ));
            return Ok(());
        }

        let first = u64::from(offset) + 1;
        let last = u64::from(offset) + page.logs.len() as u64;
        formatter.success(&format!(
            "Audit logs {}-{} of {}",
            first, last, page.total
        ));
        formatter.info("");
        formatter.info(LOG_TABLE_HEADER);
        for log in &page.logs {
            formatter.info(&log_row(log));
        }

        if last < page.total {
            formatter.info("");
            formatter.info(&format!("More results available. Use --offset {}.", last));
        }

        Ok(())
    }

    fn query(&self) -> Result<AuditLogQuery> {
        let since = self
            .since
            .as_deref()
            .map(|s| parse_time(s).with_context(|| format!("Invalid --since value: '{}'", s)))
            .transpose()?;
        let until = self
            .until
            .as_deref()
            .map(|s| parse_time(s).with_context(|| format!("Invalid --until value: '{}'", s)))
            .transpose()?;

        Ok(AuditLogQuery {
            limit: self.limit,
            offset: self.offset,
            trace_id: self.trace_id.clone(),
            event_type: self.event_type.clone(),
            event_action: self.event_action.clone(),
            actor_type: self.actor_type.clone(),
            actor_id: self.actor_id.clone(),
            status: self.status,
            since,
            until,
        })
    }
}

/// Parse a time flag into a DateTime<Utc>
///
/// Supports:
/// - Relative: "1h" (1 hour ago), "30m" (30 minutes), "2d" (2 days), "1w" (1 week)
/// - RFC 3339: "2024-01-01T12:00:00Z"
/// - Absolute date: "2024-01-01"
/// - Absolute datetime (UTC): "2024-01-01T12:00:00"
fn parse_time(input: &str) -> Result<DateTime<Utc>> {
    let input = input.trim();

    if let Some(duration) = parse_relative_duration(input) {
        return Ok(Utc::now() - duration);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        let datetime = date
            .and_hms_opt(0, 0, 0)
            .context("Failed to create datetime from date")?;
        return Ok(datetime.and_utc());
    }

    if let Ok(datetime) = NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S") {
        return Ok(datetime.and_utc());
    }

    anyhow::bail!(
        "Could not parse '{}' as a time. Use relative (1h, 30m, 2d, 1w) or absolute (2024-01-01) format.",
        input
    )
}

/// Parse relative duration strings like "1h", "30m", "2d", "1w"
fn parse_relative_duration(input: &str) -> Option<chrono::Duration> {
    if input.len() < 2 {
        return None;
    }

    let (num_str, unit) = input.split_at(input.len() - 1);
    let num: i64 = num_str.parse().ok()?;

    match unit {
        "m" => Some(chrono::Duration::minutes(num)),
        "h" => Some(chrono::Duration::hours(num)),
        "d" => Some(chrono::Duration::days(num)),
        "w" => Some(chrono::Duration::weeks(num)),
        _ => None,
    }
}
