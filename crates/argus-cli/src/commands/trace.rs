//! Trace command - Show every audit log sharing one trace ID

use anyhow::Result;
use clap::Args;
use tracing::info;

use crate::context::AppContext;
use crate::output::{get_formatter, log_row, OutputFormat, LOG_TABLE_HEADER};

#[derive(Debug, Args)]
pub struct TraceCommand {
    /// Trace ID (UUID)
    pub trace_id: String,
}

impl TraceCommand {
    pub async fn execute(&self, app: &AppContext, format: OutputFormat) -> Result<()> {
        let formatter = get_formatter(format);
        let service = app.service().await?;

        let logs = service
            .get_audit_logs_by_trace_id(&app.operation(), &self.trace_id)
            .await?;
        info!(trace_id = %self.trace_id, count = logs.len(), "Fetched trace");

        if format.is_json() {
            let json = serde_json::json!({
                "traceId": self.trace_id,
                "count": logs.len(),
                "logs": serde_json::to_value(&logs)?,
            });
            formatter.print_json(&json);
            return Ok(());
        }

        if logs.is_empty() {
            formatter.info(&format!("No audit logs found for trace {}.", self.trace_id));
            return Ok(());
        }

        formatter.success(&format!(
            "Trace {} ({} log{})",
            self.trace_id,
            logs.len(),
            if logs.len() == 1 { "" } else { "s" }
        ));
        formatter.info("");
        formatter.info(LOG_TABLE_HEADER);
        for log in &logs {
            formatter.info(&log_row(log));
        }

        Ok(())
    }
}
