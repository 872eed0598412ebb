//! Record command - Validate and store a new audit log
//!
//! The request comes either from flags or, with `--stdin`, from a single
//! JSON object using the camelCase field names of the create request.

use std::io::Read;

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use clap::Args;

use argus_core::domain::CreateAuditLogRequest;

use crate::context::AppContext;
use crate::output::{get_formatter, log_details, OutputFormat};

#[derive(Debug, Args)]
pub struct RecordCommand {
    /// Read the request as JSON from standard input
    ///
    /// Keys are camelCase (`actorId`); `actorID`, `targetID` and `traceID`
    /// are accepted too, but a body may use only one spelling per field.
    #[arg(long, conflicts_with_all = [
        "timestamp", "status", "actor_type", "actor_id", "target_type",
        "target_id", "event_type", "event_action", "trace_id",
    ])]
    pub stdin: bool,

    /// Event time (RFC 3339); defaults to now
    #[arg(long)]
    pub timestamp: Option<String>,

    /// SUCCESS or FAILURE
    #[arg(long)]
    pub status: Option<String>,

    #[arg(long)]
    pub actor_type: Option<String>,

    #[arg(long)]
    pub actor_id: Option<String>,

    #[arg(long)]
    pub target_type: Option<String>,

    #[arg(long)]
    pub target_id: Option<String>,

    #[arg(long)]
    pub event_type: Option<String>,

    #[arg(long)]
    pub event_action: Option<String>,

    /// Correlation ID shared by related logs (UUID)
    #[arg(long)]
    pub trace_id: Option<String>,
}

impl RecordCommand {
    pub async fn execute(&self, app: &AppContext, format: OutputFormat) -> Result<()> {
        let formatter = get_formatter(format);

        let request = if self.stdin {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .context("Failed to read request from stdin")?;
            parse_request(&input)?
        } else {
            self.request_from_flags()
        };

        let service = app.service().await?;
        let log = service.create_audit_log(&app.operation(), &request).await?;

        if format.is_json() {
            formatter.print_json(&serde_json::to_value(&log)?);
        } else {
            formatter.success("Audit log recorded");
            for line in log_details(&log) {
                formatter.info(&line);
            }
        }

        Ok(())
    }

    fn request_from_flags(&self) -> CreateAuditLogRequest {
        let timestamp = self
            .timestamp
            .clone()
            .unwrap_or_else(|| Utc::now().to_rfc3339_opts(SecondsFormat::Nanos, true));

        CreateAuditLogRequest {
            timestamp,
            status: self.status.clone().unwrap_or_default(),
            actor_type: self.actor_type.clone().unwrap_or_default(),
            actor_id: self.actor_id.clone().unwrap_or_default(),
            target_type: self.target_type.clone().unwrap_or_default(),
            target_id: self.target_id.clone(),
            event_type: self.event_type.clone(),
            event_action: self.event_action.clone(),
            trace_id: self.trace_id.clone(),
        }
    }
}

fn parse_request(input: &str) -> Result<CreateAuditLogRequest> {
    serde_json::from_str(input).context("Request on stdin is not a valid JSON audit log request")
}
