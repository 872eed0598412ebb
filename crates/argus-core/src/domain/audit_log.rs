//! Audit log domain entities
//!
//! An [`AuditLog`] records that an actor did something to a target at a
//! point in time. Records are created once by the audit service and never
//! modified afterwards; the builder methods consume `self` so a value can
//! only be assembled, not edited in place.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::errors::DomainError;
use super::newtypes::{AuditLogId, TraceId};

/// Outcome of the audited event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditStatus {
    /// The event completed successfully
    Success,
    /// The event failed
    Failure,
}

impl AuditStatus {
    /// Stored and wire representation of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditStatus::Success => "SUCCESS",
            AuditStatus::Failure => "FAILURE",
        }
    }

    /// Returns true if the status is a success
    pub fn is_success(&self) -> bool {
        matches!(self, AuditStatus::Success)
    }
}

impl std::fmt::Display for AuditStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuditStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SUCCESS" => Ok(AuditStatus::Success),
            "FAILURE" => Ok(AuditStatus::Failure),
            other => Err(DomainError::InvalidStatus(other.to_string())),
        }
    }
}

/// An immutable audit record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLog {
    id: AuditLogId,
    timestamp: DateTime<Utc>,
    trace_id: Option<TraceId>,
    status: AuditStatus,
    actor_type: String,
    actor_id: String,
    target_type: String,
    target_id: Option<String>,
    event_type: Option<String>,
    event_action: Option<String>,
}

impl AuditLog {
    /// Creates a record with the required fields, a fresh ID and the current time
    ///
    /// # Example
    ///
    /// ```
    /// use argus_core::domain::{AuditLog, AuditStatus};
    ///
    /// let log = AuditLog::new(AuditStatus::Success, "SERVICE", "svc-a", "RESOURCE")
    ///     .with_target_id("doc-1");
    /// assert_eq!(log.target_id(), Some("doc-1"));
    /// assert!(log.trace_id().is_none());
    /// ```
    pub fn new(
        status: AuditStatus,
        actor_type: impl Into<String>,
        actor_id: impl Into<String>,
        target_type: impl Into<String>,
    ) -> Self {
        Self {
            id: AuditLogId::new(),
            timestamp: Utc::now(),
            trace_id: None,
            status,
            actor_type: actor_type.into(),
            actor_id: actor_id.into(),
            target_type: target_type.into(),
            target_id: None,
            event_type: None,
            event_action: None,
        }
    }

    pub fn id(&self) -> AuditLogId {
        self.id
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn trace_id(&self) -> Option<&TraceId> {
        self.trace_id.as_ref()
    }

    pub fn status(&self) -> AuditStatus {
        self.status
    }

    pub fn actor_type(&self) -> &str {
        &self.actor_type
    }

    pub fn actor_id(&self) -> &str {
        &self.actor_id
    }

    pub fn target_type(&self) -> &str {
        &self.target_type
    }

    pub fn target_id(&self) -> Option<&str> {
        self.target_id.as_deref()
    }

    pub fn event_type(&self) -> Option<&str> {
        self.event_type.as_deref()
    }

    pub fn event_action(&self) -> Option<&str> {
        self.event_action.as_deref()
    }

    /// Replaces the generated ID (used when rehydrating a stored record)
    pub fn with_id(mut self, id: AuditLogId) -> Self {
        self.id = id;
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_trace_id(mut self, trace_id: TraceId) -> Self {
        self.trace_id = Some(trace_id);
        self
    }

    pub fn with_target_id(mut self, target_id: impl Into<String>) -> Self {
        self.target_id = non_empty(target_id.into());
        self
    }

    pub fn with_event_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = non_empty(event_type.into());
        self
    }

    pub fn with_event_action(mut self, event_action: impl Into<String>) -> Self {
        self.event_action = non_empty(event_action.into());
        self
    }
}

/// Empty optional values are stored as absent.
fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Raw create request as received from a caller
///
/// Every field is kept as the caller sent it; nothing is trusted until
/// [`Validator::validate`](crate::domain::validation::Validator::validate)
/// has accepted the request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateAuditLogRequest {
    pub timestamp: String,
    pub status: String,
    pub actor_type: String,
    #[serde(alias = "actorID")]
    pub actor_id: String,
    pub target_type: String,
    #[serde(alias = "targetID")]
    pub target_id: Option<String>,
    pub event_type: Option<String>,
    pub event_action: Option<String>,
    #[serde(alias = "traceID")]
    pub trace_id: Option<String>,
}
