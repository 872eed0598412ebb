//! Create-request validation
//!
//! Rules run in a fixed order and the first failure is reported, so a
//! request with several problems always names the same field. Nothing is
//! built until every rule has passed.

use chrono::{DateTime, Utc};

use super::audit_log::{AuditLog, AuditStatus, CreateAuditLogRequest};
use super::errors::{ValidationError, ValidationField};
use super::newtypes::TraceId;
use crate::enums::{EnumCategory, EnumRegistry};

/// Checks create requests against the enum registry and structural rules
#[derive(Debug, Clone, Copy)]
pub struct Validator<'a> {
    registry: &'a EnumRegistry,
}

impl<'a> Validator<'a> {
    pub fn new(registry: &'a EnumRegistry) -> Self {
        Self { registry }
    }

    /// Validates `request` and builds a new [`AuditLog`] from it
    ///
    /// The returned record carries a freshly generated ID and the request
    /// timestamp converted to UTC. Empty optional fields are stored as absent.
    pub fn validate(&self, request: &CreateAuditLogRequest) -> Result<AuditLog, ValidationError> {
        let timestamp = parse_timestamp(&request.timestamp)?;

        self.require_member(
            ValidationField::ActorType,
            EnumCategory::ActorType,
            &request.actor_type,
        )?;

        if request.actor_id.is_empty() {
            return Err(ValidationError::new(ValidationField::ActorId, "is required"));
        }

        self.require_member(
            ValidationField::TargetType,
            EnumCategory::TargetType,
            &request.target_type,
        )?;

        let status = parse_status(&request.status)?;

        let event_type = optional(&request.event_type);
        if !self.registry.is_valid(EnumCategory::EventType, event_type) {
            return Err(unknown_value(ValidationField::EventType, event_type));
        }

        let event_action = optional(&request.event_action);
        if !self.registry.is_valid(EnumCategory::EventAction, event_action) {
            return Err(unknown_value(ValidationField::EventAction, event_action));
        }

        let trace_id = parse_optional_trace_id(optional(&request.trace_id))?;

        let mut log = AuditLog::new(
            status,
            request.actor_type.as_str(),
            request.actor_id.as_str(),
            request.target_type.as_str(),
        )
        .with_timestamp(timestamp)
        .with_target_id(optional(&request.target_id))
        .with_event_type(event_type)
        .with_event_action(event_action);

        if let Some(trace_id) = trace_id {
            log = log.with_trace_id(trace_id);
        }

        Ok(log)
    }

    fn require_member(
        &self,
        field: ValidationField,
        category: EnumCategory,
        value: &str,
    ) -> Result<(), ValidationError> {
        if value.is_empty() {
            return Err(ValidationError::new(field, "is required"));
        }
        if !self.registry.contains(category, value) {
            return Err(unknown_value(field, value));
        }
        Ok(())
    }
}

/// Parses a trace ID, as used both for create requests and trace lookups
pub fn parse_trace_id(value: &str) -> Result<TraceId, ValidationError> {
    value.parse::<TraceId>().map_err(|_| {
        ValidationError::new(
            ValidationField::TraceId,
            format!("'{value}' is not a valid UUID"),
        )
    })
}

fn parse_optional_trace_id(value: &str) -> Result<Option<TraceId>, ValidationError> {
    if value.is_empty() {
        return Ok(None);
    }
    parse_trace_id(value).map(Some)
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::new(ValidationField::Timestamp, "is required"));
    }
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            ValidationError::new(
                ValidationField::Timestamp,
                format!("'{value}' is not an RFC 3339 date-time: {e}"),
            )
        })
}

fn parse_status(value: &str) -> Result<AuditStatus, ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::new(ValidationField::Status, "is required"));
    }
    value.parse().map_err(|_| {
        ValidationError::new(
            ValidationField::Status,
            format!("'{value}' must be one of SUCCESS, FAILURE"),
        )
    })
}

fn optional(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}

fn unknown_value(field: ValidationField, value: &str) -> ValidationError {
    ValidationError::new(field, format!("'{value}' is not an allowed value"))
}
