use argus_core::domain::AuditLog;

/// Output format selector
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputFormat {
    Human,
    Json,
}

impl OutputFormat {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }

    pub fn is_json(self) -> bool {
        matches!(self, OutputFormat::Json)
    }
}

/// Trait for formatting CLI output
pub trait OutputFormatter {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
    fn info(&self, message: &str);
    fn print_json(&self, value: &serde_json::Value);
}

/// Human-readable output formatter with checkmarks and indentation
pub struct HumanFormatter;

impl OutputFormatter for HumanFormatter {
    fn success(&self, message: &str) {
        println!("\u{2713} {}", message);
    }
    fn error(&self, message: &str) {
        eprintln!("\u{2717} Error: {}", message);
    }
    fn info(&self, message: &str) {
        println!("  {}", message);
    }
    fn print_json(&self, _value: &serde_json::Value) {
        // Human formatter doesn't print JSON
    }
}

/// JSON output formatter
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn success(&self, message: &str) {
        println!(
            "{}",
            serde_json::json!({"success": true, "message": message})
        );
    }
    fn error(&self, message: &str) {
        eprintln!(
            "{}",
            serde_json::json!({"success": false, "error": message})
        );
    }
    fn info(&self, _message: &str) {}
    fn print_json(&self, value: &serde_json::Value) {
        println!(
            "{}",
            serde_json::to_string_pretty(value).unwrap_or_default()
        );
    }
}

pub fn get_formatter(format: OutputFormat) -> Box<dyn OutputFormatter> {
    if format.is_json() {
        Box::new(JsonFormatter)
    } else {
        Box::new(HumanFormatter)
    }
}

/// Header matching [`log_row`]
pub const LOG_TABLE_HEADER: &str =
    "Timestamp                      Status   Actor                    Target                   Event";

/// One table row per audit log
pub fn log_row(log: &AuditLog) -> String {
    let actor = format!("{}:{}", log.actor_type(), log.actor_id());
    let target = match log.target_id() {
        Some(id) => format!("{}:{}", log.target_type(), id),
        None => log.target_type().to_string(),
    };
    let event = match (log.event_type(), log.event_action()) {
        (Some(t), Some(a)) => format!("{t}/{a}"),
        (Some(t), None) => t.to_string(),
        (None, Some(a)) => a.to_string(),
        (None, None) => "-".to_string(),
    };

    format!(
        "{:<30} {:<8} {:<24} {:<24} {}",
        log.timestamp().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
        log.status().as_str(),
        truncate(&actor, 24),
        truncate(&target, 24),
        event
    )
}

/// Multi-line detail view of a single audit log
pub fn log_details(log: &AuditLog) -> Vec<String> {
    let mut lines = vec![
        format!("ID:        {}", log.id()),
        format!("Timestamp: {}", log.timestamp().to_rfc3339()),
        format!("Status:    {}", log.status()),
        format!("Actor:     {} {}", log.actor_type(), log.actor_id()),
        format!(
            "Target:    {} {}",
            log.target_type(),
            log.target_id().unwrap_or("-")
        ),
    ];
    if let Some(event_type) = log.event_type() {
        lines.push(format!("Event:     {}", event_type));
    }
    if let Some(event_action) = log.event_action() {
        lines.push(format!("Action:    {}", event_action));
    }
    if let Some(trace_id) = log.trace_id() {
        lines.push(format!("Trace:     {}", trace_id));
    }
    lines
}

/// Truncate a string to at most `max_len` characters
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
