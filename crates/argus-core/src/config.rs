//! Configuration module for Argus.
//!
//! Provides typed configuration structs that map to the YAML configuration file,
//! with loading, validation, defaults, and a builder pattern for programmatic use.
//!
//! The enum vocabulary lives in its own file (see [`crate::enums`]); this
//! configuration only says where to find it.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::usecases::PageLimits;

// ---------------------------------------------------------------------------
// Config struct with sub-sections
// ---------------------------------------------------------------------------

/// Top-level configuration for Argus.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub enums: EnumsConfig,
    pub query: QueryConfig,
    pub logging: LoggingConfig,
}

/// SQLite storage settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    pub path: PathBuf,
    /// Maximum pooled connections.
    pub max_connections: u32,
    /// Seconds to wait on a locked database before failing.
    pub busy_timeout_secs: u64,
}

/// Location of the enum override file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnumsConfig {
    /// Override file merged with the built-in vocabulary. `None` disables overrides.
    pub path: Option<PathBuf>,
}

/// Paging bounds for list queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Page size used when a query gives no usable limit.
    pub default_limit: u32,
    /// Largest page a single query may return.
    pub max_limit: u32,
}

/// Logging / tracing settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: `trace`, `debug`, `info`, `warn`, or `error`.
    pub level: String,
    /// Output format: `text` or `json`.
    pub format: String,
}

// ---------------------------------------------------------------------------
// Config::load()
// ---------------------------------------------------------------------------

impl Config {
    /// Load configuration from a YAML file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Try to load from `path`; fall back to [`Config::default`] on any error.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "Using default configuration");
                Self::default()
            }
        }
    }

    /// Platform-appropriate default path for the configuration file.
    ///
    /// Typically `$XDG_CONFIG_HOME/argus/config.yaml` on Linux.
    pub fn default_path() -> PathBuf {
        config_dir().join("config.yaml")
    }

    /// Paging bounds derived from the `query` section.
    pub fn page_limits(&self) -> PageLimits {
        PageLimits {
            default_limit: self.query.default_limit,
            max_limit: self.query.max_limit,
        }
    }
}

fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("~/.config"))
        .join("argus")
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

impl Default for DatabaseConfig {
    fn default() -> Self {
        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("~/.local/share"))
            .join("argus");
        Self {
            path: data_dir.join("audit.db"),
            max_connections: 5,
            busy_timeout_secs: 5,
        }
    }
}

impl Default for EnumsConfig {
    fn default() -> Self {
        Self {
            path: Some(config_dir().join("enums.yaml")),
        }
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        let limits = PageLimits::default();
        Self {
            default_limit: limits.default_limit,
            max_limit: limits.max_limit,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config::validate()
// ---------------------------------------------------------------------------

/// A single validation error found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigValidationError {
    /// Dotted path to the offending field, e.g. `"query.max_limit"`.
    pub field: String,
    /// Human-readable explanation.
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Valid values for `logging.level`.
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Valid values for `logging.format`.
const VALID_LOG_FORMATS: &[&str] = &["text", "json"];

impl Config {
    /// Validate the configuration and return all errors found.
    ///
    /// An empty vector means the configuration is valid.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();
        let mut push = |field: &str, message: String| {
            errors.push(ConfigValidationError {
                field: field.into(),
                message,
            })
        };

        // --- database ---
        if self.database.path.as_os_str().is_empty() {
            push("database.path", "must not be empty".into());
        }
        if self.database.max_connections == 0 {
            push("database.max_connections", "must be greater than 0".into());
        }

        // --- query ---
        if self.query.default_limit == 0 {
            push("query.default_limit", "must be greater than 0".into());
        }
        if self.query.max_limit == 0 {
            push("query.max_limit", "must be greater than 0".into());
        }
        if self.query.default_limit > self.query.max_limit {
            push(
                "query.default_limit",
                format!(
                    "default_limit ({}) must not exceed max_limit ({})",
                    self.query.default_limit, self.query.max_limit
                ),
            );
        }

        // --- logging ---
        if !VALID_LOG_LEVELS.contains(&self.logging.level.as_str()) {
            push(
                "logging.level",
                format!(
                    "invalid level '{}'; valid options: {}",
                    self.logging.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            );
        }
        if !VALID_LOG_FORMATS.contains(&self.logging.format.as_str()) {
            push(
                "logging.format",
                format!(
                    "invalid format '{}'; valid options: {}",
                    self.logging.format,
                    VALID_LOG_FORMATS.join(", ")
                ),
            );
        }

        errors
    }
}

// ---------------------------------------------------------------------------
// ConfigBuilder
// ---------------------------------------------------------------------------

/// Builder for constructing a [`Config`] programmatically.
///
/// Starts from [`Config::default`] and allows selective overrides.
///
/// # Example
///
/// ```rust
/// use argus_core::config::ConfigBuilder;
/// use std::path::PathBuf;
///
/// let config = ConfigBuilder::new()
///     .database_path(PathBuf::from("/var/lib/argus/audit.db"))
///     .query_default_limit(50)
///     .logging_level("debug")
///     .build();
/// assert_eq!(config.query.default_limit, 50);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder initialised with [`Config::default`] values.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    // --- database ---

    pub fn database_path(mut self, path: PathBuf) -> Self {
        self.config.database.path = path;
        self
    }

    pub fn database_max_connections(mut self, n: u32) -> Self {
        self.config.database.max_connections = n;
        self
    }

    pub fn database_busy_timeout_secs(mut self, seconds: u64) -> Self {
        self.config.database.busy_timeout_secs = seconds;
        self
    }

    // --- enums ---

    pub fn enums_path(mut self, path: Option<PathBuf>) -> Self {
        self.config.enums.path = path;
        self
    }

    // --- query ---

    pub fn query_default_limit(mut self, n: u32) -> Self {
        self.config.query.default_limit = n;
        self
    }

    pub fn query_max_limit(mut self, n: u32) -> Self {
        self.config.query.max_limit = n;
        self
    }

    // --- logging ---

    pub fn logging_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    pub fn logging_format(mut self, format: impl Into<String>) -> Self {
        self.config.logging.format = format.into();
        self
    }

    // --- build ---

    /// Consume the builder and return the finished [`Config`].
    pub fn build(self) -> Config {
        self.config
    }

    /// Build and validate in one step. Returns `Err` with the list of
    /// validation errors if the configuration is invalid.
    pub fn build_validated(self) -> Result<Config, Vec<ConfigValidationError>> {
        let config = self.build();
        let errors = config.validate();
        if errors.is_empty() {
            Ok(config)
        } else {
            Err(errors)
        }
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    // -- Defaults --

    #[test]
    fn default_config_has_sensible_values() {
        let cfg = Config::default();
        assert!(cfg.database.path.ends_with("argus/audit.db"));
        assert_eq!(cfg.database.max_connections, 5);
        assert_eq!(cfg.database.busy_timeout_secs, 5);
        assert!(cfg.enums.path.as_ref().unwrap().ends_with("argus/enums.yaml"));
        assert_eq!(cfg.query.default_limit, 100);
        assert_eq!(cfg.query.max_limit, 1000);
        assert_eq!(cfg.logging.level, "info");
        assert_eq!(cfg.logging.format, "text");
    }

    #[test]
    fn default_config_passes_validation() {
        let errors = Config::default().validate();
        assert!(errors.is_empty(), "unexpected validation errors: {errors:?}");
    }

    // -- Loading --

    #[test]
    fn load_from_yaml_file() {
        let yaml = r#"
database:
  path: /tmp/argus-test.db
  max_connections: 2
  busy_timeout_secs: 10
enums:
  path: /etc/argus/enums.yaml
query:
  default_limit: 20
  max_limit: 200
logging:
  level: debug
  format: json
"#;
        let mut tmp = tempfile::NamedTempFile::new().expect("create temp file");
        tmp.write_all(yaml.as_bytes()).unwrap();
        tmp.flush().unwrap();

        let cfg = Config::load(tmp.path()).expect("load config");
        assert_eq!(cfg.database.path, PathBuf::from("/tmp/argus-test.db"));
        assert_eq!(cfg.database.max_connections, 2);
        assert_eq!(cfg.database.busy_timeout_secs, 10);
        assert_eq!(cfg.enums.path, Some(PathBuf::from("/etc/argus/enums.yaml")));
        assert_eq!(cfg.query.default_limit, 20);
        assert_eq!(cfg.query.max_limit, 200);
        assert_eq!(cfg.logging.level, "debug");
        assert_eq!(cfg.logging.format, "json");
    }

    #[test]
    fn load_partial_yaml_fills_defaults() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"query:\n  max_limit: 300\nenums:\n  path: null\n")
            .unwrap();
        tmp.flush().unwrap();

        let cfg = Config::load(tmp.path()).unwrap();
        assert_eq!(cfg.query.max_limit, 300);
        assert_eq!(cfg.query.default_limit, 100);
        assert!(cfg.enums.path.is_none());
        assert_eq!(cfg.logging, LoggingConfig::default());
    }

    #[test]
    fn load_missing_file_errors_and_load_or_default_recovers() {
        let path = Path::new("/nonexistent/argus/config.yaml");
        assert!(Config::load(path).is_err());
        assert_eq!(Config::load_or_default(path), Config::default());
    }

    #[test]
    fn default_path_is_under_argus() {
        assert!(Config::default_path().ends_with("argus/config.yaml"));
    }

    // -- Validation --

    #[test]
    fn validation_reports_every_problem() {
        let cfg = ConfigBuilder::new()
            .database_max_connections(0)
            .query_default_limit(500)
            .query_max_limit(100)
            .logging_level("verbose")
            .logging_format("xml")
            .build();

        let fields: Vec<_> = cfg.validate().into_iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                "database.max_connections",
                "query.default_limit",
                "logging.level",
                "logging.format",
            ]
        );
    }

    #[test]
    fn validation_error_display() {
        let err = ConfigValidationError {
            field: "query.max_limit".into(),
            message: "must be greater than 0".into(),
        };
        assert_eq!(err.to_string(), "query.max_limit: must be greater than 0");
    }

    // -- Builder --

    #[test]
    fn builder_overrides_and_validates() {
        let cfg = ConfigBuilder::new()
            .database_path(PathBuf::from("/tmp/a.db"))
            .database_busy_timeout_secs(1)
            .enums_path(None)
            .query_default_limit(10)
            .query_max_limit(20)
            .build_validated()
            .unwrap();

        assert_eq!(cfg.database.path, PathBuf::from("/tmp/a.db"));
        assert!(cfg.enums.path.is_none());
        assert_eq!(
            cfg.page_limits(),
            PageLimits {
                default_limit: 10,
                max_limit: 20
            }
        );

        let errors = ConfigBuilder::new().query_max_limit(0).build_validated().unwrap_err();
        assert!(errors.iter().any(|e| e.field == "query.max_limit"));
    }
}
