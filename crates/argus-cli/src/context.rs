//! Process-wide state shared by every subcommand
//!
//! The configuration is resolved once from the global flags. The enum
//! registry and the storage pool are only built by commands that need them.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;

use argus_core::config::Config;
use argus_core::enums::EnumRegistry;
use argus_core::usecases::{AuditService, OperationContext};
use argus_store::{DatabasePool, PoolOptions, SqliteAuditRepository};

/// Global overrides taken from the command line
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub config: Option<PathBuf>,
    pub enums: Option<PathBuf>,
    pub database: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
}

/// Resolved configuration plus the process cancellation token
pub struct AppContext {
    pub config: Config,
    pub config_path: PathBuf,
    timeout: Option<Duration>,
    cancel: CancellationToken,
}

impl AppContext {
    /// Resolve the configuration from `overrides`
    ///
    /// An explicitly named config file must load; the default location
    /// falls back to built-in defaults when missing.
    pub fn load(overrides: Overrides) -> Result<Self> {
        let (mut config, config_path) = match overrides.config {
            Some(path) => {
                let config = Config::load(&path).with_context(|| {
                    format!("Failed to load configuration from {}", path.display())
                })?;
                (config, path)
            }
            None => {
                let path = Config::default_path();
                (Config::load_or_default(&path), path)
            }
        };

        if let Some(enums) = overrides.enums {
            config.enums.path = Some(enums);
        }
        if let Some(database) = overrides.database {
            config.database.path = database;
        }

        Ok(Self {
            config,
            config_path,
            timeout: overrides.timeout_secs.map(Duration::from_secs),
            cancel: CancellationToken::new(),
        })
    }

    /// Token cancelled on Ctrl-C
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// A fresh operation context honoring cancellation and `--timeout`
    pub fn operation(&self) -> OperationContext {
        let ctx = OperationContext::with_cancellation(self.cancel.clone());
        match self.timeout {
            Some(timeout) => ctx.with_timeout(timeout),
            None => ctx,
        }
    }

    /// Build the merged enum registry; a malformed override file is fatal
    pub fn registry(&self) -> Result<EnumRegistry> {
        let registry = EnumRegistry::load(self.config.enums.path.as_deref())?;
        Ok(registry)
    }

    /// Open the database and wire up the audit service
    pub async fn service(&self) -> Result<AuditService> {
        let errors = self.config.validate();
        if let Some(first) = errors.first() {
            anyhow::bail!("Invalid configuration: {}", first);
        }

        let registry = Arc::new(self.registry()?);

        let options = PoolOptions {
            max_connections: self.config.database.max_connections,
            busy_timeout: Duration::from_secs(self.config.database.busy_timeout_secs),
        };
        let pool = DatabasePool::new(&self.config.database.path, options)
            .await
            .context("Failed to open database")?;
        let repository = Arc::new(SqliteAuditRepository::new(pool.pool().clone()));

        Ok(AuditService::new(repository, registry).with_page_limits(self.config.page_limits()))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_temp(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_flags_override_config_file() {
        let file = write_temp("database:\n  path: /tmp/from-file.db\n");
        let ctx = AppContext::load(Overrides {
            config: Some(file.path().to_path_buf()),
            enums: Some(PathBuf::from("/tmp/enums.yaml")),
            database: Some(PathBuf::from("/tmp/from-flag.db")),
            timeout_secs: None,
        })
        .unwrap();

        assert_eq!(ctx.config.database.path, PathBuf::from("/tmp/from-flag.db"));
        assert_eq!(ctx.config.enums.path, Some(PathBuf::from("/tmp/enums.yaml")));
        assert_eq!(ctx.config_path, file.path());
    }

    #[test]
    fn test_explicit_missing_config_is_an_error() {
        let result = AppContext::load(Overrides {
            config: Some(PathBuf::from("/nonexistent/argus.yaml")),
            ..Default::default()
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_malformed_enum_file_is_fatal() {
        let enums = write_temp("enums:\n  eventTypes: not-a-list\n");
        let ctx = AppContext::load(Overrides {
            enums: Some(enums.path().to_path_buf()),
            ..Default::default()
        })
        .unwrap();
        assert!(ctx.registry().is_err());
    }

    #[tokio::test]
    async fn test_operation_shares_cancellation() {
        let ctx = AppContext::load(Overrides {
            timeout_secs: Some(30),
            ..Default::default()
        })
        .unwrap();
        let op = ctx.operation();
        assert!(op.deadline().is_some());

        ctx.cancellation_token().cancel();
        assert!(op.is_cancelled());
    }

    #[tokio::test]
    async fn test_service_uses_configured_database() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("audit.db");
        let ctx = AppContext::load(Overrides {
            database: Some(db_path.clone()),
            enums: Some(dir.path().join("no-enums.yaml")),
            ..Default::default()
        })
        .unwrap();

        let service = ctx.service().await.unwrap();
        assert_eq!(service.page_limits(), ctx.config.page_limits());
        assert!(db_path.exists());
    }
}
