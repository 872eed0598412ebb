//! Config command - Inspect the Argus configuration
//!
//! Provides the `argus config` CLI command which:
//! 1. Shows the effective configuration (YAML or JSON), flags applied
//! 2. Validates the configuration and the enum override file

use anyhow::{Context, Result};
use clap::Subcommand;
use tracing::info;

use crate::context::AppContext;
use crate::output::{get_formatter, OutputFormat};

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display the effective configuration
    Show,
    /// Validate the configuration and enum override file
    Validate,
}

impl ConfigCommand {
    pub async fn execute(&self, app: &AppContext, format: OutputFormat) -> Result<()> {
        match self {
            ConfigCommand::Show => execute_show(app, format),
            ConfigCommand::Validate => execute_validate(app, format),
        }
    }
}

fn execute_show(app: &AppContext, format: OutputFormat) -> Result<()> {
    let formatter = get_formatter(format);

    info!(config_path = %app.config_path.display(), "Showing configuration");

    if format.is_json() {
        let json = serde_json::to_value(&app.config)
            .context("Failed to serialize configuration to JSON")?;
        formatter.print_json(&json);
    } else {
        let origin = if app.config_path.exists() {
            app.config_path.display().to_string()
        } else {
            "defaults".to_string()
        };
        formatter.success(&format!("Configuration ({})", origin));
        formatter.info("");

        let yaml = serde_yaml::to_string(&app.config)
            .context("Failed to serialize configuration to YAML")?;
        for line in yaml.lines() {
            formatter.info(line);
        }
    }

    Ok(())
}

fn execute_validate(app: &AppContext, format: OutputFormat) -> Result<()> {
    let formatter = get_formatter(format);

    info!(config_path = %app.config_path.display(), "Validating configuration");

    let errors = collect_errors(app);

    if format.is_json() {
        let json = serde_json::json!({
            "valid": errors.is_empty(),
            "config_path": app.config_path.display().to_string(),
            "errors": errors,
        });
        formatter.print_json(&json);
    } else if errors.is_empty() {
        formatter.success("Configuration is valid");
        formatter.info(&format!("File: {}", app.config_path.display()));
    } else {
        formatter.error(&format!(
            "Configuration has {} error{}:",
            errors.len(),
            if errors.len() == 1 { "" } else { "s" }
        ));
        formatter.info(&format!("File: {}", app.config_path.display()));
        formatter.info("");
        for error in &errors {
            formatter.info(&format!("  {}", error));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        anyhow::bail!("configuration is invalid")
    }
}

/// Every problem with the config fields plus a malformed enum file, if any
fn collect_errors(app: &AppContext) -> Vec<String> {
    let mut errors: Vec<String> = app.config.validate().iter().map(|e| e.to_string()).collect();
    if let Err(e) = app.registry() {
        errors.push(format!("enums.path: {}", e));
    }
    errors
}
