//! Enums command - Show the merged vocabulary used for validation

use anyhow::Result;
use clap::Args;

use argus_core::enums::{EnumCategory, EnumRegistry};

use crate::context::AppContext;
use crate::output::{get_formatter, OutputFormat};

#[derive(Debug, Args)]
pub struct EnumsCommand {}

impl EnumsCommand {
    pub async fn execute(&self, app: &AppContext, format: OutputFormat) -> Result<()> {
        let formatter = get_formatter(format);
        let registry = app.registry()?;
        let source = app
            .config
            .enums
            .path
            .as_ref()
            .filter(|p| p.exists())
            .map(|p| p.display().to_string());

        if format.is_json() {
            let mut json = registry_json(&registry);
            json["source"] = serde_json::json!(source);
            formatter.print_json(&json);
            return Ok(());
        }

        match source {
            Some(path) => formatter.success(&format!("Allowed values (defaults + {})", path)),
            None => formatter.success("Allowed values (built-in defaults)"),
        }
        for category in EnumCategory::ALL {
            formatter.info("");
            formatter.info(&format!("{}:", category));
            for value in registry.values(category) {
                formatter.info(&format!("  {}", value));
            }
        }

        Ok(())
    }
}

fn registry_json(registry: &EnumRegistry) -> serde_json::Value {
    let map: serde_json::Map<String, serde_json::Value> = EnumCategory::ALL
        .iter()
        .map(|&category| {
            (
                category.key().to_string(),
                serde_json::json!(registry.values(category)),
            )
        })
        .collect();
    serde_json::Value::Object(map)
}
