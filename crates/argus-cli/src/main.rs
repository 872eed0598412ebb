//! Argus CLI - Command-line interface for the Argus audit log
//!
//! Provides commands for:
//! - Recording validated audit logs
//! - Listing and filtering stored logs
//! - Following a trace across related logs
//! - Inspecting the enum vocabulary and configuration

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod context;
mod output;

use argus_core::config::LoggingConfig;
use commands::{
    config::ConfigCommand, enums::EnumsCommand, list::ListCommand, record::RecordCommand,
    trace::TraceCommand,
};
use context::{AppContext, Overrides};
use output::{get_formatter, OutputFormat};

#[derive(Debug, Parser)]
#[command(name = "argus", version, about = "Audit log validation and query tool")]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Use alternate config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Use alternate enum override file
    #[arg(long, global = true)]
    enums: Option<PathBuf>,

    /// Use alternate database file
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    /// Abort storage calls after this many seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Validate and store a new audit log
    Record(RecordCommand),
    /// List stored audit logs, oldest first
    List(ListCommand),
    /// Show every audit log in one trace
    Trace(TraceCommand),
    /// Show the allowed enum values
    Enums(EnumsCommand),
    /// Inspect configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let format = OutputFormat::from_json_flag(cli.json);

    match run(cli, format).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "Command failed");
            get_formatter(format).error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, format: OutputFormat) -> Result<()> {
    let app = AppContext::load(Overrides {
        config: cli.config,
        enums: cli.enums,
        database: cli.database,
        timeout_secs: cli.timeout,
    })?;

    init_tracing(&app.config.logging, cli.verbose);

    let cancel = app.cancellation_token().clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupted, cancelling");
            cancel.cancel();
        }
    });

    match cli.command {
        Commands::Record(cmd) => cmd.execute(&app, format).await,
        Commands::List(cmd) => cmd.execute(&app, format).await,
        Commands::Trace(cmd) => cmd.execute(&app, format).await,
        Commands::Enums(cmd) => cmd.execute(&app, format).await,
        Commands::Config(cmd) => cmd.execute(&app, format).await,
    }
}

/// Logs go to stderr so `--json` output on stdout stays machine-readable.
fn init_tracing(logging: &LoggingConfig, verbose: u8) {
    let level = match verbose {
        0 => logging.level.as_str(),
        1 => "debug",
        _ => "trace",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if logging.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}
