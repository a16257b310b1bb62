//! stagekeep CLI - rehearse version gates and retention cleanup
//!
//! The CLI drives the lifecycle orchestrator against a stage snapshot file
//! (JSON or YAML) instead of a live API gateway:
//! - `validate` gates a candidate version against the latest deployed one
//! - `plan` shows which versions the retention window keeps and retires
//! - `cleanup` retires the old versions and writes the survivors back

#![deny(unsafe_code)]

use clap::{Parser, Subcommand};
use std::ffi::OsString;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod error;
mod snapshot;

pub mod output;

use commands::{cleanup, plan, validate, Workspace};
pub use config::CliConfig;
pub use error::{CliError, CliResult};
pub use snapshot::StageSnapshot;

/// stagekeep CLI application
#[derive(Parser)]
#[command(name = "stagekeep")]
#[command(about = "stagekeep - versioned stage retention for API gateways", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "STAGEKEEP_CONFIG")]
    config: Option<String>,

    /// Stage snapshot file (JSON or YAML)
    #[arg(short = 'f', long, env = "STAGEKEEP_SNAPSHOT")]
    snapshot: Option<PathBuf>,

    /// Service name
    #[arg(long, env = "STAGEKEEP_SERVICE")]
    service: Option<String>,

    /// Deployment stage
    #[arg(long, env = "STAGEKEEP_STAGE")]
    stage: Option<String>,

    /// Number of versions to keep (overrides the config file)
    #[arg(short, long, allow_negative_numbers = true)]
    retain: Option<i64>,

    /// Output format (table, json, yaml)
    #[arg(short, long, default_value = "table")]
    output: output::OutputFormat,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Check that a candidate version is newer than every deployed one
    Validate {
        /// Candidate version (overrides the config file)
        #[arg(long)]
        candidate: Option<String>,
    },

    /// Show which versions would be kept and retired
    Plan,

    /// Retire versions outside the retention window
    Cleanup {
        /// Report what would be retired without deleting anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Show the resolved configuration
    Config,
}

/// Run using the current process arguments.
pub async fn run() -> CliResult<()> {
    run_with_args(std::env::args_os()).await
}

/// Run using the provided argument iterator.
pub async fn run_with_args<I, T>(args: I) -> CliResult<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::parse_from(args);

    // Logs go to stderr so json/yaml output stays parseable
    let filter = if cli.verbose { "debug" } else { "info" };
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .try_init();

    let mut config = CliConfig::load(cli.config.as_deref())?;
    if let Some(retain) = cli.retain {
        config.lifecycle.retention_count = Some(retain);
    }
    let service = cli.service.or(config.service.clone());
    let stage = cli.stage.or(config.stage.clone());

    if let Commands::Config = cli.command {
        return show_config(&config, service, stage, cli.output);
    }

    let path = commands::snapshot_path(cli.snapshot, config.snapshot.clone())?;
    let workspace = Workspace::open(&path, service, stage)?;
    let lifecycle = config.lifecycle;

    match cli.command {
        Commands::Validate { candidate } => {
            validate::execute(candidate, lifecycle, &workspace, cli.output).await
        }
        Commands::Plan => plan::execute(lifecycle, &workspace, cli.output).await,
        Commands::Cleanup { dry_run } => {
            cleanup::execute(dry_run, lifecycle, &workspace, cli.output).await
        }
        Commands::Config => Ok(()),
    }
}

fn show_config(
    config: &CliConfig,
    service: Option<String>,
    stage: Option<String>,
    format: output::OutputFormat,
) -> CliResult<()> {
    let resolved = CliConfig {
        service,
        stage,
        ..config.clone()
    };
    match format {
        output::OutputFormat::Table => {
            println!("Service: {}", resolved.service.as_deref().unwrap_or("-"));
            println!("Stage: {}", resolved.stage.as_deref().unwrap_or("-"));
            println!(
                "Snapshot: {}",
                resolved
                    .snapshot
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "-".into())
            );
            println!("Lifecycle: {:?}", resolved.lifecycle);
            Ok(())
        }
        _ => output::print_single(&resolved, format),
    }
}
