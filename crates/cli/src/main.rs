use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use devprep_core::configs::provision::DEFAULT_CONFIG_PATH;
use devprep_core::provisioner::{Provisioner, ProvisionerConfig};
use devprep_core::ProvisionError;

mod commands;
mod logging;

/// devprep - Provision a development container in dependency order
#[derive(Parser)]
#[command(name = "devprep")]
#[command(about = "Runs a development container's setup tasks in parallel, once")]
#[command(version)]
struct Cli {
    /// Path to the plan file (YAML, or TOML with a .toml extension)
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Override the sentinel path from the plan file
    #[arg(long)]
    sentinel: Option<PathBuf>,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every task, unless a previous run already completed
    Run {
        /// Run even when the sentinel exists
        #[arg(long)]
        force: bool,
    },
    /// Show the launch order without running anything
    Plan,
    /// Show each task with its prerequisites
    Graph,
    /// Report whether provisioning has already completed
    Status,
    /// Remove the sentinel so the next run starts from scratch
    Reset,
    /// Print the JSON schema of the plan file
    Schema,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match execute(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {:#}", "Error:".red().bold(), err);
            ExitCode::from(exit_code(&err))
        }
    }
}

async fn execute(cli: Cli) -> Result<()> {
    let config = ProvisionerConfig {
        config_path: cli.config,
        sentinel_override: cli.sentinel,
    };

    match cli.command {
        // Run checks the sentinel before the plan is validated
        Commands::Run { force } => commands::run::execute(config, force).await,
        Commands::Plan => commands::plan::execute(&Provisioner::load(config)?),
        Commands::Graph => commands::graph::execute(&Provisioner::load(config)?),
        Commands::Status => commands::status::execute(&Provisioner::load(config)?),
        Commands::Reset => commands::reset::execute(&Provisioner::load(config)?),
        Commands::Schema => commands::schema::execute(),
    }
}

/// Failing commands propagate their own exit status
fn exit_code(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<ProvisionError>()
        .map_or(1, ProvisionError::exit_code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use devprep_core::results::{CommandFailure, FailureKind};

    fn command_failure(kind: FailureKind) -> anyhow::Error {
        ProvisionError::Command(CommandFailure {
            task: "install-go".to_string(),
            index: 1,
            command: "tar -xzf go.tar.gz".to_string(),
            kind,
        })
        .into()
    }

    #[test]
    fn test_failing_command_status_becomes_exit_code() {
        assert_eq!(exit_code(&command_failure(FailureKind::ExitCode(3))), 3);
        assert_eq!(exit_code(&command_failure(FailureKind::Terminated)), 1);
    }

    #[test]
    fn test_context_keeps_command_status() {
        let err = command_failure(FailureKind::ExitCode(3)).context("provisioning failed");
        assert_eq!(exit_code(&err), 3);
    }

    #[test]
    fn test_other_errors_exit_with_one() {
        let graph = ProvisionError::Graph("Circular dependency detected: a -> a".to_string());
        assert_eq!(exit_code(&graph.into()), 1);
        assert_eq!(exit_code(&anyhow::anyhow!("unexpected")), 1);
    }
}
