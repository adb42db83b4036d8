use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use colored::*;
use devprep_core::execution::SystemShell;
use devprep_core::provisioner::{LoadedRun, Provisioner, ProvisionerConfig};
use devprep_core::results::RunOutcome;
use devprep_core::tasks::ConsoleReporter;

pub async fn execute(config: ProvisionerConfig, force: bool) -> Result<()> {
    let provisioner = match Provisioner::load_for_run(config, force)? {
        LoadedRun::Skipped(sentinel) => {
            println!("{} exists, exiting.", sentinel.path().display());
            return Ok(());
        }
        LoadedRun::Ready(provisioner) => provisioner,
    };

    let guard = provisioner.sentinel();
    let started = Instant::now();
    let shell = Arc::new(SystemShell::from_config(provisioner.config()));
    let result = provisioner
        .run(&guard, shell, Arc::new(ConsoleReporter), force)
        .await;
    let elapsed = started.elapsed().as_secs_f64();

    match result {
        Ok(RunOutcome::Completed(_)) => {
            println!();
            println!("{} {:.1}s", "Done in".green().bold(), elapsed);
            Ok(())
        }
        Ok(RunOutcome::Skipped) => {
            println!("{} exists, exiting.", guard.path().display());
            Ok(())
        }
        Err(err) => {
            eprintln!();
            eprintln!("{} {:.1}s", "Failed after".red().bold(), elapsed);
            Err(err.into())
        }
    }
}
