use anyhow::Result;
use colored::*;
use devprep_core::guard::CompletionGuard;
use devprep_core::provisioner::Provisioner;

pub fn execute(provisioner: &Provisioner) -> Result<()> {
    let guard = provisioner.sentinel();
    if guard.is_done()? {
        println!(
            "{} {}",
            "✓ Provisioned".green().bold(),
            format!("({} exists)", guard.path().display()).bright_black()
        );
    } else {
        println!(
            "{} {}",
            "Not provisioned".yellow().bold(),
            format!("({} missing)", guard.path().display()).bright_black()
        );
    }
    Ok(())
}
