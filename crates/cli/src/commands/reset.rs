use anyhow::Result;
use devprep_core::guard::CompletionGuard;
use devprep_core::provisioner::Provisioner;

pub fn execute(provisioner: &Provisioner) -> Result<()> {
    let guard = provisioner.sentinel();
    if guard.reset()? {
        println!("Removed {}", guard.path().display());
    } else {
        println!("{} does not exist, nothing to reset.", guard.path().display());
    }
    Ok(())
}
