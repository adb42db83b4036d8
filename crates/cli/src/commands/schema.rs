use anyhow::Result;
use devprep_core::configs::provision::provision_config_schema;

pub fn execute() -> Result<()> {
    println!("{}", provision_config_schema()?);
    Ok(())
}
