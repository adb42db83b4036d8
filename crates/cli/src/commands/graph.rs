use anyhow::Result;
use colored::*;
use devprep_core::provisioner::Provisioner;

pub fn execute(provisioner: &Provisioner) -> Result<()> {
    println!("{}", "Task Dependency Graph:".bold().underline());

    let graph = provisioner.graph();
    if graph.is_empty() {
        println!("No tasks defined");
        return Ok(());
    }

    for task in graph.tasks() {
        println!("{}", task.name.blue().bold());
        if let Some(description) = &task.description {
            println!("  {}", description.dimmed());
        }

        if !task.prerequisites.is_empty() {
            println!(
                "  {} {}",
                "depends on:".dimmed(),
                task.prerequisites.join(", ")
            );
        } else {
            println!("  {}", "no dependencies".dimmed());
        }
        println!(
            "  {} {}",
            "commands:".dimmed(),
            task.commands.len()
        );
        println!();
    }

    Ok(())
}
