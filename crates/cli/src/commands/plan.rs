use anyhow::Result;
use colored::*;
use devprep_core::provisioner::Provisioner;
use devprep_core::tasks::get_task_color;

pub fn execute(provisioner: &Provisioner) -> Result<()> {
    let name = provisioner.config().name.as_deref().unwrap_or("provisioning plan");
    println!("{} {}", "Execution plan for".bold(), name.cyan());

    let plan = provisioner.plan();
    if plan.levels.is_empty() {
        println!("  {}", "No tasks defined".dimmed());
        return Ok(());
    }

    println!("\n{}:", "Launch order".bold());
    for (i, level) in plan.levels.iter().enumerate() {
        let tasks = level
            .iter()
            .map(|task| {
                let label = task.color(get_task_color(task)).to_string();
                if plan.inline_tasks.contains(task) {
                    format!("{} {}", label, "(inline)".bright_blue())
                } else {
                    label
                }
            })
            .collect::<Vec<_>>()
            .join(", ");
        println!("  {}. {}", i + 1, tasks);
    }

    println!(
        "\n{} {}",
        "Sentinel:".bright_black(),
        provisioner.sentinel().path().display()
    );
    Ok(())
}
