//! Console reporting and task color management
//!
//! This module provides the [`ConsoleReporter`] event sink and consistent
//! task color management for terminal output.

use colored::*;

use crate::configs::tasks::TaskMode;
use crate::execution::events::{EventSink, ExecutionEvent};

/// Get a consistent color for a task name
pub fn get_task_color(task_name: &str) -> Color {
    // Use a simple hash of the task name bytes for consistent colors
    let hash = task_name
        .bytes()
        .fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64));

    // Jewel tones, kept clear of the red/green used for failure and success markers
    let colors = [
        Color::TrueColor {
            r: 147,
            g: 112,
            b: 219,
        }, // Medium slate blue
        Color::TrueColor {
            r: 64,
            g: 224,
            b: 208,
        }, // Turquoise
        Color::TrueColor {
            r: 255,
            g: 140,
            b: 0,
        }, // Dark orange
        Color::TrueColor {
            r: 199,
            g: 21,
            b: 133,
        }, // Medium violet red
        Color::TrueColor {
            r: 72,
            g: 209,
            b: 204,
        }, // Medium turquoise
        Color::TrueColor {
            r: 138,
            g: 43,
            b: 226,
        }, // Blue violet
    ];

    colors[(hash % colors.len() as u64) as usize]
}

fn task_label(task: &str) -> ColoredString {
    format!("[{}]", task).color(get_task_color(task)).bold()
}

/// Prints execution events to stdout, failures to stderr
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleReporter;

impl EventSink for ConsoleReporter {
    fn emit(&self, event: &ExecutionEvent<'_>) {
        match event {
            ExecutionEvent::TaskStarted { task, mode } => {
                let mode = match mode {
                    TaskMode::Parallel => "parallel".bright_black(),
                    TaskMode::Inline => "inline".bright_blue(),
                };
                println!("┌─ {} {} {}", "Starting".bold(), task_label(task), mode);
            }
            ExecutionEvent::CommandStarted { task, command, .. } => {
                println!("{} {} {}", task_label(task), ">".bold(), command);
            }
            ExecutionEvent::TaskCompleted { task, elapsed } => {
                println!(
                    "└─ {} {} {}",
                    "✓".green().bold(),
                    task_label(task),
                    format!("completed in {:.1}s", elapsed.as_secs_f64()).bright_black()
                );
            }
            ExecutionEvent::TaskFailed { task, failure } => {
                eprintln!(
                    "└─ {} {} {}",
                    "✗".red().bold(),
                    task_label(task),
                    failure.to_string().red()
                );
            }
            ExecutionEvent::TaskBlocked { task, blocked_by } => {
                eprintln!(
                    "   {} {} {}",
                    "⊘".yellow().bold(),
                    task_label(task),
                    format!("skipped: '{}' did not complete", blocked_by).yellow()
                );
            }
        }
    }
}
