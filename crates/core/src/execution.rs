//! Task execution module
//!
//! This module handles the actual execution of tasks including command execution,
//! dependency-ordered scheduling, and progress events.

pub mod command;
pub mod dependencies;
pub mod events;
pub mod scheduler;

pub use command::{CommandExecutor, Shell, SystemShell};
pub use dependencies::group_by_dependency_levels;
pub use events::{EventSink, ExecutionEvent};
pub use scheduler::Scheduler;
