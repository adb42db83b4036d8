//! Result types for provisioning runs
//!
//! This module contains the typed outcomes produced by the command runner and
//! the scheduler, providing a centralized location for output structures.

use std::fmt;
use std::time::Duration;

use crate::types::{ProvisionError, ProvisionResult};

/// Why a single command did not succeed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    /// The command ran and exited with a non-zero status
    ExitCode(i32),
    /// The command was terminated without an exit status (e.g. by a signal)
    Terminated,
    /// The shell could not be started at all
    Spawn(String),
}

/// The first failing command of a task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandFailure {
    pub task: String,
    /// Zero-based position of the command within its task
    pub index: usize,
    pub command: String,
    pub kind: FailureKind,
}

impl CommandFailure {
    /// Exit status the whole process should report for this failure
    pub fn exit_code(&self) -> u8 {
        match self.kind {
            FailureKind::ExitCode(code) => u8::try_from(code.clamp(1, 255)).unwrap_or(1),
            FailureKind::Terminated | FailureKind::Spawn(_) => 1,
        }
    }
}

impl fmt::Display for CommandFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match &self.kind {
            FailureKind::ExitCode(code) => format!("exited with status {}", code),
            FailureKind::Terminated => "was terminated without an exit status".to_string(),
            FailureKind::Spawn(message) => format!("could not be started: {}", message),
        };
        write!(
            f,
            "Task '{}' failed: command #{} '{}' {}",
            self.task,
            self.index + 1,
            self.command,
            reason
        )
    }
}

/// Lifecycle state of a task within one scheduler run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Pending,
    Running,
    Completed,
    Failed,
    /// A prerequisite failed (or was itself blocked); never launched
    Blocked,
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TaskState::Pending => "pending",
            TaskState::Running => "running",
            TaskState::Completed => "completed",
            TaskState::Failed => "failed",
            TaskState::Blocked => "blocked",
        };
        f.write_str(label)
    }
}

/// Final outcome of one task
#[derive(Debug, Clone)]
pub struct TaskOutcome {
    pub name: String,
    pub state: TaskState,
    pub elapsed: Duration,
    pub failure: Option<CommandFailure>,
}

/// Outcome of a full scheduler run, in task completion order
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub outcomes: Vec<TaskOutcome>,
    pub elapsed: Duration,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.outcomes
            .iter()
            .all(|outcome| outcome.state == TaskState::Completed)
    }

    /// The first failure observed by the scheduler, if any
    pub fn first_failure(&self) -> Option<&CommandFailure> {
        self.outcomes
            .iter()
            .find_map(|outcome| outcome.failure.as_ref())
    }

    pub fn outcome(&self, task: &str) -> Option<&TaskOutcome> {
        self.outcomes.iter().find(|outcome| outcome.name == task)
    }

    /// Turn the report into an error when any task did not complete
    pub fn into_result(self) -> ProvisionResult<Self> {
        if let Some(failure) = self.first_failure() {
            return Err(ProvisionError::Command(failure.clone()));
        }
        if let Some(outcome) = self
            .outcomes
            .iter()
            .find(|outcome| outcome.state != TaskState::Completed)
        {
            return Err(ProvisionError::Task(format!(
                "Task '{}' finished as {}",
                outcome.name, outcome.state
            )));
        }
        Ok(self)
    }
}

/// What a provisioning run ended up doing
#[derive(Debug)]
pub enum RunOutcome {
    /// The sentinel was already present; nothing was executed
    Skipped,
    Completed(RunReport),
}
