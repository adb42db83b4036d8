//! Command execution utilities
//!
//! This module runs the ordered shell commands of a single task with
//! consistent failure reporting. The [`Shell`] trait is the seam between the
//! runner and the operating system.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::Command;
use std::sync::Arc;

use crate::configs::provision::{ProvisionConfig, DEFAULT_SHELL};
use crate::execution::events::{EventSink, ExecutionEvent};
use crate::results::{CommandFailure, FailureKind};

/// Environment variable carrying the name of the task running a command
pub const TASK_ENV_VAR: &str = "DEVPREP_TASK";

/// Exit status of one shell command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandStatus {
    /// `None` when the process was terminated without an exit code
    pub code: Option<i32>,
}

impl CommandStatus {
    pub const SUCCESS: CommandStatus = CommandStatus { code: Some(0) };

    pub fn from_code(code: i32) -> Self {
        Self { code: Some(code) }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Executes a single opaque shell instruction
pub trait Shell: Send + Sync {
    fn execute(&self, task: &str, command: &str) -> std::io::Result<CommandStatus>;
}

/// Runs commands as `<program> -c <command>` with inherited stdio
#[derive(Debug, Clone)]
pub struct SystemShell {
    program: String,
    working_dir: Option<PathBuf>,
    env: BTreeMap<String, String>,
}

impl Default for SystemShell {
    fn default() -> Self {
        Self {
            program: DEFAULT_SHELL.to_string(),
            working_dir: None,
            env: BTreeMap::new(),
        }
    }
}

impl SystemShell {
    pub fn from_config(config: &ProvisionConfig) -> Self {
        Self {
            program: config.shell_program().to_string(),
            working_dir: config.working_dir.clone(),
            env: config.env.clone().unwrap_or_default(),
        }
    }

    pub fn with_working_dir(mut self, working_dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(working_dir.into());
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }
}

impl Shell for SystemShell {
    fn execute(&self, task: &str, command: &str) -> std::io::Result<CommandStatus> {
        let mut process = Command::new(&self.program);
        process.arg("-c").arg(command);

        if let Some(dir) = &self.working_dir {
            process.current_dir(dir);
        }
        process.envs(&self.env);
        process.env(TASK_ENV_VAR, task);

        let status = process.status()?;
        Ok(CommandStatus {
            code: status.code(),
        })
    }
}

/// Runs the command sequence of one task, stopping at the first failure
pub struct CommandExecutor {
    shell: Arc<dyn Shell>,
    sink: Arc<dyn EventSink>,
}

impl CommandExecutor {
    pub fn new(shell: Arc<dyn Shell>, sink: Arc<dyn EventSink>) -> Self {
        Self { shell, sink }
    }

    /// Execute `commands` strictly in order on behalf of `task`
    pub fn run(&self, task: &str, commands: &[String]) -> Result<(), CommandFailure> {
        for (index, command) in commands.iter().enumerate() {
            self.sink.emit(&ExecutionEvent::CommandStarted {
                task,
                index,
                command,
            });

            let kind = match self.shell.execute(task, command) {
                Ok(status) if status.success() => continue,
                Ok(CommandStatus { code: Some(code) }) => FailureKind::ExitCode(code),
                Ok(CommandStatus { code: None }) => FailureKind::Terminated,
                Err(e) => FailureKind::Spawn(e.to_string()),
            };

            return Err(CommandFailure {
                task: task.to_string(),
                index,
                command: command.clone(),
                kind,
            });
        }

        Ok(())
    }
}
