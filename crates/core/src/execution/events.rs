//! Execution events
//!
//! The scheduler and command runner report progress through an [`EventSink`]
//! rather than printing directly, so the console reporter and test recorders
//! observe exactly the same stream.

use std::time::Duration;

use crate::configs::tasks::TaskMode;
use crate::results::CommandFailure;

#[derive(Debug, Clone, Copy)]
pub enum ExecutionEvent<'a> {
    TaskStarted {
        task: &'a str,
        mode: TaskMode,
    },
    /// Emitted before the command is handed to the shell
    CommandStarted {
        task: &'a str,
        index: usize,
        command: &'a str,
    },
    TaskCompleted {
        task: &'a str,
        elapsed: Duration,
    },
    TaskFailed {
        task: &'a str,
        failure: &'a CommandFailure,
    },
    /// The task will never run because `blocked_by` did not complete
    TaskBlocked {
        task: &'a str,
        blocked_by: &'a str,
    },
}

pub trait EventSink: Send + Sync {
    fn emit(&self, event: &ExecutionEvent<'_>);
}

/// Sink that drops every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: &ExecutionEvent<'_>) {}
}
