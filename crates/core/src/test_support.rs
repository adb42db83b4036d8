//! Test doubles shared by the scheduler and provisioner tests.
//!
//! [`Journal`] acts as both the shell and the event sink, appending every
//! executed command and every scheduler event to one ordered log so tests can
//! compare positions.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::execution::command::{CommandStatus, Shell};
use crate::execution::events::{EventSink, ExecutionEvent};
use crate::guard::CompletionGuard;
use crate::types::ProvisionResult;

/// Ordered log of executions and events.
///
/// Recognised commands:
/// - `sleep <ms>`: blocks the worker thread
/// - `fail <code>`: exits with `code`
/// - `rendezvous`: waits (up to two seconds) until another task reaches its own rendezvous
/// - anything else succeeds immediately
#[derive(Default)]
pub struct Journal {
    entries: Mutex<Vec<String>>,
    arrivals: AtomicUsize,
}

impl Journal {
    pub fn record(&self, entry: String) {
        self.entries.lock().unwrap().push(entry);
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().unwrap().clone()
    }

    pub fn position(&self, entry: &str) -> usize {
        self.entries()
            .iter()
            .position(|e| e == entry)
            .unwrap_or_else(|| panic!("'{}' missing from journal {:?}", entry, self.entries()))
    }

    pub fn contains(&self, entry: &str) -> bool {
        self.entries().iter().any(|e| e == entry)
    }

    pub fn executed(&self) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|e| e.starts_with("exec:"))
            .collect()
    }
}

impl Shell for Journal {
    fn execute(&self, task: &str, command: &str) -> std::io::Result<CommandStatus> {
        self.record(format!("exec:{}:{}", task, command));

        if let Some(ms) = command.strip_prefix("sleep ") {
            std::thread::sleep(Duration::from_millis(ms.parse().unwrap()));
        } else if let Some(code) = command.strip_prefix("fail ") {
            return Ok(CommandStatus::from_code(code.parse().unwrap()));
        } else if command == "rendezvous" {
            self.arrivals.fetch_add(1, Ordering::SeqCst);
            let deadline = Instant::now() + Duration::from_secs(2);
            while self.arrivals.load(Ordering::SeqCst) < 2 {
                if Instant::now() > deadline {
                    return Ok(CommandStatus::from_code(99));
                }
                std::thread::sleep(Duration::from_millis(1));
            }
        }

        Ok(CommandStatus::SUCCESS)
    }
}

impl EventSink for Journal {
    fn emit(&self, event: &ExecutionEvent<'_>) {
        let entry = match event {
            ExecutionEvent::TaskStarted { task, .. } => format!("start:{}", task),
            ExecutionEvent::CommandStarted { .. } => return,
            ExecutionEvent::TaskCompleted { task, .. } => format!("done:{}", task),
            ExecutionEvent::TaskFailed { task, .. } => format!("failed:{}", task),
            ExecutionEvent::TaskBlocked { task, blocked_by } => {
                format!("blocked:{}:{}", task, blocked_by)
            }
        };
        self.record(entry);
    }
}

/// Guard double that writes its `mark_done` calls into a journal
pub struct JournalGuard<'a> {
    pub journal: &'a Journal,
    pub done: Mutex<bool>,
}

impl<'a> JournalGuard<'a> {
    pub fn new(journal: &'a Journal, done: bool) -> Self {
        Self {
            journal,
            done: Mutex::new(done),
        }
    }
}

impl CompletionGuard for JournalGuard<'_> {
    fn is_done(&self) -> ProvisionResult<bool> {
        Ok(*self.done.lock().unwrap())
    }

    fn mark_done(&self) -> ProvisionResult<()> {
        self.journal.record("sentinel".to_string());
        *self.done.lock().unwrap() = true;
        Ok(())
    }

    fn reset(&self) -> ProvisionResult<bool> {
        let mut done = self.done.lock().unwrap();
        let was_done = *done;
        *done = false;
        Ok(was_done)
    }
}
