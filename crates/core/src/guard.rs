//! Idempotency guard
//!
//! A [`CompletionGuard`] answers "has provisioning already completed?" and
//! records the answer after a fully successful run. [`SentinelFile`] keeps the
//! fact on disk as an empty marker file; [`MemoryGuard`] keeps it in memory.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::types::ProvisionResult;

pub trait CompletionGuard: Send + Sync {
    /// Whether a previous run completed successfully
    fn is_done(&self) -> ProvisionResult<bool>;

    /// Record a successful run
    fn mark_done(&self) -> ProvisionResult<()>;

    /// Forget a previous run. Returns whether there was one to forget.
    fn reset(&self) -> ProvisionResult<bool>;

    fn should_run(&self) -> ProvisionResult<bool> {
        Ok(!self.is_done()?)
    }
}

/// Marker file whose existence means "done"
#[derive(Debug, Clone)]
pub struct SentinelFile {
    path: PathBuf,
}

impl SentinelFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CompletionGuard for SentinelFile {
    fn is_done(&self) -> ProvisionResult<bool> {
        Ok(self.path.exists())
    }

    fn mark_done(&self) -> ProvisionResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        // Existence is the whole content; never write anything into it
        OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)?;

        log::debug!("Wrote sentinel {}", self.path.display());
        Ok(())
    }

    fn reset(&self) -> ProvisionResult<bool> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory flag, for callers that must not touch the filesystem
#[derive(Debug, Default)]
pub struct MemoryGuard {
    done: AtomicBool,
    marks: AtomicUsize,
}

impl MemoryGuard {
    pub fn new(done: bool) -> Self {
        Self {
            done: AtomicBool::new(done),
            marks: AtomicUsize::new(0),
        }
    }

    /// How many times `mark_done` was called
    pub fn mark_count(&self) -> usize {
        self.marks.load(Ordering::SeqCst)
    }
}

impl CompletionGuard for MemoryGuard {
    fn is_done(&self) -> ProvisionResult<bool> {
        Ok(self.done.load(Ordering::SeqCst))
    }

    fn mark_done(&self) -> ProvisionResult<()> {
        self.marks.fetch_add(1, Ordering::SeqCst);
        self.done.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn reset(&self) -> ProvisionResult<bool> {
        Ok(self.done.swap(false, Ordering::SeqCst))
    }
}
