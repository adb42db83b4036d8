//! High-level provisioning interface
//!
//! This module provides the [`Provisioner`] which serves as the primary interface
//! for provisioning operations. It owns the loaded plan and its validated
//! execution graph, and wires the idempotency guard around the scheduler.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//! use std::sync::Arc;
//!
//! use devprep_core::execution::SystemShell;
//! use devprep_core::provisioner::{Provisioner, ProvisionerConfig};
//! use devprep_core::tasks::ConsoleReporter;
//!
//! # async fn example() -> devprep_core::types::ProvisionResult<()> {
//! let provisioner = Provisioner::load(ProvisionerConfig {
//!     config_path: PathBuf::from(".devcontainer/provision.yml"),
//!     sentinel_override: None,
//! })?;
//!
//! let shell = Arc::new(SystemShell::from_config(provisioner.config()));
//! let guard = provisioner.sentinel();
//! provisioner.run(&guard, shell, Arc::new(ConsoleReporter), false).await?;
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use crate::configs::provision::{load_provision_config, ProvisionConfig};
use crate::configs::tasks::TaskMode;
use crate::execution::command::Shell;
use crate::execution::dependencies::group_by_dependency_levels;
use crate::execution::events::EventSink;
use crate::execution::scheduler::Scheduler;
use crate::graph::ExecutionGraph;
use crate::guard::{CompletionGuard, SentinelFile};
use crate::results::RunOutcome;
use crate::types::ProvisionResult;

/// Configuration for loading a provisioner
pub struct ProvisionerConfig {
    pub config_path: PathBuf,
    /// Takes precedence over the plan file's `sentinel`
    pub sentinel_override: Option<PathBuf>,
}

/// Launch plan derived from the execution graph
#[derive(Debug, Clone)]
pub struct ExecutionPlan {
    /// Task names grouped by dependency level, roots first
    pub levels: Vec<Vec<String>>,
    /// Tasks that run on the main control path, in declaration order
    pub inline_tasks: Vec<String>,
}

/// Result of loading a plan for a run
pub enum LoadedRun {
    /// The sentinel already exists; the plan's task graph was never built
    Skipped(SentinelFile),
    Ready(Provisioner),
}

pub struct Provisioner {
    config: ProvisionConfig,
    graph: ExecutionGraph,
    sentinel_path: PathBuf,
}

impl Provisioner {
    /// Load a plan file and validate its task graph
    pub fn load(config: ProvisionerConfig) -> ProvisionResult<Self> {
        let plan = load_provision_config(&config.config_path)?;
        Self::with_sentinel(plan, config.sentinel_override)
    }

    /// Load a plan file for running, consulting the sentinel before the task
    /// graph is validated.
    ///
    /// An overriding sentinel is checked before the plan file is even read.
    /// With `force`, the sentinel is ignored and this behaves like [`load`].
    ///
    /// [`load`]: Provisioner::load
    pub fn load_for_run(config: ProvisionerConfig, force: bool) -> ProvisionResult<LoadedRun> {
        if !force {
            if let Some(path) = &config.sentinel_override {
                let sentinel = SentinelFile::new(path);
                if sentinel.is_done()? {
                    return Ok(LoadedRun::Skipped(sentinel));
                }
            }
        }

        let plan = load_provision_config(&config.config_path)?;
        if !force && config.sentinel_override.is_none() {
            let sentinel = SentinelFile::new(plan.sentinel_path());
            if sentinel.is_done()? {
                return Ok(LoadedRun::Skipped(sentinel));
            }
        }

        Self::with_sentinel(plan, config.sentinel_override).map(LoadedRun::Ready)
    }

    fn with_sentinel(plan: ProvisionConfig, sentinel: Option<PathBuf>) -> ProvisionResult<Self> {
        let mut provisioner = Self::new(plan)?;
        if let Some(sentinel) = sentinel {
            provisioner.sentinel_path = sentinel;
        }
        Ok(provisioner)
    }

    pub fn new(config: ProvisionConfig) -> ProvisionResult<Self> {
        let graph = ExecutionGraph::from_configs(config.tasks.clone())?;
        let sentinel_path = config.sentinel_path();
        Ok(Self {
            config,
            graph,
            sentinel_path,
        })
    }

    pub fn config(&self) -> &ProvisionConfig {
        &self.config
    }

    pub fn graph(&self) -> &ExecutionGraph {
        &self.graph
    }

    /// The filesystem guard for this plan's sentinel
    pub fn sentinel(&self) -> SentinelFile {
        SentinelFile::new(&self.sentinel_path)
    }

    pub fn plan(&self) -> ExecutionPlan {
        ExecutionPlan {
            levels: group_by_dependency_levels(&self.graph),
            inline_tasks: self
                .graph
                .tasks()
                .filter(|task| task.mode == TaskMode::Inline)
                .map(|task| task.name.clone())
                .collect(),
        }
    }

    /// Check the guard, run the whole graph, and mark the guard done on success.
    ///
    /// With `force`, an existing completion marker is ignored. The guard is
    /// only marked after every task has been joined and completed.
    pub async fn run(
        &self,
        guard: &dyn CompletionGuard,
        shell: Arc<dyn Shell>,
        sink: Arc<dyn EventSink>,
        force: bool,
    ) -> ProvisionResult<RunOutcome> {
        if !force && !guard.should_run()? {
            log::info!("Provisioning already completed, nothing to do");
            return Ok(RunOutcome::Skipped);
        }

        log::info!(
            "Provisioning {} task(s) from '{}'",
            self.graph.len(),
            self.config.name.as_deref().unwrap_or("unnamed plan")
        );

        let scheduler = Scheduler::new(shell, sink);
        let report = scheduler.run(&self.graph).await?.into_result()?;

        guard.mark_done()?;
        Ok(RunOutcome::Completed(report))
    }
}
