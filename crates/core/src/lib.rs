//! devprep Core Library
//!
//! This is the core library for the devprep container provisioner. It runs a
//! static graph of named shell tasks, in parallel where the graph allows, and
//! records a completion marker so that re-running a finished provisioning is a
//! no-op.
//!
//! ## Architecture
//!
//! The core library is organized into several modules:
//!
//! - [`provisioner`] - High-level interface: plan loading, guard check, run
//! - [`execution`] - Command runner, scheduler, and execution events
//! - [`graph`] - Validated task graph built from the plan file
//! - [`guard`] - Idempotency guard (sentinel file or in-memory flag)
//! - [`configs`] - Plan file parsing
//! - [`tasks`] - Console reporting and task color management
//! - [`results`] - Run reports and command failures
//! - [`types`] - Common error types and type aliases
//!
//! ## Usage
//!
//! The primary entry point is the [`Provisioner`]:
//!
//! ```rust,no_run
//! use devprep_core::provisioner::{Provisioner, ProvisionerConfig};
//! use std::path::PathBuf;
//!
//! # fn example() -> devprep_core::types::ProvisionResult<()> {
//! let provisioner = Provisioner::load(ProvisionerConfig {
//!     config_path: PathBuf::from(".devcontainer/provision.yml"),
//!     sentinel_override: None,
//! })?;
//!
//! let plan = provisioner.plan();
//! # Ok(())
//! # }
//! ```

pub mod configs;
pub mod execution;
pub mod graph;
pub mod guard;
pub mod provisioner;
pub mod results;
pub mod tasks;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export the main types for easier usage
pub use provisioner::{Provisioner, ProvisionerConfig};
pub use types::{ProvisionError, ProvisionResult};
