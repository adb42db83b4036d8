//! Plan file configuration
//!
//! A plan file describes the task graph, the sentinel location and the shell
//! environment commands run in.

pub mod provision;
pub mod tasks;
