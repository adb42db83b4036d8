use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// How a task is scheduled once its prerequisites complete
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum TaskMode {
    /// Runs in its own worker alongside other tasks
    #[default]
    Parallel,
    /// Runs to completion on the main control path before anything else launches
    Inline,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TaskConfig {
    pub name: String,
    pub description: Option<String>,
    /// Shell commands, executed in order; the first failure aborts the rest
    pub commands: Vec<String>,
    /// Tasks that must complete before this one starts
    pub dependencies: Option<Vec<String>>,
    pub mode: Option<TaskMode>,
}
