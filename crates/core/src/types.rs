use thiserror::Error;

use crate::results::CommandFailure;

/// The main error type for provisioning operations
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Graph error: {0}")]
    Graph(String),

    #[error("{0}")]
    Command(CommandFailure),

    #[error("Task error: {0}")]
    Task(String),
}

impl ProvisionError {
    /// Process exit status that reports this error.
    ///
    /// Command failures propagate the failing command's own status; every
    /// other error exits with 1.
    pub fn exit_code(&self) -> u8 {
        match self {
            ProvisionError::Command(failure) => failure.exit_code(),
            _ => 1,
        }
    }
}

/// Result type alias for provisioning operations
pub type ProvisionResult<T> = Result<T, ProvisionError>;
