use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::configs::tasks::TaskConfig;
use crate::types::{ProvisionError, ProvisionResult};

pub const DEFAULT_CONFIG_PATH: &str = ".devcontainer/provision.yml";
pub const DEFAULT_SENTINEL_PATH: &str = "/tmp/devcontainer-setup-done";
pub const DEFAULT_SHELL: &str = "sh";

#[derive(Debug, Deserialize, Serialize, JsonSchema, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProvisionConfig {
    pub name: Option<String>,
    pub description: Option<String>,
    /// Marker file written after a fully successful run. Relative paths
    /// resolve against the plan file.
    pub sentinel: Option<PathBuf>,
    /// Shell program used to run commands as `<shell> -c <command>`
    pub shell: Option<String>,
    /// Directory commands run in. Relative paths resolve against the plan file.
    pub working_dir: Option<PathBuf>,
    /// Extra environment variables for every command
    pub env: Option<BTreeMap<String, String>>,
    pub tasks: Vec<TaskConfig>,
}

impl ProvisionConfig {
    pub fn sentinel_path(&self) -> PathBuf {
        self.sentinel
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SENTINEL_PATH))
    }

    pub fn shell_program(&self) -> &str {
        self.shell.as_deref().unwrap_or(DEFAULT_SHELL)
    }
}

pub fn parse_provision_config(yaml_str: &str) -> ProvisionResult<ProvisionConfig> {
    let config: ProvisionConfig = serde_yaml::from_str(yaml_str)?;
    Ok(config)
}

pub fn parse_provision_config_toml(toml_str: &str) -> ProvisionResult<ProvisionConfig> {
    let config: ProvisionConfig = toml::from_str(toml_str)?;
    Ok(config)
}

/// JSON schema of the plan file format
pub fn provision_config_schema() -> ProvisionResult<String> {
    let schema = schemars::schema_for!(ProvisionConfig);
    Ok(serde_json::to_string_pretty(&schema)?)
}

/// Load a plan file, picking the format from its extension (`.toml` or YAML)
pub fn load_provision_config(path: &Path) -> ProvisionResult<ProvisionConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        ProvisionError::Config(format!(
            "Failed to read plan file {}: {}",
            path.display(),
            e
        ))
    })?;

    let is_toml = path.extension().and_then(|s| s.to_str()) == Some("toml");
    let parsed = if is_toml {
        parse_provision_config_toml(&content)
    } else {
        parse_provision_config(&content)
    };

    let mut config = parsed.map_err(|e| {
        ProvisionError::Config(format!(
            "Failed to parse plan file {}: {}",
            path.display(),
            e
        ))
    })?;

    let base = path.parent().unwrap_or_else(|| Path::new("."));
    config.working_dir = config.working_dir.map(|dir| relative_to(base, dir));
    config.sentinel = config.sentinel.map(|sentinel| relative_to(base, sentinel));

    Ok(config)
}

fn relative_to(base: &Path, path: PathBuf) -> PathBuf {
    if path.is_relative() {
        base.join(path)
    } else {
        path
    }
}
