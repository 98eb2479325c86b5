use std::env;

use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

pub const ENV_LABEL: &str = "SCOPED_DI_LABEL";
pub const ENV_SCOPE_WARNINGS: &str = "SCOPED_DI_SCOPE_WARNINGS";
pub const ENV_TRACE_DIAGNOSTICS: &str = "SCOPED_DI_TRACE_DIAGNOSTICS";

/// Container configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    /// Human readable scope name used in errors and logs
    pub label: Option<String>,
    /// Emit scope-safety advisories
    pub scope_warnings: bool,
    /// Forward advisories to `tracing` when no sink is supplied
    pub trace_diagnostics: bool,
}

impl ContainerConfig {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self {
            label: None,
            scope_warnings: true,
            trace_diagnostics: false,
        }
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key/value source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new();

        if let Some(label) = lookup(ENV_LABEL) {
            config.label = Some(label);
        }
        if let Some(value) = lookup(ENV_SCOPE_WARNINGS) {
            config.scope_warnings = parse_flag(ENV_SCOPE_WARNINGS, &value)?;
        }
        if let Some(value) = lookup(ENV_TRACE_DIAGNOSTICS) {
            config.trace_diagnostics = parse_flag(ENV_TRACE_DIAGNOSTICS, &value)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a YAML document
    pub fn from_yaml_str(yaml: &str) -> Result<Self, CoreError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), CoreError> {
        if let Some(label) = &self.label {
            if label.trim().is_empty() {
                return Err(CoreError::configuration("label must not be empty"));
            }
        }
        Ok(())
    }
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool, CoreError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(CoreError::configuration(format!(
            "invalid value '{}' for {}; expected true or false",
            value, key
        ))),
    }
}
