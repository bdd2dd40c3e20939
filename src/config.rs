//! Runner configuration.
//!
//! Type-safe configuration for the session runner: which engine binary to
//! launch, where generated files go, and how verbose to be. Validation
//! covers only the runner's own fields; topology content is never checked
//! locally and flows to the engine as-is.

use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Top-level runner configuration, loaded from YAML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Shared general configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level passed into the engine document ("error", "warn", "info",
    /// "debug", "trace")
    pub log_level: String,
}

/// External emulation engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Engine binary to spawn; receives the generated document path as its
    /// final argument
    pub command: String,
    /// Extra arguments inserted before the document path
    #[serde(default)]
    pub args: Vec<String>,
    /// Line written to the engine's stdin on stop to request teardown
    pub quit_command: String,
}

/// Generated-file locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving the engine document and node registry
    pub directory: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            command: "netemu".to_string(),
            args: Vec::new(),
            quit_command: "exit".to_string(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: "netlab_output".to_string(),
        }
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid general configuration: {0}")]
    InvalidGeneral(String),
    #[error("Invalid engine configuration: {0}")]
    InvalidEngine(String),
}

const LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

impl Config {
    /// Load and validate configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read config file '{}'", path.display()))?;
        let config: Config = serde_yaml::from_str(&raw)
            .wrap_err_with(|| format!("Failed to parse config file '{}'", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.engine.command.trim().is_empty() {
            return Err(ValidationError::InvalidEngine(
                "engine command cannot be empty".to_string(),
            ));
        }
        if self.engine.quit_command.is_empty() {
            return Err(ValidationError::InvalidEngine(
                "engine quit_command cannot be empty".to_string(),
            ));
        }
        if !LOG_LEVELS.contains(&self.general.log_level.as_str()) {
            return Err(ValidationError::InvalidGeneral(format!(
                "unknown log_level '{}' (expected one of {:?})",
                self.general.log_level, LOG_LEVELS
            )));
        }
        Ok(())
    }
}
