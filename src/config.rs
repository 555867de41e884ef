// Copyright 2024-2026 ctx-stage Contributors
// SPDX-License-Identifier: Apache-2.0

//! Planner configuration.
//!
//! Defaults, overridden by an optional TOML file, overridden by environment
//! variables:
//!
//! | Variable | Field |
//! |---|---|
//! | `CTX_STAGE_CONFIG` | path of the TOML file |
//! | `CTX_STAGE_HELPER_IMAGE` | `helper.image` |
//! | `CTX_STAGE_HELPER_HOME` | `helper.home_dir` |
//! | `CTX_STAGE_RESOURCE_PREFIX` | `resource_prefix` |
//! | `CTX_STAGE_LOG_JSON` | `log.json` |

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::k8s::validation::{
    validate_absolute_dir, validate_image, validate_resource_name, ValidationError,
};

pub const ENV_CONFIG_PATH: &str = "CTX_STAGE_CONFIG";
pub const ENV_HELPER_IMAGE: &str = "CTX_STAGE_HELPER_IMAGE";
pub const ENV_HELPER_HOME: &str = "CTX_STAGE_HELPER_HOME";
pub const ENV_RESOURCE_PREFIX: &str = "CTX_STAGE_RESOURCE_PREFIX";
pub const ENV_LOG_JSON: &str = "CTX_STAGE_LOG_JSON";

pub const DEFAULT_HELPER_IMAGE: &str = "ctx-stage-helper:latest";
pub const DEFAULT_HELPER_HOME: &str = "/root";
pub const DEFAULT_RESOURCE_PREFIX: &str = "ctx";

/// Longest generated suffix is `-configmap-init`; volume and container names
/// must stay within the 63 character label limit.
const MAX_PREFIX_LENGTH: usize = 40;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Invalid config: {0}")]
    Invalid(#[from] ValidationError),
}

/// The helper image run by every generated init container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HelperConfig {
    pub image: String,
    /// Home directory of the helper's user; credentials mount beneath it.
    pub home_dir: String,
}

impl Default for HelperConfig {
    fn default() -> Self {
        Self {
            image: DEFAULT_HELPER_IMAGE.to_string(),
            home_dir: DEFAULT_HELPER_HOME.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Used when `RUST_LOG` is unset.
    pub filter: String,
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            json: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StagingConfig {
    /// Leading tag of every volume and init container name the planner adds.
    pub resource_prefix: String,
    pub helper: HelperConfig,
    pub log: LogConfig,
}

impl Default for StagingConfig {
    fn default() -> Self {
        Self {
            resource_prefix: DEFAULT_RESOURCE_PREFIX.to_string(),
            helper: HelperConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl StagingConfig {
    /// Parse a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load from `path`, or from `CTX_STAGE_CONFIG` when `path` is `None`,
    /// then apply environment overrides and validate.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let env_path = std::env::var_os(ENV_CONFIG_PATH).map(PathBuf::from);
        let mut config = match path.or(env_path.as_deref()) {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from `lookup`, which maps variable names to values.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(image) = lookup(ENV_HELPER_IMAGE) {
            self.helper.image = image;
        }
        if let Some(home) = lookup(ENV_HELPER_HOME) {
            self.helper.home_dir = home;
        }
        if let Some(prefix) = lookup(ENV_RESOURCE_PREFIX) {
            self.resource_prefix = prefix;
        }
        if let Some(json) = lookup(ENV_LOG_JSON) {
            self.log.json = matches!(json.as_str(), "1" | "true" | "yes");
        }
    }

    /// # Errors
    /// Returns a `ValidationError` if any field fails validation
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_image(&self.helper.image)?;
        validate_absolute_dir(&self.helper.home_dir, "helper.home_dir")?;
        validate_resource_name(&self.resource_prefix, "resource_prefix")?;
        if self.resource_prefix.len() > MAX_PREFIX_LENGTH {
            return Err(ValidationError::MaxLengthExceeded {
                field: "resource_prefix".to_string(),
                max: MAX_PREFIX_LENGTH,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
