//! Configuration for the SCIM provider admin tooling.
//!
//! Configured via a TOML file, with support for environment variable
//! interpolation using `${VAR_NAME}` syntax.
//!
//! # Example
//!
//! ```toml
//! [api]
//! base_url = "https://idp.example.com"
//! token = "${IDP_API_TOKEN}"
//!
//! [observability.logging]
//! level = "debug"
//! ```

mod api;
mod observability;

use std::path::Path;

pub use api::*;
pub use observability::*;
use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdminConfig {
    /// Remote admin API connection settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Observability configuration (logging).
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl AdminConfig {
    /// Load configuration from a TOML file.
    ///
    /// Environment variables in the format `${VAR_NAME}` are expanded.
    /// Missing variables cause an error.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::Io(e, path.as_ref().to_path_buf()))?;

        Self::from_str(&contents)
    }

    /// Parse configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(contents: &str) -> Result<Self, ConfigError> {
        let expanded = expand_env_vars(contents)?;
        let config: AdminConfig = toml::from_str(&expanded)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.api.validate()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {1}: {0}")]
    Io(std::io::Error, std::path::PathBuf),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Environment variable not found: {0}")]
    EnvVarNotFound(String),

    #[error("Configuration validation error: {0}")]
    Validation(String),
}

/// Expand `${VAR}` references in every line up to its `#` comment marker.
///
/// The first variable that is not set aborts the expansion.
fn expand_env_vars(input: &str) -> Result<String, ConfigError> {
    let pattern = regex::Regex::new(r"\$\{([^}]+)\}")
        .map_err(|e| ConfigError::Validation(e.to_string()))?;

    let mut lines = Vec::new();
    for line in input.split('\n') {
        let (code, comment) = line.split_at(line.find('#').unwrap_or(line.len()));

        let mut missing = None;
        let expanded = pattern.replace_all(code, |caps: &regex::Captures<'_>| {
            std::env::var(&caps[1]).unwrap_or_else(|_| {
                missing.get_or_insert_with(|| caps[1].to_string());
                String::new()
            })
        });
        if let Some(name) = missing {
            return Err(ConfigError::EnvVarNotFound(name));
        }

        lines.push(format!("{expanded}{comment}"));
    }

    Ok(lines.join("\n"))
}
