//! Optional TOML configuration file.
//!
//! ```toml
//! journal = "registry.pvj"
//! identity = "human:alice"
//!
//! [registry]
//! min_year = -3000
//! max_year = 2100
//! max_text_len = 1024
//! ```

use anyhow::{Context, Result};
use provenant_core::RegistryConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Journal used when neither flag, environment nor config file name one.
pub const DEFAULT_JOURNAL: &str = "provenant.pvj";

#[derive(Debug, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub journal: Option<PathBuf>,
    pub identity: Option<String>,
    #[serde(default)]
    pub registry: RegistryConfig,
}

impl Config {
    /// Loads `path`, or the defaults when no file was given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read config file {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        tracing::debug!(path = %path.display(), "config loaded");
        Ok(config)
    }
}
