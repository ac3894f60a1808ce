//! Configuration management for cadence.
//!
//! Settings live in `.cadence/config.yaml`:
//!
//! ```yaml
//! project: PEACH
//! source: .cadence/issues.jsonl
//! scheduling:
//!   slack-days: 3
//!   max-visits-per-node: 100
//! output:
//!   color: true
//! ```
//!
//! Every key is optional. A missing file means all defaults.

use crate::error::{Error, Result};
use crate::schedule::SchedulingConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Directory holding cadence's files.
pub const CADENCE_DIR_NAME: &str = ".cadence";

/// Config file name inside [`CADENCE_DIR_NAME`].
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Snapshot file name inside [`CADENCE_DIR_NAME`].
pub const ISSUES_FILE_NAME: &str = "issues.jsonl";

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CadenceConfig {
    /// Project namespace in scope, e.g. `PEACH`.
    pub project: String,

    /// Path to the issue snapshot.
    pub source: PathBuf,

    /// Propagation knobs.
    pub scheduling: SchedulingConfig,

    /// Output settings.
    pub output: OutputSettings,
}

/// Output configuration section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OutputSettings {
    /// Use colors where the terminal allows.
    pub color: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self { color: true }
    }
}

impl Default for CadenceConfig {
    fn default() -> Self {
        Self {
            project: String::new(),
            source: default_config_dir().join(ISSUES_FILE_NAME),
            scheduling: SchedulingConfig::default(),
            output: OutputSettings::default(),
        }
    }
}

/// `.cadence` relative to the working directory.
pub fn default_config_dir() -> PathBuf {
    PathBuf::from(CADENCE_DIR_NAME)
}

/// `.cadence/config.yaml` relative to the working directory.
pub fn default_config_path() -> PathBuf {
    default_config_dir().join(CONFIG_FILE_NAME)
}

impl CadenceConfig {
    /// Load configuration from a file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] when the file cannot be read and
    /// [`Error::Config`] when it is not valid YAML for this structure or
    /// holds scheduling values out of range.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Self =
            serde_yaml::from_str(&content).map_err(|e| Error::Config(e.to_string()))?;
        config.scheduling.validate()?;
        Ok(config)
    }

    /// Load `path` if it exists, otherwise fall back to defaults.
    ///
    /// # Errors
    ///
    /// Same as [`CadenceConfig::load`] for an existing file.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Save configuration to a file.
    ///
    /// # Errors
    ///
    /// Fails on serialization or I/O errors.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_yaml::to_string(self).map_err(|e| Error::Config(format!("YAML error: {e}")))?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }
}
