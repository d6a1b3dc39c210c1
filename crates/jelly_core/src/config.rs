//! Application configuration, loadable from TOML.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::classifier::ClassifierConfig;
use crate::error::{Error, Result};

/// Top-level configuration. Every field has a default so a partial file is
/// valid.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory with species gallery images; optional.
    pub gallery_dir: Option<PathBuf>,
    pub classifier: ClassifierConfig,
}

impl AppConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        toml::from_str(&raw).map_err(|e| Error::InvalidConfig(e.to_string()))
    }
}
