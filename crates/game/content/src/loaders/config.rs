//! Battle and tower configuration loader.

use std::path::Path;

use serde::{Deserialize, Serialize};
use vale_core::{GameConfig, TowerConfig};

use crate::loaders::{LoadResult, read_file};

/// `config.toml` layout: a `[battle]` and a `[tower]` table, both optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub battle: GameConfig,
    pub tower: TowerConfig,
}

/// Loader for configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Missing tables and keys fall back to the defaults.
    pub fn load(path: &Path) -> LoadResult<ConfigFile> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<ConfigFile> {
        let config: ConfigFile = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        Ok(config)
    }
}
