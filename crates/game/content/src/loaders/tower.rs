//! Tower floor list loader.

use std::path::Path;

use serde::{Deserialize, Serialize};
use vale_core::TowerFloor;

use crate::loaders::{LoadResult, read_file};

/// Tower floor structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TowerCatalog {
    pub floors: Vec<TowerFloor>,
}

/// Loader for tower floors from RON files.
pub struct TowerLoader;

impl TowerLoader {
    /// Load the floor list from a RON file, in file order.
    pub fn load(path: &Path) -> LoadResult<Vec<TowerFloor>> {
        let content = read_file(path)?;
        let catalog: TowerCatalog = ron::from_str(&content).map_err(|e| {
            anyhow::anyhow!("Failed to parse tower RON at {}: {}", path.display(), e)
        })?;

        Ok(catalog.floors)
    }
}
