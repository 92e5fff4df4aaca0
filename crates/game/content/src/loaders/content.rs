//! Content table loader.

use std::path::Path;

use crate::catalog::ContentCatalog;
use crate::loaders::{LoadResult, read_file};

/// Loader for content tables from RON files.
pub struct ContentLoader;

impl ContentLoader {
    /// Load a content catalog from a RON file.
    pub fn load(path: &Path) -> LoadResult<ContentCatalog> {
        let content = read_file(path)?;
        let catalog: ContentCatalog = ron::from_str(&content).map_err(|e| {
            anyhow::anyhow!("Failed to parse content RON at {}: {}", path.display(), e)
        })?;

        tracing::debug!(
            abilities = catalog.abilities.len(),
            units = catalog.units.len(),
            enemies = catalog.enemies.len(),
            "content catalog loaded"
        );
        Ok(catalog)
    }
}
