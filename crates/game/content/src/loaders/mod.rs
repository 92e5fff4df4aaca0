//! Content loaders for reading game data from files.
//!
//! Content tables are RON, configuration is TOML. Every loader returns
//! `anyhow::Result` with the offending path in the error context.

pub mod config;
pub mod content;
pub mod factory;
pub mod tower;

pub use config::{ConfigFile, ConfigLoader};
pub use content::ContentLoader;
pub use factory::{ContentBundle, ContentFactory};
pub use tower::{TowerCatalog, TowerLoader};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
