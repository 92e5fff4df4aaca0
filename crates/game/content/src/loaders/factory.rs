//! Content factory for building oracles from data files.

use std::path::{Path, PathBuf};

use vale_core::{ContentSnapshot, TowerFloor};

use crate::catalog::ContentCatalog;
use crate::loaders::{ConfigFile, ConfigLoader, ContentLoader, LoadResult, TowerLoader};
use crate::validation::{self, BalanceWarning};

/// Everything a tower run needs, validated and indexed.
#[derive(Debug, Clone)]
pub struct ContentBundle {
    pub content: ContentSnapshot,
    pub floors: Vec<TowerFloor>,
    pub config: ConfigFile,
    pub warnings: Vec<BalanceWarning>,
}

/// Content factory that loads all game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── content.ron
/// └── tower.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load battle and tower configuration from `config.toml`.
    ///
    /// A missing file yields the defaults.
    pub fn load_config(&self) -> LoadResult<ConfigFile> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(ConfigFile::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load content tables from `content.ron`.
    pub fn load_catalog(&self) -> LoadResult<ContentCatalog> {
        let path = self.data_dir.join("content.ron");
        ContentLoader::load(&path)
    }

    /// Load tower floors from `tower.ron`.
    pub fn load_floors(&self) -> LoadResult<Vec<TowerFloor>> {
        let path = self.data_dir.join("tower.ron");
        TowerLoader::load(&path)
    }

    /// Loads every file and runs the startup validation gate.
    ///
    /// Schema issues fail the load with every issue listed; balance warnings
    /// are logged and returned alongside the content.
    pub fn load_bundle(&self) -> LoadResult<ContentBundle> {
        let config = self.load_config()?;
        let catalog = self.load_catalog()?;
        let floors = self.load_floors()?;

        let report = validation::validate(&catalog, &floors);
        if !report.is_valid() {
            let details: Vec<String> = report.issues.iter().map(ToString::to_string).collect();
            return Err(anyhow::anyhow!(
                "Content in {} failed validation:\n  {}",
                self.data_dir.display(),
                details.join("\n  ")
            ));
        }

        tracing::info!(
            data_dir = %self.data_dir.display(),
            floors = floors.len(),
            warnings = report.warnings.len(),
            "content loaded"
        );

        Ok(ContentBundle {
            content: catalog.into_snapshot(),
            floors,
            config,
            warnings: report.warnings,
        })
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn missing_config_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let factory = ContentFactory::new(dir.path());
        assert_eq!(factory.load_config().unwrap(), ConfigFile::default());
    }

    #[test]
    fn missing_content_is_an_error_naming_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ContentFactory::new(dir.path()).load_catalog().unwrap_err();
        assert!(err.to_string().contains("content.ron"));
    }
}
