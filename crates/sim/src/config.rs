//! Simulator configuration from the environment.
use std::env;
use std::path::PathBuf;

use vale_core::{Difficulty, UnitId};

/// Headless tower run settings.
#[derive(Clone, Debug)]
pub struct SimConfig {
    /// Directory holding `content.ron`, `tower.ron` and `config.toml`.
    pub content_dir: PathBuf,
    pub seed: u64,
    pub difficulty: Difficulty,
    pub party: Vec<UnitId>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            content_dir: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/../game/content/data")),
            seed: 42,
            difficulty: Difficulty::Normal,
            party: ["isaac", "garet", "ivan", "mia"]
                .into_iter()
                .map(UnitId::new)
                .collect(),
        }
    }
}

impl SimConfig {
    /// Construct simulator configuration from environment variables.
    ///
    /// Environment variables:
    /// - `VALE_CONTENT_DIR` - Data directory (default: the content crate's `data/`)
    /// - `VALE_SEED` - Run seed (default: 42)
    /// - `VALE_DIFFICULTY` - `normal` or `hard` (default: normal)
    /// - `VALE_PARTY` - Comma-separated unit ids (default: isaac,garet,ivan,mia)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(dir) = read_env::<PathBuf>("VALE_CONTENT_DIR") {
            config.content_dir = dir;
        }
        if let Some(seed) = read_env::<u64>("VALE_SEED") {
            config.seed = seed;
        }
        if let Some(difficulty) = read_env::<Difficulty>("VALE_DIFFICULTY") {
            config.difficulty = difficulty;
        }
        if let Ok(party) = env::var("VALE_PARTY") {
            config.party = parse_party(&party);
        }

        config
    }
}

fn parse_party(value: &str) -> Vec<UnitId> {
    value
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(UnitId::new)
        .collect()
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn party_list_ignores_blanks_and_whitespace() {
        assert_eq!(
            parse_party(" isaac, mia ,,"),
            vec![UnitId::new("isaac"), UnitId::new("mia")]
        );
    }

    #[test]
    fn difficulty_parses_case_insensitively() {
        assert_eq!("HARD".parse::<Difficulty>().ok(), Some(Difficulty::Hard));
    }
}
