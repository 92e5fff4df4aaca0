use crate::normalization::ProgressionCurve;

/// Tower difficulty setting.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Difficulty {
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    #[inline]
    pub const fn is_hard(self) -> bool {
        matches!(self, Self::Hard)
    }
}

/// Tunables for tower runs. A copy is stored in every run state so a run keeps
/// the rules it started with.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TowerConfig {
    /// Enemy stat multiplier added per floor above the first.
    pub enemy_scaling_per_floor: f64,

    /// Flat multiplier bonus on hard difficulty.
    pub hard_difficulty_bonus: f64,

    pub level_curve: ProgressionCurve,

    /// Normalize player units to the floor level before each battle.
    pub normalize_levels: bool,

    /// Fraction of max HP restored on rest floors without an override.
    pub default_rest_heal_fraction: f64,

    pub base_gold_per_floor: u32,
    pub base_xp_per_floor: u32,
    pub boss_reward_multiplier: u32,
}

pub const DEFAULT_TOWER_CONFIG: TowerConfig = TowerConfig {
    enemy_scaling_per_floor: 0.04,
    hard_difficulty_bonus: 0.25,
    level_curve: ProgressionCurve::Stepped,
    normalize_levels: true,
    default_rest_heal_fraction: 0.5,
    base_gold_per_floor: 20,
    base_xp_per_floor: 15,
    boss_reward_multiplier: 3,
};

impl Default for TowerConfig {
    fn default() -> Self {
        DEFAULT_TOWER_CONFIG
    }
}
