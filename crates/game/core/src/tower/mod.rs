//! Tower mode: a seeded run over an ordered list of floors.
//!
//! [`TowerRunState`] tracks progress through pure reducers. The functions in
//! `session` connect a run to the battle engine: they build floor battles with
//! normalized players and scaled enemies, summarize finished battles and apply
//! rest floors to the party.
mod config;
mod error;
mod floor;
mod run;
mod scaling;
mod session;

pub use config::{DEFAULT_TOWER_CONFIG, Difficulty, TowerConfig};
pub use error::TowerError;
pub use floor::{FloorKind, TowerFloor};
pub use run::{
    BattleOutcome, BattleSummary, FloorOutcome, FloorRecord, PendingReward, RestSummary,
    TowerRunState, TowerStats,
};
pub use scaling::{EnemyScaling, calculate_enemy_scaling, calculate_floor_rewards, scale_enemy_unit};
pub use session::{apply_rest, carry_battle_hp, floor_level, prepare_floor_battle};

#[cfg(test)]
mod tests;
