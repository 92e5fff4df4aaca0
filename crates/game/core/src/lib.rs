//! Deterministic battle and tower rules.
//!
//! `vale-core` holds the canonical game logic: the queue-based battle state
//! machine, the unit/team/Djinn model, tower run reducers and level
//! normalization. It performs no I/O. Content tables and randomness are
//! injected through the oracles in [`env`], so the same inputs always replay
//! the same battle.
pub mod battle;
pub mod config;
pub mod env;
pub mod error;
pub mod normalization;
pub mod state;
pub mod stats;
pub mod tower;

#[cfg(test)]
mod testing;

pub use battle::{
    ActionChoice, AutoPlanner, BattleError, BattleEvent, BattleLog, BattlePhase, BattleRewards,
    BattleSnapshot, BattleState, BattleStatus, EnemyPolicy, LevelUp, PlayerPolicy, QueuedAction,
    ScriptedPolicy, apply_rewards, compute_turn_order,
};
pub use config::{DjinnRecoveryRule, GameConfig};
pub use env::{
    ContentOracle, ContentSnapshot, Env, GameEnv, OracleError, PcgRng, RngOracle, compute_seed,
};
pub use error::{ErrorSeverity, GameError};
pub use normalization::{
    ProgressionCurve, calculate_floor_target_level, calculate_level_scaled_stats,
    calculate_stats_with_growth_rates, normalize_unit,
};
pub use state::{
    Ability, AbilityId, AbilityKind, Djinn, DjinnId, DjinnState, Element, Encounter, EncounterId,
    Enemy, EnemyId, Equipment, EquipmentId, EquipmentSlot, FloorId, StatusEffect, SummonEffect,
    Team, TeamError, Unit, UnitDefinition, UnitId, UnitRole,
};
pub use stats::{GrowthRates, StatDelta, StatKind, Stats};
pub use tower::{
    BattleOutcome, BattleSummary, DEFAULT_TOWER_CONFIG, Difficulty, FloorKind, TowerConfig,
    TowerError, TowerFloor, TowerRunState, calculate_enemy_scaling,
};
