//! Glue between a tower run and the battle engine.

use super::error::TowerError;
use super::floor::{FloorKind, TowerFloor};
use super::run::{BattleOutcome, BattleSummary, RestSummary, TowerRunState};
use super::scaling::{calculate_enemy_scaling, scale_enemy_unit};
use crate::battle::{BattleRewards, BattleState, BattleStatus, spawn_enemies};
use crate::config::GameConfig;
use crate::env::{GameEnv, compute_seed, roll};
use crate::normalization::{calculate_floor_target_level, normalize_unit};
use crate::state::Team;

/// Level the party is normalized to on `floor`.
pub fn floor_level(run: &TowerRunState, floor: &TowerFloor) -> u32 {
    floor
        .normalized_level
        .unwrap_or_else(|| calculate_floor_target_level(floor.floor_number, run.config().level_curve))
}

/// Builds the battle for the current floor.
///
/// Players fight as normalized copies of `team` (when the run normalizes
/// levels); enemies come from the floor's encounter, scaled for the floor and
/// difficulty. The battle seed is derived from the run seed and floor.
pub fn prepare_floor_battle(
    run: &TowerRunState,
    team: &Team,
    env: &GameEnv<'_>,
    config: GameConfig,
) -> Result<BattleState, TowerError> {
    if run.is_completed() {
        return Err(TowerError::RunFinished);
    }
    let floor = run.current_floor().ok_or(TowerError::RunFinished)?;
    let encounter_id = floor
        .encounter()
        .ok_or_else(|| TowerError::BattleOnRestFloor(floor.id.clone()))?;

    let content = env.content()?;
    let encounter = content.require_encounter(encounter_id)?;

    let mut party = team.clone();
    if run.config().normalize_levels {
        let level = floor_level(run, floor);
        for unit in party.units.iter_mut() {
            *unit = normalize_unit(unit, level);
        }
    }
    for unit in party.units.iter_mut() {
        unit.reset_battle_state();
    }

    let scaling = calculate_enemy_scaling(floor.floor_number, run.difficulty(), run.config());
    let (enemies, sources) = spawn_enemies(content, &encounter.enemies, |_, unit| {
        scale_enemy_unit(unit, &scaling)
    })?;

    let seed = compute_seed(
        run.seed(),
        run.floor_index() as u64,
        floor.floor_number,
        roll::FLOOR,
    );
    tracing::info!(
        floor = floor.floor_number,
        encounter = %encounter_id,
        multiplier = scaling.stat_multiplier,
        "floor battle prepared"
    );
    Ok(BattleState::with_sources(party, enemies, sources, config, seed)?)
}

impl BattleSummary {
    /// Summarizes a finished battle for [`TowerRunState::record_battle_result`].
    ///
    /// `rewards` are the battle spoils, usually from
    /// [`BattleState::calculate_rewards`].
    pub fn from_battle(battle: &BattleState, rewards: BattleRewards) -> Result<Self, TowerError> {
        let outcome = match battle.status() {
            BattleStatus::PlayerVictory => BattleOutcome::Victory,
            BattleStatus::PlayerDefeat => BattleOutcome::Defeat,
            BattleStatus::Ongoing => return Err(TowerError::BattleNotFinished),
        };
        let units = &battle.player_team().units;
        Ok(Self {
            outcome,
            turns: battle.round(),
            damage_dealt: units.iter().map(|unit| unit.damage_dealt).sum(),
            damage_taken: units.iter().map(|unit| unit.damage_taken).sum(),
            rewards,
        })
    }
}

/// Copies post-battle HP from the battle party back onto the campaign team.
///
/// HP is carried as an absolute value, capped at the campaign unit's max HP.
pub fn carry_battle_hp(team: &mut Team, battle_team: &Team) {
    for unit in team.units.iter_mut() {
        if let Some(fought) = battle_team.unit(&unit.id) {
            unit.current_hp = fought.current_hp.min(unit.max_hp());
        }
    }
}

/// Applies the current rest floor to `team` and returns the summary to pass
/// to [`TowerRunState::complete_rest_floor`].
///
/// Living units heal by the floor's heal fraction of their max HP; fallen
/// units are revived at that fraction. Statuses and cooldowns are cleared.
pub fn apply_rest(
    run: &TowerRunState,
    team: &mut Team,
    loadout_changed: bool,
) -> Result<RestSummary, TowerError> {
    if run.is_completed() {
        return Err(TowerError::RunFinished);
    }
    let floor = run.current_floor().ok_or(TowerError::RunFinished)?;
    let FloorKind::Rest {
        allow_loadout_change,
        heal_fraction,
    } = &floor.kind
    else {
        return Err(TowerError::NotRestFloor(floor.id.clone()));
    };

    let fraction = heal_fraction
        .unwrap_or(run.config().default_rest_heal_fraction)
        .clamp(0.0, 1.0);
    let percent = (fraction * 100.0).round() as u8;

    let mut hp_restored = 0;
    let mut units_revived = 0;
    for unit in team.units.iter_mut() {
        unit.reset_battle_state();
        if unit.is_alive() {
            let amount = (f64::from(unit.max_hp()) * fraction).floor() as u32;
            hp_restored += unit.heal(amount);
        } else if percent > 0 {
            hp_restored += unit.revive(percent);
            units_revived += 1;
        }
    }

    let summary = RestSummary {
        heal_fraction: fraction,
        hp_restored,
        units_revived,
        loadout_changed: loadout_changed && *allow_loadout_change,
    };
    tracing::debug!(
        floor = floor.floor_number,
        hp_restored,
        units_revived,
        "party rested"
    );
    Ok(summary)
}
