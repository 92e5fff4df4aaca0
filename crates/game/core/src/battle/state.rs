//! Battle state and its persisted snapshot.

use std::collections::{BTreeMap, HashMap};

use super::error::BattleError;
use super::log::{BattleEvent, BattleLog};
use super::phase::{BattlePhase, BattleStatus};
use crate::config::GameConfig;
use crate::env::{ContentOracle, GameEnv, compute_seed};
use crate::state::{
    AbilityId, DjinnId, DjinnState, Encounter, EnemyId, Side, Team, Unit, UnitId, enemy_to_unit,
};
use crate::stats::{StatDelta, Stats};

/// One planned action. `ability == None` means a basic attack.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QueuedAction {
    pub unit_id: UnitId,
    pub ability_id: Option<AbilityId>,
    pub target_ids: Vec<UnitId>,
    /// 0-10, already deducted from the mana pool.
    pub mana_cost: u8,
}

/// Location of a unit inside the battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnitRef {
    pub side: Side,
    pub index: usize,
}

/// Full state of one battle.
///
/// # Invariants
///
/// - `enemies` is never empty and unit ids are unique across both sides.
/// - `queued_actions` has exactly one slot per player unit, index-aligned
///   with `player_team.units`.
/// - `remaining_mana <= max_mana`.
/// - `unit_by_id` maps every unit id on both sides and nothing else. It is
///   derived, never persisted, and rebuilt whenever the rosters change.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(from = "BattleSnapshot", into = "BattleSnapshot")
)]
pub struct BattleState {
    pub(crate) config: GameConfig,
    pub(crate) seed: u64,
    pub(crate) rng_nonce: u64,

    pub(crate) player_team: Team,
    pub(crate) enemies: Vec<Unit>,
    /// Enemy template each enemy unit was built from, for rewards.
    pub(crate) enemy_sources: BTreeMap<UnitId, EnemyId>,

    pub(crate) round: u32,
    pub(crate) phase: BattlePhase,
    pub(crate) status: BattleStatus,

    pub(crate) turn_order: Vec<UnitId>,
    pub(crate) current_actor_index: usize,
    pub(crate) execution_index: usize,

    pub(crate) queued_actions: Vec<Option<QueuedAction>>,
    pub(crate) queued_djinn: Vec<DjinnId>,
    pub(crate) remaining_mana: u32,
    pub(crate) max_mana: u32,
    pub(crate) djinn_recovery_timers: BTreeMap<DjinnId, u8>,

    pub(crate) log: BattleLog,

    unit_by_id: HashMap<UnitId, UnitRef>,
}

impl BattleState {
    /// Starts a battle in the planning phase of round 1.
    pub fn new(
        player_team: Team,
        enemies: Vec<Unit>,
        config: GameConfig,
        seed: u64,
    ) -> Result<Self, BattleError> {
        Self::with_sources(player_team, enemies, BTreeMap::new(), config, seed)
    }

    /// Starts a battle against an encounter's enemies.
    ///
    /// Enemy instances are named `<enemy id>#<n>`, numbered from 1 per template.
    pub fn from_encounter(
        player_team: Team,
        encounter: &Encounter,
        env: &GameEnv<'_>,
        config: GameConfig,
        seed: u64,
    ) -> Result<Self, BattleError> {
        let content = env.content()?;
        let (enemies, sources) = spawn_enemies(content, &encounter.enemies, |_, unit| unit)?;
        Self::with_sources(player_team, enemies, sources, config, seed)
    }

    pub(crate) fn with_sources(
        mut player_team: Team,
        enemies: Vec<Unit>,
        enemy_sources: BTreeMap<UnitId, EnemyId>,
        config: GameConfig,
        seed: u64,
    ) -> Result<Self, BattleError> {
        if enemies.is_empty() {
            return Err(BattleError::NoEnemies);
        }

        let mut timers = BTreeMap::new();
        for id in player_team.djinn_in_state(DjinnState::Recovery) {
            timers.insert(id.clone(), config.djinn_recovery_turns);
        }
        player_team.begin_turn();

        let max_mana = player_team.max_mana();
        let slots = player_team.units.len();
        let mut state = Self {
            config,
            seed,
            rng_nonce: 0,
            player_team,
            enemies,
            enemy_sources,
            round: 1,
            phase: BattlePhase::Planning,
            status: BattleStatus::Ongoing,
            turn_order: Vec::new(),
            current_actor_index: 0,
            execution_index: 0,
            queued_actions: vec![None; slots],
            queued_djinn: Vec::new(),
            remaining_mana: max_mana,
            max_mana,
            djinn_recovery_timers: timers,
            log: BattleLog::new(),
            unit_by_id: HashMap::new(),
        };
        state.try_rebuild_index()?;

        let players = state.player_team.units.iter().map(|u| u.id.clone()).collect();
        let enemies = state.enemies.iter().map(|u| u.id.clone()).collect();
        state.push_event(BattleEvent::BattleStarted { players, enemies });
        tracing::info!(
            seed,
            players = state.player_team.units.len(),
            enemies = state.enemies.len(),
            "battle started"
        );
        Ok(state)
    }

    // ========================================================================
    // Read access
    // ========================================================================

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn player_team(&self) -> &Team {
        &self.player_team
    }

    pub fn enemies(&self) -> &[Unit] {
        &self.enemies
    }

    pub fn enemy_source(&self, id: &UnitId) -> Option<&EnemyId> {
        self.enemy_sources.get(id)
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    pub fn status(&self) -> BattleStatus {
        self.status
    }

    pub fn is_over(&self) -> bool {
        self.status != BattleStatus::Ongoing
    }

    pub fn turn_order(&self) -> &[UnitId] {
        &self.turn_order
    }

    pub fn current_actor_index(&self) -> usize {
        self.current_actor_index
    }

    pub fn execution_index(&self) -> usize {
        self.execution_index
    }

    pub fn queued_actions(&self) -> &[Option<QueuedAction>] {
        &self.queued_actions
    }

    pub fn queued_djinn(&self) -> &[DjinnId] {
        &self.queued_djinn
    }

    pub fn remaining_mana(&self) -> u32 {
        self.remaining_mana
    }

    pub fn max_mana(&self) -> u32 {
        self.max_mana
    }

    pub fn djinn_recovery_timer(&self, id: &DjinnId) -> Option<u8> {
        self.djinn_recovery_timers.get(id).copied()
    }

    pub fn log(&self) -> &BattleLog {
        &self.log
    }

    /// Consumes the battle and hands back the team with its persisted deltas.
    pub fn into_team(self) -> Team {
        self.player_team
    }

    // ========================================================================
    // Unit index
    // ========================================================================

    pub fn unit_ref(&self, id: &UnitId) -> Option<UnitRef> {
        self.unit_by_id.get(id).copied()
    }

    /// Number of entries in the derived index.
    pub fn indexed_units(&self) -> usize {
        self.unit_by_id.len()
    }

    pub fn unit(&self, id: &UnitId) -> Option<(&Unit, Side)> {
        let UnitRef { side, index } = self.unit_ref(id)?;
        let unit = match side {
            Side::Player => self.player_team.units.get(index),
            Side::Enemy => self.enemies.get(index),
        }?;
        Some((unit, side))
    }

    pub(crate) fn unit_mut(&mut self, id: &UnitId) -> Option<&mut Unit> {
        let UnitRef { side, index } = self.unit_ref(id)?;
        match side {
            Side::Player => self.player_team.units.get_mut(index),
            Side::Enemy => self.enemies.get_mut(index),
        }
    }

    pub(crate) fn side_units(&self, side: Side) -> &[Unit] {
        match side {
            Side::Player => &self.player_team.units,
            Side::Enemy => &self.enemies,
        }
    }

    pub(crate) fn living_ids(&self, side: Side) -> Vec<UnitId> {
        self.side_units(side)
            .iter()
            .filter(|unit| unit.is_alive())
            .map(|unit| unit.id.clone())
            .collect()
    }

    /// Rebuilds `unit_by_id` from the rosters.
    pub fn rebuild_index(&mut self) {
        self.unit_by_id = build_index(&self.player_team.units, &self.enemies);
    }

    fn try_rebuild_index(&mut self) -> Result<(), BattleError> {
        let mut index = HashMap::new();
        let sides = [
            (Side::Player, self.player_team.units.as_slice()),
            (Side::Enemy, self.enemies.as_slice()),
        ];
        for (side, units) in sides {
            for (i, unit) in units.iter().enumerate() {
                if index.insert(unit.id.clone(), UnitRef { side, index: i }).is_some() {
                    return Err(BattleError::DuplicateUnitId(unit.id.clone()));
                }
            }
        }
        self.unit_by_id = index;
        Ok(())
    }

    /// Replaces the player team (e.g. after an out-of-battle equipment change)
    /// and rebuilds the index.
    pub fn replace_player_team(&mut self, team: Team) -> Result<(), BattleError> {
        let previous = std::mem::replace(&mut self.player_team, team);
        if let Err(err) = self.try_rebuild_index() {
            self.player_team = previous;
            return Err(err);
        }
        self.queued_actions = vec![None; self.player_team.units.len()];
        self.queued_djinn.clear();
        self.max_mana = self.player_team.max_mana();
        self.remaining_mana = self.max_mana;
        Ok(())
    }

    // ========================================================================
    // Internal helpers shared by planning and resolution
    // ========================================================================

    pub(crate) fn push_event(&mut self, event: BattleEvent) {
        self.log.push(self.round, event);
    }

    pub(crate) fn transition(&mut self, to: BattlePhase) -> Result<(), BattleError> {
        if !self.phase.can_transition_to(to) {
            tracing::warn!(from = %self.phase, to = %to, "illegal battle phase transition");
            return Err(BattleError::IllegalTransition {
                from: self.phase,
                to,
            });
        }
        self.phase = to;
        Ok(())
    }

    pub(crate) fn require_phase(&self, expected: BattlePhase) -> Result<(), BattleError> {
        if self.phase != expected {
            return Err(BattleError::WrongPhase {
                expected,
                actual: self.phase,
            });
        }
        Ok(())
    }

    /// Seed for the next random roll; advances the roll counter.
    pub(crate) fn next_seed(&mut self, context: u32) -> u64 {
        let seed = compute_seed(self.seed, self.rng_nonce, self.round, context);
        self.rng_nonce += 1;
        seed
    }

    /// Flat bonus every player unit receives from `Set` Djinn.
    pub fn djinn_bonus(&self, content: &dyn ContentOracle) -> StatDelta {
        self.player_team
            .djinn_in_state(DjinnState::Set)
            .filter_map(|id| content.djinn(id))
            .map(|djinn| djinn.set_bonus)
            .sum()
    }

    /// Effective combat stats of a unit, including Djinn bonuses for players.
    pub fn effective_stats(&self, content: &dyn ContentOracle, id: &UnitId) -> Option<Stats> {
        let (unit, side) = self.unit(id)?;
        let bonus = match side {
            Side::Player => self.djinn_bonus(content),
            Side::Enemy => StatDelta::ZERO,
        };
        Some(unit.effective_stats(&bonus))
    }

    /// Abilities a unit may use: its own, equipment grants and, for player
    /// units, grants from `Set` Djinn.
    pub fn available_abilities(
        &self,
        content: &dyn ContentOracle,
        id: &UnitId,
    ) -> Option<Vec<AbilityId>> {
        let (unit, side) = self.unit(id)?;
        let mut abilities = unit.available_abilities();
        if side.is_player() {
            for djinn in self
                .player_team
                .djinn_in_state(DjinnState::Set)
                .filter_map(|id| content.djinn(id))
            {
                for granted in djinn.granted_abilities(unit.role, unit.element) {
                    if !abilities.contains(granted) {
                        abilities.push(granted.clone());
                    }
                }
            }
        }
        Some(abilities)
    }

    /// Sets the battle outcome if either side has been wiped out.
    ///
    /// Returns true when the battle ended in this call.
    pub(crate) fn check_battle_end(&mut self) -> Result<bool, BattleError> {
        if self.is_over() {
            return Ok(false);
        }
        let (status, phase) = if self.enemies.iter().all(|unit| !unit.is_alive()) {
            (BattleStatus::PlayerVictory, BattlePhase::Victory)
        } else if self.player_team.all_defeated() {
            (BattleStatus::PlayerDefeat, BattlePhase::Defeat)
        } else {
            return Ok(false);
        };

        self.transition(phase)?;
        self.status = status;
        self.push_event(BattleEvent::BattleEnded { status });
        tracing::info!(round = self.round, %status, "battle ended");
        Ok(true)
    }

    /// Returns a finished battle to `Idle`.
    pub fn reset(&mut self) -> Result<(), BattleError> {
        self.transition(BattlePhase::Idle)
    }
}

/// Builds enemy units for `enemy_ids`, numbering instances per template.
///
/// `adjust` may rewrite each unit (level scaling) before it is stored.
pub(crate) fn spawn_enemies(
    content: &dyn ContentOracle,
    enemy_ids: &[EnemyId],
    mut adjust: impl FnMut(&crate::state::Enemy, Unit) -> Unit,
) -> Result<(Vec<Unit>, BTreeMap<UnitId, EnemyId>), BattleError> {
    let mut counts: BTreeMap<&EnemyId, u32> = BTreeMap::new();
    let mut units = Vec::with_capacity(enemy_ids.len());
    let mut sources = BTreeMap::new();
    for enemy_id in enemy_ids {
        let template = content.require_enemy(enemy_id)?;
        let count = counts.entry(enemy_id).or_insert(0);
        *count += 1;
        let instance = UnitId::new(format!("{enemy_id}#{count}"));
        sources.insert(instance.clone(), enemy_id.clone());
        units.push(adjust(template, enemy_to_unit(template, instance)));
    }
    Ok((units, sources))
}

fn build_index(players: &[Unit], enemies: &[Unit]) -> HashMap<UnitId, UnitRef> {
    let players = players.iter().enumerate().map(|(index, unit)| {
        (
            unit.id.clone(),
            UnitRef {
                side: Side::Player,
                index,
            },
        )
    });
    let enemies = enemies.iter().enumerate().map(|(index, unit)| {
        (
            unit.id.clone(),
            UnitRef {
                side: Side::Enemy,
                index,
            },
        )
    });
    players.chain(enemies).collect()
}

/// Persisted form of [`BattleState`]: every field except the derived index.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleSnapshot {
    pub config: GameConfig,
    pub seed: u64,
    pub rng_nonce: u64,
    pub player_team: Team,
    pub enemies: Vec<Unit>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub enemy_sources: BTreeMap<UnitId, EnemyId>,
    pub round: u32,
    pub phase: BattlePhase,
    pub status: BattleStatus,
    pub turn_order: Vec<UnitId>,
    pub current_actor_index: usize,
    pub execution_index: usize,
    pub queued_actions: Vec<Option<QueuedAction>>,
    pub queued_djinn: Vec<DjinnId>,
    pub remaining_mana: u32,
    pub max_mana: u32,
    pub djinn_recovery_timers: BTreeMap<DjinnId, u8>,
    pub log: BattleLog,
}

impl From<BattleState> for BattleSnapshot {
    fn from(state: BattleState) -> Self {
        Self {
            config: state.config,
            seed: state.seed,
            rng_nonce: state.rng_nonce,
            player_team: state.player_team,
            enemies: state.enemies,
            enemy_sources: state.enemy_sources,
            round: state.round,
            phase: state.phase,
            status: state.status,
            turn_order: state.turn_order,
            current_actor_index: state.current_actor_index,
            execution_index: state.execution_index,
            queued_actions: state.queued_actions,
            queued_djinn: state.queued_djinn,
            remaining_mana: state.remaining_mana,
            max_mana: state.max_mana,
            djinn_recovery_timers: state.djinn_recovery_timers,
            log: state.log,
        }
    }
}

impl From<BattleSnapshot> for BattleState {
    /// Restores a battle, rebuilding the unit index.
    fn from(snapshot: BattleSnapshot) -> Self {
        let mut state = Self {
            config: snapshot.config,
            seed: snapshot.seed,
            rng_nonce: snapshot.rng_nonce,
            player_team: snapshot.player_team,
            enemies: snapshot.enemies,
            enemy_sources: snapshot.enemy_sources,
            round: snapshot.round,
            phase: snapshot.phase,
            status: snapshot.status,
            turn_order: snapshot.turn_order,
            current_actor_index: snapshot.current_actor_index,
            execution_index: snapshot.execution_index,
            queued_actions: snapshot.queued_actions,
            queued_djinn: snapshot.queued_djinn,
            remaining_mana: snapshot.remaining_mana,
            max_mana: snapshot.max_mana,
            djinn_recovery_timers: snapshot.djinn_recovery_timers,
            log: snapshot.log,
            unit_by_id: HashMap::new(),
        };
        state.rebuild_index();
        state
    }
}
