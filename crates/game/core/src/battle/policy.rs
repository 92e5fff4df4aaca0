//! Action selection policies.
//!
//! Enemies act through an [`EnemyPolicy`] chosen by the caller; the engine
//! itself has no opinion on strategy. [`PlayerPolicy`] fills the player queue
//! for headless runs.

use super::error::BattleError;
use super::state::BattleState;
use crate::env::{ContentOracle, GameEnv};
use crate::state::{Ability, AbilityId, AbilityKind, DjinnState, TargetKind, Unit, UnitId};

/// What a unit does on its turn. `ability_id == None` is a basic attack.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActionChoice {
    pub ability_id: Option<AbilityId>,
    pub target_ids: Vec<UnitId>,
}

/// Chooses an enemy unit's action when its turn comes up.
///
/// `seed` is a fresh roll seed reserved for this decision.
pub trait EnemyPolicy {
    fn choose_action(
        &self,
        battle: &BattleState,
        actor: &UnitId,
        env: &GameEnv<'_>,
        seed: u64,
    ) -> Result<ActionChoice, BattleError>;
}

/// Rotates through the actor's ready abilities by round and picks a random
/// living opponent for single-target attacks.
#[derive(Clone, Copy, Debug, Default)]
pub struct ScriptedPolicy;

impl EnemyPolicy for ScriptedPolicy {
    fn choose_action(
        &self,
        battle: &BattleState,
        actor: &UnitId,
        env: &GameEnv<'_>,
        seed: u64,
    ) -> Result<ActionChoice, BattleError> {
        let (unit, side) = battle
            .unit(actor)
            .ok_or_else(|| BattleError::UnknownUnit(actor.clone()))?;
        let content = env.content()?;
        let rng = env.rng()?;

        let ready: Vec<&Ability> = unit
            .available_abilities()
            .iter()
            .filter(|id| unit.cooldown(id) == 0)
            .filter_map(|id| content.ability(id))
            .collect();

        let ability = if ready.is_empty() {
            None
        } else {
            let rotation = (battle.round().saturating_sub(1) as usize) % ready.len();
            Some(ready[rotation])
        };

        let target_kind = ability.map_or(TargetKind::SingleEnemy, |ability| ability.target);
        let target_ids = match target_kind {
            TargetKind::SingleEnemy => {
                let foes = battle.living_ids(side.opponent());
                if foes.is_empty() {
                    Vec::new()
                } else {
                    vec![foes[rng.pick(seed, foes.len())].clone()]
                }
            }
            TargetKind::SingleAlly => most_wounded(battle.side_units(side))
                .map(|ally| vec![ally.id.clone()])
                .unwrap_or_default(),
            TargetKind::AllEnemies | TargetKind::AllAllies | TargetKind::SelfOnly => Vec::new(),
        };

        Ok(ActionChoice {
            ability_id: ability.map(|ability| ability.id.clone()),
            target_ids,
        })
    }
}

/// Fills the player action queue before a round is executed.
pub trait PlayerPolicy {
    fn plan(&self, battle: &mut BattleState, content: &dyn ContentOracle)
    -> Result<(), BattleError>;
}

/// Greedy planner for headless simulation.
///
/// For each living unit without a queued action: heal the most wounded ally
/// when someone is below half HP, otherwise use the strongest affordable
/// attack on the weakest enemy, otherwise basic-attack it. Every `Standby`
/// Djinn is queued for summoning; with `unleash_djinn` set, `Set` Djinn are
/// first moved to `Standby`.
#[derive(Clone, Copy, Debug, Default)]
pub struct AutoPlanner {
    pub unleash_djinn: bool,
}

impl AutoPlanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unleashing_djinn(mut self) -> Self {
        self.unleash_djinn = true;
        self
    }

    fn pick_ability<'c>(
        battle: &BattleState,
        content: &'c dyn ContentOracle,
        unit: &Unit,
        wants_heal: bool,
    ) -> Option<&'c Ability> {
        let mana = battle.remaining_mana();
        let ready: Vec<&Ability> = battle
            .available_abilities(content, &unit.id)
            .unwrap_or_default()
            .iter()
            .filter(|id| unit.cooldown(id) == 0)
            .filter_map(|id| content.ability(id))
            .filter(|ability| u32::from(ability.mana_cost) <= mana)
            .collect();

        let strongest = |wanted: fn(AbilityKind) -> bool| {
            ready
                .iter()
                .copied()
                .filter(|ability| wanted(ability.kind))
                .max_by(|a, b| a.power.cmp(&b.power).then(b.mana_cost.cmp(&a.mana_cost)))
        };

        let heal = if wants_heal {
            strongest(|kind| kind == AbilityKind::Healing)
        } else {
            None
        };
        heal.or_else(|| strongest(AbilityKind::deals_damage))
    }
}

impl PlayerPolicy for AutoPlanner {
    fn plan(
        &self,
        battle: &mut BattleState,
        content: &dyn ContentOracle,
    ) -> Result<(), BattleError> {
        if self.unleash_djinn {
            let set: Vec<_> = battle
                .player_team()
                .djinn_in_state(DjinnState::Set)
                .cloned()
                .collect();
            for djinn in set {
                battle.standby_djinn(&djinn)?;
            }
        }
        let standby: Vec<_> = battle
            .player_team()
            .djinn_in_state(DjinnState::Standby)
            .filter(|id| !battle.queued_djinn().contains(id))
            .cloned()
            .collect();
        for djinn in standby {
            battle.queue_djinn(&djinn)?;
        }

        let roster: Vec<(usize, UnitId)> = battle
            .player_team()
            .units
            .iter()
            .enumerate()
            .filter(|(_, unit)| unit.is_alive())
            .map(|(slot, unit)| (slot, unit.id.clone()))
            .collect();

        for (slot, unit_id) in roster {
            if battle.queued_actions()[slot].is_some() {
                continue;
            }
            let Some((unit, _)) = battle.unit(&unit_id) else {
                continue;
            };
            let unit = unit.clone();

            let wounded = most_wounded(&battle.player_team().units)
                .filter(|ally| ally.current_hp * 2 < ally.max_hp())
                .map(|ally| ally.id.clone());
            let weakest = weakest(battle.enemies()).map(|enemy| enemy.id.clone());

            let choice = Self::pick_ability(battle, content, &unit, wounded.is_some());
            let (ability_id, targets) = match choice {
                Some(ability) => {
                    let targets = match ability.target {
                        TargetKind::SingleEnemy => weakest.into_iter().collect(),
                        TargetKind::SingleAlly => wounded
                            .or_else(|| Some(unit.id.clone()))
                            .into_iter()
                            .collect(),
                        _ => Vec::new(),
                    };
                    (Some(ability.id.clone()), targets)
                }
                None => (None, weakest.into_iter().collect()),
            };
            battle.queue_action(content, &unit.id, ability_id, targets)?;
        }
        Ok(())
    }
}

/// Living unit with the lowest HP fraction, first in roster order on ties.
fn most_wounded(units: &[Unit]) -> Option<&Unit> {
    units
        .iter()
        .filter(|unit| unit.is_alive())
        .min_by_key(|unit| u64::from(unit.current_hp) * 1000 / u64::from(unit.max_hp().max(1)))
}

/// Living unit with the lowest current HP, first in roster order on ties.
fn weakest(units: &[Unit]) -> Option<&Unit> {
    units
        .iter()
        .filter(|unit| unit.is_alive())
        .min_by_key(|unit| unit.current_hp)
}
