//! Planning-phase operations: the per-unit action queue, the shared mana pool
//! and Djinn queueing.
//!
//! Every operation here is reversible while the battle stays in planning;
//! unqueueing refunds exactly the mana that queueing took.

use super::error::BattleError;
use super::phase::BattlePhase;
use super::state::{BattleState, QueuedAction};
use crate::config::GameConfig;
use crate::env::ContentOracle;
use crate::state::{Ability, AbilityId, DjinnId, DjinnState, Side, TargetKind, UnitId};

impl BattleState {
    /// Queues an action for a player unit, replacing whatever was queued.
    ///
    /// `ability_id == None` queues a free basic attack. Targets are required
    /// for single-target abilities; area and self abilities resolve their
    /// targets at execution time and ignore `target_ids`.
    pub fn queue_action(
        &mut self,
        content: &dyn ContentOracle,
        unit_id: &UnitId,
        ability_id: Option<AbilityId>,
        target_ids: Vec<UnitId>,
    ) -> Result<(), BattleError> {
        self.require_phase(BattlePhase::Planning)?;
        let slot = self.player_slot(unit_id)?;

        let unit = &self.player_team.units[slot];
        if !unit.is_alive() {
            return Err(BattleError::UnitDefeated(unit_id.clone()));
        }

        let ability = match &ability_id {
            None => Ability::basic_attack(),
            Some(id) => {
                let available = self.available_abilities(content, unit_id).unwrap_or_default();
                if !available.contains(id) {
                    return Err(BattleError::AbilityUnavailable {
                        unit: unit_id.clone(),
                        ability: id.clone(),
                    });
                }
                let rounds = unit.cooldown(id);
                if rounds > 0 {
                    return Err(BattleError::AbilityOnCooldown {
                        ability: id.clone(),
                        rounds,
                    });
                }
                content.require_ability(id)?.clone()
            }
        };
        if ability.mana_cost > GameConfig::MAX_MANA_COST {
            return Err(BattleError::ManaCostOutOfRange {
                ability: ability.id,
                cost: ability.mana_cost,
            });
        }

        let target_ids = self.validate_targets(&ability, target_ids)?;

        let refund = self.queued_actions[slot]
            .as_ref()
            .map_or(0, |queued| u32::from(queued.mana_cost));
        let available = self.remaining_mana + refund;
        let required = u32::from(ability.mana_cost);
        if required > available {
            return Err(BattleError::InsufficientMana {
                required,
                available,
            });
        }

        self.remaining_mana = available - required;
        self.queued_actions[slot] = Some(QueuedAction {
            unit_id: unit_id.clone(),
            ability_id,
            target_ids,
            mana_cost: ability.mana_cost,
        });
        tracing::debug!(
            unit = %unit_id,
            ability = %ability.id,
            remaining_mana = self.remaining_mana,
            "action queued"
        );
        Ok(())
    }

    /// Clears a unit's queued action and refunds its mana.
    pub fn unqueue_action(&mut self, unit_id: &UnitId) -> Result<Option<QueuedAction>, BattleError> {
        self.require_phase(BattlePhase::Planning)?;
        let slot = self.player_slot(unit_id)?;
        let removed = self.queued_actions[slot].take();
        if let Some(action) = &removed {
            self.remaining_mana += u32::from(action.mana_cost);
        }
        Ok(removed)
    }

    /// Marks a `Standby` Djinn to be summoned at the start of execution.
    pub fn queue_djinn(&mut self, djinn_id: &DjinnId) -> Result<(), BattleError> {
        self.require_phase(BattlePhase::Planning)?;
        let state = self.player_team.djinn_state(djinn_id);
        if state != Some(DjinnState::Standby) {
            return Err(BattleError::DjinnNotReady {
                djinn: djinn_id.clone(),
                state,
            });
        }
        if self.queued_djinn.contains(djinn_id) {
            return Err(BattleError::DjinnAlreadyQueued(djinn_id.clone()));
        }
        self.queued_djinn.push(djinn_id.clone());
        Ok(())
    }

    /// Removes a Djinn from the summon queue. Returns whether it was queued.
    pub fn unqueue_djinn(&mut self, djinn_id: &DjinnId) -> Result<bool, BattleError> {
        self.require_phase(BattlePhase::Planning)?;
        let before = self.queued_djinn.len();
        self.queued_djinn.retain(|queued| queued != djinn_id);
        Ok(self.queued_djinn.len() != before)
    }

    /// Moves a `Set` Djinn to `Standby` so it can be summoned.
    pub fn standby_djinn(&mut self, djinn_id: &DjinnId) -> Result<(), BattleError> {
        self.require_phase(BattlePhase::Planning)?;
        self.player_team
            .transition_djinn(djinn_id, DjinnState::Standby)?;
        Ok(())
    }

    /// Returns a `Standby` Djinn to `Set`, dropping it from the summon queue.
    pub fn set_djinn(&mut self, djinn_id: &DjinnId) -> Result<(), BattleError> {
        self.require_phase(BattlePhase::Planning)?;
        self.player_team.transition_djinn(djinn_id, DjinnState::Set)?;
        self.queued_djinn.retain(|queued| queued != djinn_id);
        Ok(())
    }

    fn player_slot(&self, unit_id: &UnitId) -> Result<usize, BattleError> {
        match self.unit_ref(unit_id) {
            Some(found) if found.side == Side::Player => Ok(found.index),
            Some(_) => Err(BattleError::NotPlayerUnit(unit_id.clone())),
            None => Err(BattleError::UnknownUnit(unit_id.clone())),
        }
    }

    fn validate_targets(
        &self,
        ability: &Ability,
        target_ids: Vec<UnitId>,
    ) -> Result<Vec<UnitId>, BattleError> {
        let side = match ability.target {
            TargetKind::SingleEnemy => Side::Enemy,
            TargetKind::SingleAlly => Side::Player,
            TargetKind::AllEnemies | TargetKind::AllAllies | TargetKind::SelfOnly => {
                return Ok(Vec::new());
            }
        };

        if target_ids.len() > 1 {
            return Err(BattleError::InvalidTarget {
                ability: ability.id.clone(),
                target: target_ids[1].clone(),
            });
        }
        for target in &target_ids {
            match self.unit(target) {
                Some((unit, target_side)) if target_side == side && unit.is_alive() => {}
                Some(_) => {
                    return Err(BattleError::InvalidTarget {
                        ability: ability.id.clone(),
                        target: target.clone(),
                    });
                }
                None => return Err(BattleError::UnknownUnit(target.clone())),
            }
        }
        Ok(target_ids)
    }
}
