//! Round resolution.
//!
//! A round resolves to completion in one call:
//!
//! 1. `Planning -> Executing`, turn order computed from effective SPD.
//! 2. Queued Djinn are summoned in queue order.
//! 3. Each living, non-incapacitated unit acts in turn order.
//! 4. Round-end sweep: status ticks and expiry, cooldowns, Djinn timers.
//! 5. `Executing -> Planning` for the next round with a refilled mana pool.
//!
//! The battle ends the moment one side is wiped out, in whichever step that
//! happens; nothing after the deciding event runs.

use super::combat::{base_damage, heal_amount, modified_damage};
use super::error::BattleError;
use super::log::{BattleEvent, DamageSource};
use super::order::compute_turn_order;
use super::phase::{BattlePhase, BattleStatus};
use super::policy::{ActionChoice, EnemyPolicy};
use super::state::BattleState;
use crate::config::DjinnRecoveryRule;
use crate::env::{ContentOracle, GameEnv, RngOracle, roll};
use crate::state::{
    Ability, AbilityKind, DjinnState, Side, StatusApplication, StatusEffect, StatusKind,
    StatusTick, SummonEffect, TargetKind, UnitId,
};
use crate::stats::StatKind;

impl BattleState {
    /// Resolves one full round and returns the battle status afterwards.
    ///
    /// On error the battle is left exactly as it was before the call, still in
    /// `Planning`.
    pub fn execute_round(
        &mut self,
        env: &GameEnv<'_>,
        enemy_policy: &dyn EnemyPolicy,
    ) -> Result<BattleStatus, BattleError> {
        self.require_phase(BattlePhase::Planning)?;
        let checkpoint = self.clone();
        self.resolve_round(env, enemy_policy).inspect_err(|err| {
            tracing::warn!(round = checkpoint.round, error = %err, "round rolled back");
            *self = checkpoint;
        })
    }

    fn resolve_round(
        &mut self,
        env: &GameEnv<'_>,
        enemy_policy: &dyn EnemyPolicy,
    ) -> Result<BattleStatus, BattleError> {
        let content = env.content()?;
        let rng = env.rng()?;

        self.transition(BattlePhase::Executing)?;
        self.turn_order = compute_turn_order(self, content);
        self.execution_index = 0;
        self.current_actor_index = 0;
        self.push_event(BattleEvent::RoundStarted {
            turn_order: self.turn_order.clone(),
        });

        if self.resolve_summons(content)? {
            return Ok(self.status);
        }

        let order = self.turn_order.clone();
        for (index, actor_id) in order.iter().enumerate() {
            self.execution_index = index;
            self.current_actor_index = index;

            let Some((actor, side)) = self.unit(actor_id) else {
                continue;
            };
            if !actor.is_alive() {
                continue;
            }
            if let Some(reason) = actor.statuses.incapacitated_by() {
                self.push_event(BattleEvent::ActionSkipped {
                    actor: actor_id.clone(),
                    reason,
                });
                continue;
            }

            let choice = match side {
                Side::Player => self.queued_choice(actor_id),
                Side::Enemy => {
                    let seed = self.next_seed(roll::ENEMY_TARGET);
                    enemy_policy.choose_action(self, actor_id, env, seed)?
                }
            };
            let ability = match &choice.ability_id {
                None => Ability::basic_attack(),
                Some(id) => content.require_ability(id)?.clone(),
            };
            self.perform_action(content, rng, actor_id, &ability, &choice.target_ids)?;

            if self.check_battle_end()? {
                return Ok(self.status);
            }
        }
        self.execution_index = order.len();

        if self.end_of_round()? {
            return Ok(self.status);
        }

        self.round += 1;
        self.player_team.begin_turn();
        self.queued_actions.iter_mut().for_each(|slot| *slot = None);
        self.queued_djinn.clear();
        self.remaining_mana = self.max_mana;
        self.transition(BattlePhase::Planning)?;
        Ok(self.status)
    }

    fn queued_choice(&self, actor_id: &UnitId) -> ActionChoice {
        self.unit_ref(actor_id)
            .and_then(|found| self.queued_actions.get(found.index))
            .and_then(Option::as_ref)
            .map(|queued| ActionChoice {
                ability_id: queued.ability_id.clone(),
                target_ids: queued.target_ids.clone(),
            })
            .unwrap_or_default()
    }

    // ========================================================================
    // Djinn summons
    // ========================================================================

    /// Summons every queued Djinn. Returns true if the battle ended.
    fn resolve_summons(&mut self, content: &dyn ContentOracle) -> Result<bool, BattleError> {
        for djinn_id in std::mem::take(&mut self.queued_djinn) {
            if self.player_team.djinn_state(&djinn_id) != Some(DjinnState::Standby) {
                continue;
            }
            let djinn = content.require_djinn(&djinn_id)?;
            let (summon, element) = (djinn.summon, djinn.element);

            self.player_team
                .transition_djinn(&djinn_id, DjinnState::Recovery)?;
            self.player_team.record_activation(&djinn_id);
            self.djinn_recovery_timers
                .insert(djinn_id.clone(), self.config.djinn_recovery_turns);
            self.push_event(BattleEvent::DjinnSummoned {
                djinn: djinn_id.clone(),
                effect: summon,
            });

            match summon {
                SummonEffect::Damage { magnitude } => {
                    for target in self.living_ids(Side::Enemy) {
                        let Some((unit, _)) = self.unit(&target) else {
                            continue;
                        };
                        let reduction = unit.statuses.damage_reduction_percent(Some(element));
                        let amount =
                            modified_damage(magnitude, Some(element), unit.element, false, reduction);
                        self.deal_damage(DamageSource::Djinn(djinn_id.clone()), &target, amount, false)?;
                    }
                }
                SummonEffect::Heal { magnitude } => {
                    for target in self.living_ids(Side::Player) {
                        self.heal_unit(&target, magnitude);
                    }
                }
                SummonEffect::Buff { magnitude, turns } => {
                    for target in self.living_ids(Side::Player) {
                        for stat in [StatKind::Atk, StatKind::Def] {
                            self.apply_status(
                                &target,
                                StatusEffect::Buff {
                                    stat,
                                    percent: magnitude,
                                    turns,
                                },
                            );
                        }
                    }
                }
                SummonEffect::Special { magnitude } => {
                    let roster: Vec<UnitId> =
                        self.player_team.units.iter().map(|u| u.id.clone()).collect();
                    for target in roster {
                        self.cleanse_or_revive(&target, magnitude);
                    }
                }
            }

            if self.check_battle_end()? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn cleanse_or_revive(&mut self, target: &UnitId, revive_percent: u8) {
        let Some(unit) = self.unit_mut(target) else {
            return;
        };
        if unit.is_alive() {
            let count = unit.statuses.cleanse_negative() as u32;
            if count > 0 {
                self.push_event(BattleEvent::StatusCleansed {
                    target: target.clone(),
                    count,
                });
            }
        } else {
            let hp = unit.revive(revive_percent);
            self.push_event(BattleEvent::UnitRevived {
                unit: target.clone(),
                hp,
            });
        }
    }

    // ========================================================================
    // Unit actions
    // ========================================================================

    fn perform_action(
        &mut self,
        content: &dyn ContentOracle,
        rng: &dyn RngOracle,
        actor_id: &UnitId,
        ability: &Ability,
        requested: &[UnitId],
    ) -> Result<(), BattleError> {
        let (_, side) = self
            .unit(actor_id)
            .ok_or_else(|| BattleError::UnknownUnit(actor_id.clone()))?;
        let actor_stats = self
            .effective_stats(content, actor_id)
            .ok_or_else(|| BattleError::UnknownUnit(actor_id.clone()))?;

        let targets = self.resolve_targets(actor_id, side, ability.target, requested);
        if targets.is_empty() {
            return Ok(());
        }

        self.push_event(BattleEvent::AbilityUsed {
            actor: actor_id.clone(),
            ability: ability.id.clone(),
            targets: targets.clone(),
        });
        if ability.cooldown > 0
            && let Some(actor) = self.unit_mut(actor_id)
        {
            // +1 so the round-end sweep of this round does not eat a round
            actor.start_cooldown(&ability.id, ability.cooldown.saturating_add(1));
        }

        for target in &targets {
            if !self.is_alive(target) {
                continue;
            }

            match ability.kind {
                AbilityKind::Physical | AbilityKind::Psynergy => {
                    let target_stats = self
                        .effective_stats(content, target)
                        .ok_or_else(|| BattleError::UnknownUnit(target.clone()))?;
                    let Some((target_unit, _)) = self.unit(target) else {
                        continue;
                    };
                    let reduction = target_unit
                        .statuses
                        .damage_reduction_percent(ability.element);
                    let defender_element = target_unit.element;

                    let critical = ability.kind == AbilityKind::Physical && {
                        let seed = self.next_seed(roll::CRIT);
                        rng.chance(seed, self.config.crit_chance_percent)
                    };
                    let base = base_damage(ability.kind, &actor_stats, &target_stats, ability.power);
                    let amount =
                        modified_damage(base, ability.element, defender_element, critical, reduction);
                    self.deal_damage(
                        DamageSource::Unit(actor_id.clone()),
                        target,
                        amount,
                        critical,
                    )?;
                }
                AbilityKind::Healing => {
                    self.heal_unit(target, heal_amount(&actor_stats, ability.power));
                }
                AbilityKind::Buff | AbilityKind::Debuff => {}
            }

            if let Some(application) = &ability.status {
                self.roll_status(rng, target, application);
            }
        }
        Ok(())
    }

    /// Final targets of an action.
    ///
    /// A single-target action whose requested target is gone retargets to the
    /// first living unit of the right side in roster order.
    fn resolve_targets(
        &self,
        actor_id: &UnitId,
        side: Side,
        kind: TargetKind,
        requested: &[UnitId],
    ) -> Vec<UnitId> {
        let valid = |id: &UnitId, wanted: Side| {
            self.unit(id)
                .is_some_and(|(unit, unit_side)| unit_side == wanted && unit.is_alive())
        };
        match kind {
            TargetKind::SingleEnemy => {
                let foes = side.opponent();
                requested
                    .first()
                    .filter(|id| valid(id, foes))
                    .cloned()
                    .or_else(|| self.living_ids(foes).into_iter().next())
                    .into_iter()
                    .collect()
            }
            TargetKind::SingleAlly => requested
                .first()
                .filter(|id| valid(id, side))
                .cloned()
                .or_else(|| Some(actor_id.clone()))
                .into_iter()
                .collect(),
            TargetKind::AllEnemies => self.living_ids(side.opponent()),
            TargetKind::AllAllies => self.living_ids(side),
            TargetKind::SelfOnly => vec![actor_id.clone()],
        }
    }

    fn is_alive(&self, id: &UnitId) -> bool {
        self.unit(id).is_some_and(|(unit, _)| unit.is_alive())
    }

    // ========================================================================
    // Effects
    // ========================================================================

    /// Applies already-computed damage to `target`.
    ///
    /// Invulnerability blocks everything; shields block hits from units and
    /// Djinn but not status ticks. A lethal hit consumes an auto-revive if one
    /// is active.
    fn deal_damage(
        &mut self,
        source: DamageSource,
        target: &UnitId,
        amount: u32,
        critical: bool,
    ) -> Result<u32, BattleError> {
        let unit = self
            .unit_mut(target)
            .ok_or_else(|| BattleError::UnknownUnit(target.clone()))?;

        if unit.statuses.is_invulnerable() {
            self.push_event(BattleEvent::DamageBlocked {
                target: target.clone(),
                by: StatusKind::Invulnerable,
            });
            return Ok(0);
        }
        if !matches!(source, DamageSource::Status(_)) && unit.statuses.consume_shield() {
            self.push_event(BattleEvent::DamageBlocked {
                target: target.clone(),
                by: StatusKind::Shield,
            });
            return Ok(0);
        }

        let taken = unit.take_damage(amount);
        let remaining_hp = unit.current_hp;
        let defeated = !unit.is_alive();
        let revived = if defeated {
            let revive = unit.statuses.take_auto_revive();
            unit.statuses.clear();
            revive.map(|percent| unit.revive(percent))
        } else {
            None
        };

        if let DamageSource::Unit(attacker) = &source
            && let Some(attacker) = self.unit_mut(attacker)
        {
            attacker.damage_dealt += u64::from(taken);
        }

        self.push_event(BattleEvent::Damage {
            source,
            target: target.clone(),
            amount: taken,
            critical,
            remaining_hp,
        });
        if defeated {
            self.push_event(BattleEvent::UnitDefeated {
                unit: target.clone(),
            });
        }
        if let Some(hp) = revived {
            self.push_event(BattleEvent::UnitRevived {
                unit: target.clone(),
                hp,
            });
        }
        Ok(taken)
    }

    fn heal_unit(&mut self, target: &UnitId, amount: u32) -> u32 {
        let Some(unit) = self.unit_mut(target) else {
            return 0;
        };
        if !unit.is_alive() {
            return 0;
        }
        let healed = unit.heal(amount);
        let remaining_hp = unit.current_hp;
        self.push_event(BattleEvent::Healed {
            target: target.clone(),
            amount: healed,
            remaining_hp,
        });
        healed
    }

    fn roll_status(&mut self, rng: &dyn RngOracle, target: &UnitId, application: &StatusApplication) {
        if !self.is_alive(target) {
            return;
        }
        let seed = self.next_seed(roll::STATUS);
        if !rng.chance(seed, application.chance) {
            self.push_event(BattleEvent::StatusResisted {
                target: target.clone(),
                status: application.effect.kind(),
            });
            return;
        }
        self.apply_status(target, application.effect.clone());
    }

    fn apply_status(&mut self, target: &UnitId, effect: StatusEffect) {
        let Some(unit) = self.unit_mut(target) else {
            return;
        };
        let status = effect.kind();
        let outcome = unit.statuses.apply(effect);
        self.push_event(BattleEvent::StatusApplied {
            target: target.clone(),
            status,
            outcome,
        });
    }

    // ========================================================================
    // Round-end sweep
    // ========================================================================

    /// Status ticks, cooldowns and Djinn timers. Returns true if the battle ended.
    fn end_of_round(&mut self) -> Result<bool, BattleError> {
        for side in [Side::Player, Side::Enemy] {
            let ids: Vec<UnitId> = self.side_units(side).iter().map(|u| u.id.clone()).collect();
            for id in ids {
                let Some(unit) = self.unit_mut(&id) else {
                    continue;
                };
                unit.tick_cooldowns();
                if !unit.is_alive() {
                    continue;
                }
                for tick in unit.statuses.end_of_round() {
                    match tick {
                        StatusTick::Damage { kind, amount } => {
                            self.deal_damage(DamageSource::Status(kind), &id, amount, false)?;
                        }
                        StatusTick::Heal { amount } => {
                            self.heal_unit(&id, amount);
                        }
                        StatusTick::Expired { kind } => {
                            self.push_event(BattleEvent::StatusExpired {
                                target: id.clone(),
                                status: kind,
                            });
                        }
                    }
                }
                if self.check_battle_end()? {
                    return Ok(true);
                }
            }
        }

        self.tick_djinn_timers()?;
        self.push_event(BattleEvent::RoundEnded);
        Ok(false)
    }

    /// Counts recovery timers down; a Djinn whose timer reaches zero leaves
    /// `Recovery` for the configured state.
    fn tick_djinn_timers(&mut self) -> Result<(), BattleError> {
        let target = match self.config.djinn_recovery_rule {
            DjinnRecoveryRule::ReturnToStandby => DjinnState::Standby,
            DjinnRecoveryRule::ReturnToSet => DjinnState::Set,
        };

        let mut recovered = Vec::new();
        for (id, timer) in self.djinn_recovery_timers.iter_mut() {
            *timer = timer.saturating_sub(1);
            if *timer == 0 {
                recovered.push(id.clone());
            }
        }
        for id in recovered {
            self.djinn_recovery_timers.remove(&id);
            if self.player_team.djinn_state(&id) != Some(DjinnState::Recovery) {
                continue;
            }
            self.player_team.transition_djinn(&id, target)?;
            self.push_event(BattleEvent::DjinnRecovered {
                djinn: id,
                state: target,
            });
        }
        Ok(())
    }
}
