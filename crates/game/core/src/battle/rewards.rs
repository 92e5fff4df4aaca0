//! Victory rewards and their application to the campaign team.

use super::error::BattleError;
use super::phase::BattleStatus;
use super::state::BattleState;
use crate::env::{GameEnv, compute_seed, roll};
use crate::state::{EquipmentId, Team, UnitId};

/// Spoils of a won battle.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleRewards {
    pub xp: u32,
    pub gold: u32,
    pub drops: Vec<EquipmentId>,
}

impl BattleRewards {
    pub fn is_empty(&self) -> bool {
        self.xp == 0 && self.gold == 0 && self.drops.is_empty()
    }

    /// Adds `other` onto `self`.
    pub fn merge(&mut self, other: &BattleRewards) {
        self.xp = self.xp.saturating_add(other.xp);
        self.gold = self.gold.saturating_add(other.gold);
        self.drops.extend(other.drops.iter().cloned());
    }
}

/// A unit that gained levels from a reward.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LevelUp {
    pub unit: UnitId,
    pub from: u8,
    pub to: u8,
}

impl BattleState {
    /// XP, gold and rolled drops from every enemy built from a template.
    ///
    /// Returns empty rewards unless the player won. Each drop roll is seeded
    /// from the battle seed, the final round and the roll's position in the
    /// drop tables, so repeated calls agree and the battle is not touched.
    pub fn calculate_rewards(&self, env: &GameEnv<'_>) -> Result<BattleRewards, BattleError> {
        if self.status != BattleStatus::PlayerVictory {
            return Ok(BattleRewards::default());
        }
        let content = env.content()?;
        let rng = env.rng()?;

        let mut rewards = BattleRewards::default();
        let mut roll_index = 0u64;
        for enemy_id in self.enemy_sources.values() {
            let enemy = content.require_enemy(enemy_id)?;
            rewards.xp = rewards.xp.saturating_add(enemy.xp_reward);
            rewards.gold = rewards.gold.saturating_add(enemy.gold_reward);
            for drop in &enemy.drops {
                let seed = compute_seed(self.seed, roll_index, self.round, roll::DROP);
                roll_index += 1;
                if rng.chance(seed, drop.chance) {
                    rewards.drops.push(drop.item.clone());
                }
            }
        }
        tracing::info!(
            xp = rewards.xp,
            gold = rewards.gold,
            drops = rewards.drops.len(),
            "battle rewards"
        );
        Ok(rewards)
    }
}

/// Grants the reward XP to every living unit of `team`.
pub fn apply_rewards(team: &mut Team, rewards: &BattleRewards) -> Vec<LevelUp> {
    let mut level_ups = Vec::new();
    for unit in team.units.iter_mut().filter(|unit| unit.is_alive()) {
        let from = unit.level;
        if unit.gain_xp(rewards.xp) > 0 {
            tracing::info!(unit = %unit.id, from, to = unit.level, "level up");
            level_ups.push(LevelUp {
                unit: unit.id.clone(),
                from,
                to: unit.level,
            });
        }
    }
    level_ups
}
