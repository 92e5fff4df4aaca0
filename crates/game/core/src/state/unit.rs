//! Units: the playable (and, after conversion, enemy) combatants.
//!
//! # Invariants
//!
//! - `1 <= level <= GameConfig::MAX_LEVEL`
//! - `0 <= current_hp <= max_hp()` after any damage or heal. Level
//!   normalization may leave `current_hp` above the new maximum until the next
//!   damage or heal clamps it; readers use [`Unit::hp_fraction`] which clamps.

use std::collections::BTreeMap;

use super::common::{AbilityId, UnitId};
use super::element::Element;
use super::equipment::EquipmentLoadout;
use super::status::StatusEffects;
use crate::config::GameConfig;
use crate::stats::{GrowthRates, StatBonuses, StatDelta, Stats, calculate_stats_at_level};

/// Combat role, used for Djinn ability grants.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum UnitRole {
    Tank,
    /// Generic damage dealer; also the role every converted enemy gets.
    #[default]
    Dps,
    Caster,
    Healer,
    Support,
}

/// An ability on a unit's list together with the level that unlocks it.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitAbility {
    pub ability: AbilityId,
    pub unlock_level: u8,
}

/// Static unit definition from the content tables.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitDefinition {
    pub id: UnitId,
    pub name: String,
    pub element: Element,
    pub role: UnitRole,
    pub base_stats: Stats,
    pub growth_rates: GrowthRates,
    #[cfg_attr(feature = "serde", serde(default))]
    pub mana_contribution: u8,
    #[cfg_attr(feature = "serde", serde(default))]
    pub abilities: Vec<UnitAbility>,
}

impl UnitDefinition {
    /// Stats at `level` following the growth formula.
    pub fn stats_at_level(&self, level: u8) -> Stats {
        calculate_stats_at_level(&self.base_stats, &self.growth_rates, level)
    }
}

/// Total XP needed to reach `level` from level 1.
pub const fn xp_to_reach(level: u8) -> u32 {
    let level = level as u32;
    if level <= 1 { 0 } else { 50 * (level - 1) * level }
}

/// A unit as it exists in a roster or in battle.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Unit {
    pub id: UnitId,
    pub name: String,
    pub element: Element,
    pub role: UnitRole,

    // === SSOT: stored stats ===
    pub base_stats: Stats,
    pub growth_rates: GrowthRates,
    pub level: u8,
    pub xp: u32,
    pub current_hp: u32,

    /// Contribution to the shared team mana pool. Always zero for enemies.
    pub mana_contribution: u8,

    pub equipment: EquipmentLoadout,

    pub abilities: Vec<UnitAbility>,
    pub unlocked_abilities: Vec<AbilityId>,

    pub statuses: StatusEffects,

    /// Rounds remaining before each ability can be used again.
    #[cfg_attr(feature = "serde", serde(default))]
    pub cooldowns: BTreeMap<AbilityId, u8>,

    // === Battle-lifetime counters ===
    #[cfg_attr(feature = "serde", serde(default))]
    pub damage_dealt: u64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub damage_taken: u64,
}

impl Unit {
    /// Creates a full-health unit from its definition at `level`.
    pub fn from_definition(definition: &UnitDefinition, level: u8) -> Self {
        let level = level.clamp(GameConfig::MIN_LEVEL, GameConfig::MAX_LEVEL);
        let mut unit = Self {
            id: definition.id.clone(),
            name: definition.name.clone(),
            element: definition.element,
            role: definition.role,
            base_stats: definition.base_stats,
            growth_rates: definition.growth_rates,
            level,
            xp: xp_to_reach(level),
            current_hp: 0,
            mana_contribution: definition.mana_contribution,
            equipment: EquipmentLoadout::empty(),
            abilities: definition.abilities.clone(),
            unlocked_abilities: Vec::new(),
            statuses: StatusEffects::empty(),
            cooldowns: BTreeMap::new(),
            damage_dealt: 0,
            damage_taken: 0,
        };
        unit.current_hp = unit.max_hp();
        unit.unlock_abilities();
        unit
    }

    /// Stats at the current level, without equipment or statuses.
    pub fn stats(&self) -> Stats {
        calculate_stats_at_level(&self.base_stats, &self.growth_rates, self.level)
    }

    /// `base_stats.hp + (level - 1) * growth_rates.hp`.
    pub fn max_hp(&self) -> u32 {
        self.stats().hp
    }

    /// Effective combat stats: level stats, then flat (equipment + `djinn_bonus`),
    /// then buff/debuff percentages.
    pub fn effective_stats(&self, djinn_bonus: &StatDelta) -> Stats {
        let mut bonuses = StatBonuses::new();
        bonuses.add_flat(&self.equipment.total_bonus());
        bonuses.add_flat(djinn_bonus);
        for (stat, percent) in self.statuses.stat_modifiers() {
            bonuses.add_percent(stat, percent);
        }
        bonuses.apply(&self.stats())
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.current_hp > 0
    }

    /// Current HP over max HP, clamped to `[0, 1]`.
    pub fn hp_fraction(&self) -> f32 {
        let max = self.max_hp();
        if max == 0 {
            return 0.0;
        }
        (self.current_hp.min(max) as f32) / (max as f32)
    }

    /// Reduces HP, clamping at zero. Returns the damage actually taken.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let hp = self.current_hp.min(self.max_hp());
        let taken = amount.min(hp);
        self.current_hp = hp - taken;
        self.damage_taken += u64::from(taken);
        taken
    }

    /// Restores HP, clamping at max HP. Returns the HP actually restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let max = self.max_hp();
        let hp = self.current_hp.min(max);
        let healed = amount.min(max - hp);
        self.current_hp = hp + healed;
        healed
    }

    /// Brings a defeated unit back at `percent` of max HP (at least 1).
    pub fn revive(&mut self, percent: u8) -> u32 {
        let hp = (self.max_hp() * u32::from(percent.min(100)) / 100).max(1);
        self.current_hp = hp;
        hp
    }

    /// Abilities the unit can use: unlocked ones plus those granted by equipment.
    pub fn available_abilities(&self) -> Vec<AbilityId> {
        let mut abilities = self.unlocked_abilities.clone();
        for granted in self.equipment.granted_abilities() {
            if !abilities.contains(granted) {
                abilities.push(granted.clone());
            }
        }
        abilities
    }

    pub fn cooldown(&self, ability: &AbilityId) -> u8 {
        self.cooldowns.get(ability).copied().unwrap_or(0)
    }

    pub fn start_cooldown(&mut self, ability: &AbilityId, rounds: u8) {
        if rounds > 0 {
            self.cooldowns.insert(ability.clone(), rounds);
        }
    }

    /// Decrements every cooldown by one round and drops finished ones.
    pub fn tick_cooldowns(&mut self) {
        for remaining in self.cooldowns.values_mut() {
            *remaining = remaining.saturating_sub(1);
        }
        self.cooldowns.retain(|_, remaining| *remaining > 0);
    }

    /// Adds XP and applies any level-ups. Returns the number of levels gained.
    ///
    /// Each level raises current HP by the HP growth rate and unlocks abilities
    /// whose unlock level has been reached.
    pub fn gain_xp(&mut self, amount: u32) -> u8 {
        self.xp = self.xp.saturating_add(amount);
        let mut gained = 0;
        while self.level < GameConfig::MAX_LEVEL && self.xp >= xp_to_reach(self.level + 1) {
            self.level += 1;
            self.current_hp = self.current_hp.saturating_add(self.growth_rates.hp);
            gained += 1;
        }
        if gained > 0 {
            self.unlock_abilities();
        }
        gained
    }

    fn unlock_abilities(&mut self) {
        for entry in &self.abilities {
            if entry.unlock_level <= self.level && !self.unlocked_abilities.contains(&entry.ability)
            {
                self.unlocked_abilities.push(entry.ability.clone());
            }
        }
    }

    /// Clears per-battle counters, cooldowns and statuses.
    pub fn reset_battle_state(&mut self) {
        self.statuses.clear();
        self.cooldowns.clear();
        self.damage_dealt = 0;
        self.damage_taken = 0;
    }
}
