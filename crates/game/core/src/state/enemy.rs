//! Enemy definitions and the conversions between enemies and units.

use std::collections::BTreeMap;

use super::common::{AbilityId, EnemyId, EquipmentId, UnitId};
use super::element::Element;
use super::equipment::EquipmentLoadout;
use super::status::StatusEffects;
use super::unit::{Unit, UnitAbility, UnitDefinition, UnitRole};
use crate::config::GameConfig;
use crate::stats::{GrowthRates, Stats};

/// One entry in an enemy's drop table.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DropEntry {
    pub item: EquipmentId,
    /// Percent chance (0-100) that the item drops on victory.
    pub chance: u8,
}

/// A read-only enemy template. Stats are fixed; enemies do not grow.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Enemy {
    pub id: EnemyId,
    pub name: String,
    pub level: u8,
    pub element: Element,
    pub stats: Stats,
    pub abilities: Vec<AbilityId>,
    pub xp_reward: u32,
    pub gold_reward: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub drops: Vec<DropEntry>,
}

/// Converts an enemy template into a battle unit.
///
/// The unit gets zero growth rates (so its stats are the template's stats at
/// any level), the generic DPS role, and no mana contribution. Every listed
/// ability is unlocked.
pub fn enemy_to_unit(enemy: &Enemy, instance_id: UnitId) -> Unit {
    let level = enemy.level.clamp(GameConfig::MIN_LEVEL, GameConfig::MAX_LEVEL);
    Unit {
        id: instance_id,
        name: enemy.name.clone(),
        element: enemy.element,
        role: UnitRole::Dps,
        base_stats: enemy.stats,
        growth_rates: GrowthRates::ZERO,
        level,
        xp: 0,
        current_hp: enemy.stats.hp,
        mana_contribution: 0,
        equipment: EquipmentLoadout::empty(),
        abilities: enemy
            .abilities
            .iter()
            .map(|ability| UnitAbility {
                ability: ability.clone(),
                unlock_level: GameConfig::MIN_LEVEL,
            })
            .collect(),
        unlocked_abilities: enemy.abilities.clone(),
        statuses: StatusEffects::empty(),
        cooldowns: BTreeMap::new(),
        damage_dealt: 0,
        damage_taken: 0,
    }
}

/// Builds an enemy template from a unit definition at `level`.
///
/// `level` is not capped at the campaign maximum, so tower floors can field
/// enemies above it. Keeps only the abilities unlocked at `level`; when none qualify the first
/// listed ability is kept so the enemy always has an action.
pub fn unit_to_enemy(
    definition: &UnitDefinition,
    level: u8,
    xp_reward: u32,
    gold_reward: u32,
) -> Enemy {
    let level = level.max(GameConfig::MIN_LEVEL);
    let mut abilities: Vec<AbilityId> = definition
        .abilities
        .iter()
        .filter(|entry| entry.unlock_level <= level)
        .map(|entry| entry.ability.clone())
        .collect();
    if abilities.is_empty() {
        abilities.extend(definition.abilities.first().map(|entry| entry.ability.clone()));
    }

    Enemy {
        id: EnemyId::new(definition.id.as_str()),
        name: definition.name.clone(),
        level,
        element: definition.element,
        stats: definition.stats_at_level(level),
        abilities,
        xp_reward,
        gold_reward,
        drops: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::unit::tests::definition;

    fn slime() -> Enemy {
        Enemy {
            id: EnemyId::new("slime"),
            name: "Slime".into(),
            level: 4,
            element: Element::Mercury,
            stats: Stats::new(40, 0, 9, 5, 3, 4),
            abilities: vec![AbilityId::new("ooze")],
            xp_reward: 12,
            gold_reward: 8,
            drops: Vec::new(),
        }
    }

    #[test]
    fn converted_enemy_has_fixed_stats_and_no_mana() {
        let unit = enemy_to_unit(&slime(), UnitId::new("slime#1"));
        assert_eq!(unit.role, UnitRole::Dps);
        assert_eq!(unit.mana_contribution, 0);
        assert_eq!(unit.growth_rates, GrowthRates::ZERO);
        assert_eq!(unit.max_hp(), 40);
        assert_eq!(unit.current_hp, 40);
        assert_eq!(unit.stats(), slime().stats);
        assert_eq!(unit.available_abilities(), vec![AbilityId::new("ooze")]);
    }

    #[test]
    fn unit_to_enemy_filters_by_unlock_level() {
        let enemy = unit_to_enemy(&definition(), 2, 10, 5);
        assert_eq!(enemy.abilities, vec![AbilityId::new("quake")]);
        assert_eq!(enemy.stats.hp, 25);

        let enemy = unit_to_enemy(&definition(), 3, 10, 5);
        assert_eq!(enemy.abilities.len(), 2);
    }

    #[test]
    fn unit_to_enemy_falls_back_to_first_ability() {
        let mut def = definition();
        for entry in &mut def.abilities {
            entry.unlock_level = 10;
        }
        let enemy = unit_to_enemy(&def, 1, 0, 0);
        assert_eq!(enemy.abilities, vec![AbilityId::new("quake")]);
    }

    #[test]
    fn unit_to_enemy_grows_past_the_campaign_level_cap() {
        let enemy = unit_to_enemy(&definition(), 30, 0, 0);
        assert_eq!(enemy.level, 30);
        assert_eq!(enemy.stats.hp, 20 + 29 * 5);
        assert_eq!(enemy.stats.spd, 7 + 29);
        assert_eq!(enemy.abilities.len(), 2);
    }
}
