//! Floor difficulty: enemy scaling and per-floor rewards.

use super::config::{Difficulty, TowerConfig};
use super::floor::TowerFloor;
use crate::battle::BattleRewards;
use crate::state::Unit;
use crate::stats::StatKind;

/// How much stronger enemies are on a given floor.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyScaling {
    pub stat_multiplier: f64,
    pub level_delta: u32,
}

impl EnemyScaling {
    pub const NONE: Self = Self {
        stat_multiplier: 1.0,
        level_delta: 0,
    };
}

/// `stat_multiplier = 1 + (floor - 1) * per_floor (+ hard bonus)` and
/// `level_delta = floor((floor - 1) * (1.5 on hard, else 1))`.
pub fn calculate_enemy_scaling(
    floor_number: u32,
    difficulty: Difficulty,
    config: &TowerConfig,
) -> EnemyScaling {
    let steps = floor_number.saturating_sub(1);
    let hard_bonus = if difficulty.is_hard() {
        config.hard_difficulty_bonus
    } else {
        0.0
    };
    let level_delta = if difficulty.is_hard() {
        steps.saturating_mul(3) / 2
    } else {
        steps
    };
    EnemyScaling {
        stat_multiplier: 1.0 + f64::from(steps) * config.enemy_scaling_per_floor + hard_bonus,
        level_delta,
    }
}

/// Applies `scaling` to an enemy battle unit.
///
/// HP, attack, defense and magic are multiplied and floored; PP and speed are
/// left alone so turn order does not drift with the floor. The unit starts at
/// its new max HP.
pub fn scale_enemy_unit(mut unit: Unit, scaling: &EnemyScaling) -> Unit {
    unit.base_stats = unit.base_stats.map(|kind, value| match kind {
        StatKind::Hp | StatKind::Atk | StatKind::Def | StatKind::Mag => {
            scale(value, scaling.stat_multiplier).max(1)
        }
        StatKind::Pp | StatKind::Spd => value,
    });
    let level = u32::from(unit.level).saturating_add(scaling.level_delta);
    unit.level = u8::try_from(level).unwrap_or(u8::MAX);
    unit.current_hp = unit.max_hp();
    unit
}

fn scale(value: u32, multiplier: f64) -> u32 {
    // Absorbs representation error in decimal multipliers (40 * 1.45 is 58).
    let scaled = (f64::from(value) * multiplier + 1e-9).floor();
    if scaled <= 0.0 {
        0
    } else if scaled >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        scaled as u32
    }
}

/// Gold and XP granted for clearing `floor`, on top of battle spoils.
///
/// Both grow linearly with the floor number; boss floors pay the boss
/// multiplier and hard runs pay the hard bonus. Rest floors pay nothing.
pub fn calculate_floor_rewards(
    floor: &TowerFloor,
    difficulty: Difficulty,
    config: &TowerConfig,
) -> BattleRewards {
    if floor.is_rest() {
        return BattleRewards::default();
    }
    let boss = if floor.is_boss() {
        config.boss_reward_multiplier
    } else {
        1
    };
    let hard = if difficulty.is_hard() {
        1.0 + config.hard_difficulty_bonus
    } else {
        1.0
    };
    let base = |per_floor: u32| {
        let amount = per_floor
            .saturating_mul(floor.floor_number)
            .saturating_mul(boss);
        scale(amount, hard)
    };
    BattleRewards {
        xp: base(config.base_xp_per_floor),
        gold: base(config.base_gold_per_floor),
        drops: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Element, EncounterId, Enemy, EnemyId, FloorId, UnitId, enemy_to_unit};
    use crate::stats::Stats;
    use crate::tower::{DEFAULT_TOWER_CONFIG, FloorKind};

    fn floor(number: u32, kind: FloorKind) -> TowerFloor {
        TowerFloor {
            id: FloorId::new(format!("f{number}")),
            floor_number: number,
            kind,
            normalized_level: None,
        }
    }

    #[test]
    fn first_normal_floor_is_unscaled() {
        let scaling = calculate_enemy_scaling(1, Difficulty::Normal, &DEFAULT_TOWER_CONFIG);
        assert_eq!(scaling, EnemyScaling::NONE);
    }

    #[test]
    fn hard_floor_six_scaling() {
        let scaling = calculate_enemy_scaling(6, Difficulty::Hard, &DEFAULT_TOWER_CONFIG);
        assert!((scaling.stat_multiplier - 1.45).abs() < 1e-9);
        assert_eq!(scaling.level_delta, 7);
    }

    #[test]
    fn normal_level_delta_tracks_floor() {
        let scaling = calculate_enemy_scaling(10, Difficulty::Normal, &DEFAULT_TOWER_CONFIG);
        assert!((scaling.stat_multiplier - 1.36).abs() < 1e-9);
        assert_eq!(scaling.level_delta, 9);
        assert_eq!(
            calculate_enemy_scaling(0, Difficulty::Hard, &DEFAULT_TOWER_CONFIG).level_delta,
            0
        );
    }

    #[test]
    fn scaled_enemy_keeps_speed_and_starts_full() {
        let mut unit = enemy_to_unit(
            &Enemy {
                id: EnemyId::new("wolf"),
                name: "Wolf".into(),
                level: 3,
                element: Element::Jupiter,
                stats: Stats::new(40, 5, 10, 6, 3, 9),
                abilities: Vec::new(),
                xp_reward: 0,
                gold_reward: 0,
                drops: Vec::new(),
            },
            UnitId::new("wolf#1"),
        );
        unit.current_hp = 3;
        let scaling = EnemyScaling {
            stat_multiplier: 1.45,
            level_delta: 7,
        };

        let scaled = scale_enemy_unit(unit, &scaling);
        assert_eq!(scaled.base_stats, Stats::new(58, 5, 14, 8, 4, 9));
        assert_eq!(scaled.level, 10);
        assert_eq!(scaled.current_hp, 58);
    }

    #[test]
    fn floor_rewards() {
        let encounter = EncounterId::new("e");
        let normal = floor(
            4,
            FloorKind::Normal {
                encounter: encounter.clone(),
            },
        );
        let boss = floor(5, FloorKind::Boss { encounter });
        let rest = floor(
            6,
            FloorKind::Rest {
                allow_loadout_change: true,
                heal_fraction: None,
            },
        );

        let rewards = calculate_floor_rewards(&normal, Difficulty::Normal, &DEFAULT_TOWER_CONFIG);
        assert_eq!((rewards.xp, rewards.gold), (60, 80));
        let rewards = calculate_floor_rewards(&boss, Difficulty::Normal, &DEFAULT_TOWER_CONFIG);
        assert_eq!((rewards.xp, rewards.gold), (225, 300));
        let rewards = calculate_floor_rewards(&normal, Difficulty::Hard, &DEFAULT_TOWER_CONFIG);
        assert_eq!((rewards.xp, rewards.gold), (75, 100));
        assert!(calculate_floor_rewards(&rest, Difficulty::Hard, &DEFAULT_TOWER_CONFIG).is_empty());
    }
}
