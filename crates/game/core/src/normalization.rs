//! Level normalization for tower floors.
//!
//! Tower battles run the party at a floor-determined level instead of its
//! campaign level. Normalized units are battle copies: their stats are frozen
//! at the target level and `current_hp` is carried over untouched.

use crate::state::Unit;
use crate::stats::{GrowthRates, StatKind, Stats};

/// How a floor number maps to the level the party is normalized to.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ProgressionCurve {
    /// Rounds up to the next multiple of five.
    #[default]
    Stepped,
    /// Level equals floor number.
    Linear,
    /// `5 + 1.5 * floor`, capped at [`EXPONENTIAL_LEVEL_CAP`].
    Exponential,
}

pub const EXPONENTIAL_LEVEL_CAP: u32 = 50;

/// Flat per-level growth used for normalization, in tenths of a point.
const fn flat_growth_tenths(kind: StatKind) -> i64 {
    match kind {
        StatKind::Hp => 50,
        StatKind::Pp | StatKind::Spd => 15,
        StatKind::Atk | StatKind::Def | StatKind::Mag => 25,
    }
}

/// Lowest value a rescaled stat may take.
const fn stat_floor(kind: StatKind) -> i64 {
    match kind {
        StatKind::Hp | StatKind::Atk | StatKind::Def | StatKind::Mag => 1,
        StatKind::Pp | StatKind::Spd => 0,
    }
}

/// Target level for `floor_number` under `curve`.
pub fn calculate_floor_target_level(floor_number: u32, curve: ProgressionCurve) -> u32 {
    match curve {
        ProgressionCurve::Stepped => floor_number.div_ceil(5) * 5,
        ProgressionCurve::Linear => floor_number,
        ProgressionCurve::Exponential => {
            (5 + floor_number.saturating_mul(3) / 2).min(EXPONENTIAL_LEVEL_CAP)
        }
    }
}

/// Rescales `stats` from `from_level` to `to_level` with the fixed flat growth
/// table (hp +5, pp +1.5, atk/def/mag +2.5, spd +1.5 per level).
///
/// Each per-stat growth is floored, and the result never drops below 1 for
/// hp/atk/def/mag or 0 for pp/spd.
pub fn calculate_level_scaled_stats(stats: &Stats, from_level: u32, to_level: u32) -> Stats {
    let delta = i64::from(to_level) - i64::from(from_level);
    stats.map(|kind, value| {
        let growth = (flat_growth_tenths(kind) * delta).div_euclid(10);
        clamp_stat(kind, i64::from(value) + growth)
    })
}

/// Rescales `stats` using a unit's own growth rates instead of the flat table.
pub fn calculate_stats_with_growth_rates(
    stats: &Stats,
    growth: &GrowthRates,
    from_level: u32,
    to_level: u32,
) -> Stats {
    let delta = i64::from(to_level) - i64::from(from_level);
    stats.map(|kind, value| clamp_stat(kind, i64::from(value) + i64::from(growth.get(kind)) * delta))
}

fn clamp_stat(kind: StatKind, value: i64) -> u32 {
    u32::try_from(value.max(stat_floor(kind))).unwrap_or(u32::MAX)
}

/// Battle copy of `unit` at `target_level`.
///
/// The unit's base stats are rescaled from its level with
/// [`calculate_level_scaled_stats`] and frozen (zero growth), so the copy's
/// max HP is the rescaled HP. `current_hp`, XP,
/// equipment and unlocked abilities are kept as they are.
pub fn normalize_unit(unit: &Unit, target_level: u32) -> Unit {
    let stats =
        calculate_level_scaled_stats(&unit.base_stats, u32::from(unit.level), target_level);
    let mut normalized = unit.clone();
    normalized.base_stats = stats;
    normalized.growth_rates = GrowthRates::ZERO;
    normalized.level = u8::try_from(target_level).unwrap_or(u8::MAX);
    tracing::debug!(
        unit = %unit.id,
        from = unit.level,
        to = target_level,
        hp = stats.hp,
        "normalized unit"
    );
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Element, UnitDefinition, UnitId, UnitRole};

    fn unit_at(level: u8) -> Unit {
        let definition = UnitDefinition {
            id: UnitId::new("garet"),
            name: "Garet".into(),
            element: Element::Mars,
            role: UnitRole::Tank,
            base_stats: Stats::new(20, 6, 9, 7, 4, 5),
            growth_rates: GrowthRates {
                hp: 5,
                pp: 1,
                atk: 2,
                def: 2,
                mag: 1,
                spd: 1,
            },
            mana_contribution: 2,
            abilities: Vec::new(),
        };
        Unit::from_definition(&definition, level)
    }

    #[test]
    fn stepped_curve_steps_at_multiples_of_five() {
        let levels: Vec<u32> = (1..=11)
            .map(|floor| calculate_floor_target_level(floor, ProgressionCurve::Stepped))
            .collect();
        assert_eq!(levels, vec![5, 5, 5, 5, 5, 10, 10, 10, 10, 10, 15]);
    }

    #[test]
    fn curves_are_non_decreasing_and_exponential_is_capped() {
        for curve in [
            ProgressionCurve::Stepped,
            ProgressionCurve::Linear,
            ProgressionCurve::Exponential,
        ] {
            let mut previous = 0;
            for floor in 1..=200 {
                let level = calculate_floor_target_level(floor, curve);
                assert!(level >= previous, "{curve} dropped at floor {floor}");
                previous = level;
            }
        }
        assert_eq!(calculate_floor_target_level(3, ProgressionCurve::Exponential), 9);
        assert_eq!(
            calculate_floor_target_level(1_000, ProgressionCurve::Exponential),
            EXPONENTIAL_LEVEL_CAP
        );
        assert_eq!(calculate_floor_target_level(7, ProgressionCurve::Linear), 7);
    }

    #[test]
    fn level_scaling_is_identity_at_same_level() {
        let stats = Stats::new(20, 4, 9, 7, 5, 6);
        assert_eq!(calculate_level_scaled_stats(&stats, 8, 8), stats);
    }

    #[test]
    fn level_scaling_floors_fractional_growth() {
        let stats = Stats::new(20, 4, 9, 7, 5, 6);
        let scaled = calculate_level_scaled_stats(&stats, 3, 10);
        assert_eq!(scaled, Stats::new(55, 14, 26, 24, 22, 16));
    }

    #[test]
    fn level_scaling_down_respects_minimums() {
        let stats = Stats::new(10, 2, 3, 3, 3, 1);
        let scaled = calculate_level_scaled_stats(&stats, 20, 1);
        assert_eq!(scaled, Stats::new(1, 0, 1, 1, 1, 0));
    }

    #[test]
    fn level_scaling_is_monotonic_in_target_level() {
        let stats = Stats::new(30, 10, 12, 8, 6, 10);
        let mut previous = calculate_level_scaled_stats(&stats, 5, 1);
        for level in 2..=30 {
            let next = calculate_level_scaled_stats(&stats, 5, level);
            for kind in StatKind::ALL {
                assert!(next.get(kind) >= previous.get(kind));
            }
            previous = next;
        }
    }

    #[test]
    fn growth_rate_scaling_uses_unit_rates() {
        let stats = Stats::new(20, 4, 9, 7, 5, 6);
        let growth = GrowthRates {
            hp: 4,
            pp: 1,
            atk: 3,
            def: 1,
            mag: 0,
            spd: 2,
        };
        assert_eq!(
            calculate_stats_with_growth_rates(&stats, &growth, 2, 4),
            Stats::new(28, 6, 15, 9, 5, 10)
        );
        assert_eq!(calculate_stats_with_growth_rates(&stats, &growth, 4, 4), stats);
    }

    #[test]
    fn normalizing_to_stepped_floor_level() {
        let unit = unit_at(3);
        assert_eq!(unit.max_hp(), 30);

        let target = calculate_floor_target_level(7, ProgressionCurve::Stepped);
        assert_eq!(target, 10);
        let normalized = normalize_unit(&unit, target);

        assert_eq!(normalized.level, 10);
        assert_eq!(normalized.max_hp(), 55);
        assert_eq!(normalized.stats().hp, 55);
        assert_eq!(normalized.stats().atk, 9 + 17);
    }

    #[test]
    fn normalization_keeps_current_hp() {
        let mut unit = unit_at(10);
        unit.take_damage(30);
        let hurt = unit.current_hp;

        let lower = normalize_unit(&unit, 1);
        assert_eq!(lower.current_hp, hurt);
        assert!(lower.current_hp > lower.max_hp());
        assert_eq!(lower.hp_fraction(), 1.0);

        let higher = normalize_unit(&unit, 20);
        assert_eq!(higher.current_hp, hurt);
        assert!(higher.hp_fraction() < unit.hp_fraction());
    }
}
