//! Base stats and level growth.
//!
//! `Stats` is an immutable snapshot. Anything derived from it (stats at a level,
//! effective stats in combat) is recomputed from the stored base values and
//! never written back.

/// The six combat stats.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stats {
    pub hp: u32,
    pub pp: u32,
    pub atk: u32,
    pub def: u32,
    pub mag: u32,
    pub spd: u32,
}

impl Stats {
    pub const ZERO: Self = Self::new(0, 0, 0, 0, 0, 0);

    pub const fn new(hp: u32, pp: u32, atk: u32, def: u32, mag: u32, spd: u32) -> Self {
        Self {
            hp,
            pp,
            atk,
            def,
            mag,
            spd,
        }
    }

    /// Reads a single stat by kind.
    pub const fn get(&self, kind: StatKind) -> u32 {
        match kind {
            StatKind::Hp => self.hp,
            StatKind::Pp => self.pp,
            StatKind::Atk => self.atk,
            StatKind::Def => self.def,
            StatKind::Mag => self.mag,
            StatKind::Spd => self.spd,
        }
    }

    /// Returns a copy with one stat replaced.
    #[must_use]
    pub fn with(mut self, kind: StatKind, value: u32) -> Self {
        match kind {
            StatKind::Hp => self.hp = value,
            StatKind::Pp => self.pp = value,
            StatKind::Atk => self.atk = value,
            StatKind::Def => self.def = value,
            StatKind::Mag => self.mag = value,
            StatKind::Spd => self.spd = value,
        }
        self
    }

    /// Applies `f` to every stat.
    #[must_use]
    pub fn map(self, mut f: impl FnMut(StatKind, u32) -> u32) -> Self {
        StatKind::ALL
            .iter()
            .fold(self, |acc, &kind| acc.with(kind, f(kind, acc.get(kind))))
    }
}

/// Per-level stat deltas for a unit definition.
///
/// Enemies use [`GrowthRates::ZERO`]; their stats never change with level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GrowthRates {
    pub hp: u32,
    pub pp: u32,
    pub atk: u32,
    pub def: u32,
    pub mag: u32,
    pub spd: u32,
}

impl GrowthRates {
    pub const ZERO: Self = Self {
        hp: 0,
        pp: 0,
        atk: 0,
        def: 0,
        mag: 0,
        spd: 0,
    };

    pub const fn get(&self, kind: StatKind) -> u32 {
        match kind {
            StatKind::Hp => self.hp,
            StatKind::Pp => self.pp,
            StatKind::Atk => self.atk,
            StatKind::Def => self.def,
            StatKind::Mag => self.mag,
            StatKind::Spd => self.spd,
        }
    }
}

/// Signed stat adjustments from equipment and Set Djinn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StatDelta {
    pub hp: i32,
    pub pp: i32,
    pub atk: i32,
    pub def: i32,
    pub mag: i32,
    pub spd: i32,
}

impl StatDelta {
    pub const ZERO: Self = Self {
        hp: 0,
        pp: 0,
        atk: 0,
        def: 0,
        mag: 0,
        spd: 0,
    };

    pub const fn get(&self, kind: StatKind) -> i32 {
        match kind {
            StatKind::Hp => self.hp,
            StatKind::Pp => self.pp,
            StatKind::Atk => self.atk,
            StatKind::Def => self.def,
            StatKind::Mag => self.mag,
            StatKind::Spd => self.spd,
        }
    }

    #[must_use]
    pub fn plus(&self, other: &StatDelta) -> StatDelta {
        StatDelta {
            hp: self.hp + other.hp,
            pp: self.pp + other.pp,
            atk: self.atk + other.atk,
            def: self.def + other.def,
            mag: self.mag + other.mag,
            spd: self.spd + other.spd,
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

impl core::iter::Sum for StatDelta {
    fn sum<I: Iterator<Item = StatDelta>>(iter: I) -> Self {
        iter.fold(StatDelta::ZERO, |acc, delta| acc.plus(&delta))
    }
}

/// Names a single stat.
#[derive(
    Clone,
    Copy,
    Debug,
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
pub enum StatKind {
    Hp,
    Pp,
    Atk,
    Def,
    Mag,
    Spd,
}

impl StatKind {
    pub const ALL: [StatKind; 6] = [
        StatKind::Hp,
        StatKind::Pp,
        StatKind::Atk,
        StatKind::Def,
        StatKind::Mag,
        StatKind::Spd,
    ];
}

/// Stats at `level`: `base + (level - 1) * growth`, per stat.
///
/// Levels below 1 are treated as level 1. There is no cap beyond the growth formula.
pub fn calculate_stats_at_level(base: &Stats, growth: &GrowthRates, level: u8) -> Stats {
    let steps = u32::from(level.max(1) - 1);
    base.map(|kind, value| value + steps * growth.get(kind))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: Stats = Stats::new(20, 10, 8, 6, 5, 7);
    const GROWTH: GrowthRates = GrowthRates {
        hp: 5,
        pp: 2,
        atk: 3,
        def: 2,
        mag: 1,
        spd: 1,
    };

    #[test]
    fn level_one_is_base() {
        assert_eq!(calculate_stats_at_level(&BASE, &GROWTH, 1), BASE);
    }

    #[test]
    fn growth_is_linear_in_level() {
        let stats = calculate_stats_at_level(&BASE, &GROWTH, 5);
        assert_eq!(stats, Stats::new(40, 18, 20, 14, 9, 11));
    }

    #[test]
    fn monotonic_over_all_levels() {
        let mut previous = calculate_stats_at_level(&BASE, &GROWTH, 1);
        for level in 2..=20 {
            let next = calculate_stats_at_level(&BASE, &GROWTH, level);
            for kind in StatKind::ALL {
                assert!(next.get(kind) >= previous.get(kind), "{kind} fell at level {level}");
            }
            previous = next;
        }
    }

    #[test]
    fn stat_kind_parses_case_insensitively() {
        assert_eq!("ATK".parse::<StatKind>().unwrap(), StatKind::Atk);
        assert_eq!(StatKind::Spd.to_string(), "spd");
    }
}
