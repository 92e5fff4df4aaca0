//! Effective combat stats.
//!
//! Effective stats are never stored. They are derived on demand from the stats
//! at the unit's level, plus flat bonuses (equipment, Set Djinn), plus
//! percentage modifiers (buffs and debuffs), then clamped.

use super::bonus::{Bonus, BonusStack, StatBounds};
use super::core::{StatDelta, StatKind, Stats};

/// Per-stat bonus stacks collected before deriving effective stats.
#[derive(Clone, Debug, Default)]
pub struct StatBonuses {
    stacks: [BonusStack; 6],
}

impl StatBonuses {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(kind: StatKind) -> usize {
        match kind {
            StatKind::Hp => 0,
            StatKind::Pp => 1,
            StatKind::Atk => 2,
            StatKind::Def => 3,
            StatKind::Mag => 4,
            StatKind::Spd => 5,
        }
    }

    /// Adds every non-zero component of `delta` as a flat bonus.
    pub fn add_flat(&mut self, delta: &StatDelta) {
        for kind in StatKind::ALL {
            let value = delta.get(kind);
            if value != 0 {
                self.stacks[Self::slot(kind)].add(Bonus::Flat(value));
            }
        }
    }

    /// Adds a percentage modifier to a single stat.
    pub fn add_percent(&mut self, kind: StatKind, percent: i32) {
        self.stacks[Self::slot(kind)].add(Bonus::Increased(percent));
    }

    /// Applies the collected bonuses to `base`.
    pub fn apply(&self, base: &Stats) -> Stats {
        let bounds = StatBounds::EFFECTIVE;
        base.map(|kind, value| {
            let base = i32::try_from(value).unwrap_or(i32::MAX);
            self.stacks[Self::slot(kind)].apply(base, bounds.min, bounds.max) as u32
        })
    }
}
