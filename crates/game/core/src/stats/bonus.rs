//! Bonus application stack.
//!
//! Bonuses are applied in a fixed order: Flat → %Inc → Clamp. Equipment and
//! Set Djinn contribute flat bonuses; buff and debuff statuses contribute
//! percentage modifiers.

/// A single bonus that can be applied to a stat value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Bonus {
    /// Flat additive bonus (applied first)
    Flat(i32),

    /// Percentage increase (summed with other %Inc, then multiplied).
    /// Stored as integer percentage (e.g., 20 = +20%, -25 = -25%)
    Increased(i32),
}

/// A collection of bonuses that will be applied in the correct order.
///
/// # Example
/// ```
/// # use vale_core::stats::bonus::{Bonus, BonusStack};
/// let mut stack = BonusStack::new();
/// stack.add(Bonus::Flat(5));
/// stack.add(Bonus::Increased(20));
/// stack.add(Bonus::Increased(30));
///
/// // (10 + 5) × 1.5 = 22.5 → 22
/// assert_eq!(stack.apply(10, 0, 100), 22);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BonusStack {
    bonuses: Vec<Bonus>,
}

impl BonusStack {
    pub fn new() -> Self {
        Self {
            bonuses: Vec::new(),
        }
    }

    pub fn add(&mut self, bonus: Bonus) {
        self.bonuses.push(bonus);
    }

    /// Apply all bonuses to a base value with clamping.
    ///
    /// ```text
    /// result = clamp((base + flat_sum) × (100 + inc_sum) / 100, min, max)
    /// ```
    ///
    /// The percentage sum is floored at -100 so a stack of debuffs bottoms out at zero
    /// rather than flipping the sign.
    pub fn apply(&self, base: i32, min: i32, max: i32) -> i32 {
        let flat_sum: i32 = self
            .bonuses
            .iter()
            .filter_map(|b| match b {
                Bonus::Flat(v) => Some(*v),
                Bonus::Increased(_) => None,
            })
            .sum();

        let inc_sum: i32 = self
            .bonuses
            .iter()
            .filter_map(|b| match b {
                Bonus::Increased(p) => Some(*p),
                Bonus::Flat(_) => None,
            })
            .sum();

        let after_flat = i64::from(base) + i64::from(flat_sum);
        let after_inc = if inc_sum == 0 {
            after_flat
        } else {
            after_flat * i64::from(100 + inc_sum.max(-100)) / 100
        };

        after_inc.clamp(i64::from(min), i64::from(max)) as i32
    }

    pub fn is_empty(&self) -> bool {
        self.bonuses.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bonuses.len()
    }
}

/// Bounds configuration for a specific stat calculation.
#[derive(Clone, Copy, Debug)]
pub struct StatBounds {
    pub min: i32,
    pub max: i32,
}

impl StatBounds {
    /// Effective combat stats [0, 9999].
    pub const EFFECTIVE: Self = Self { min: 0, max: 9999 };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_stack_is_identity() {
        assert_eq!(BonusStack::new().apply(42, 0, 9999), 42);
    }

    #[test]
    fn flat_applies_before_percentage() {
        let mut stack = BonusStack::new();
        stack.add(Bonus::Increased(50));
        stack.add(Bonus::Flat(10));
        assert_eq!(stack.apply(10, 0, 9999), 30);
    }

    #[test]
    fn debuffs_bottom_out_at_zero() {
        let mut stack = BonusStack::new();
        stack.add(Bonus::Increased(-80));
        stack.add(Bonus::Increased(-80));
        assert_eq!(stack.apply(50, 0, 9999), 0);
    }

    #[test]
    fn clamps_to_bounds() {
        let mut stack = BonusStack::new();
        stack.add(Bonus::Flat(-100));
        assert_eq!(stack.apply(10, 0, 9999), 0);
    }
}
