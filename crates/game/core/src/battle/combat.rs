//! Combat formulas.
//!
//! Pure integer arithmetic on effective stats. Randomness (crits, status
//! procs) is decided by the caller and passed in.

use crate::state::{AbilityKind, Element};
use crate::stats::Stats;

/// Damage multiplier (percent) of a critical hit.
pub const CRIT_PERCENT: u32 = 150;

/// Raw damage of an attack before elemental, critical and status modifiers.
///
/// Physical: `atk + power - def / 2`. Psynergy: `mag + power - def / 4`.
/// Always at least 1. Non-damaging kinds deal 0.
pub fn base_damage(kind: AbilityKind, attacker: &Stats, defender: &Stats, power: u32) -> u32 {
    let (offense, mitigation) = match kind {
        AbilityKind::Physical => (attacker.atk, defender.def / 2),
        AbilityKind::Psynergy => (attacker.mag, defender.def / 4),
        AbilityKind::Healing | AbilityKind::Buff | AbilityKind::Debuff => return 0,
    };
    offense
        .saturating_add(power)
        .saturating_sub(mitigation)
        .max(1)
}

/// Final damage after element, crit and the defender's damage reduction.
pub fn modified_damage(
    base: u32,
    element: Option<Element>,
    defender_element: Element,
    critical: bool,
    reduction_percent: u32,
) -> u32 {
    let mut damage = base;
    if let Some(element) = element {
        damage = percent_of(damage, element.damage_percent_against(defender_element));
    }
    if critical {
        damage = percent_of(damage, CRIT_PERCENT);
    }
    percent_of(damage, 100u32.saturating_sub(reduction_percent))
}

/// HP restored by a healing ability: `mag + power`.
pub fn heal_amount(caster: &Stats, power: u32) -> u32 {
    caster.mag.saturating_add(power)
}

#[inline]
pub fn percent_of(value: u32, percent: u32) -> u32 {
    (u64::from(value) * u64::from(percent) / 100).min(u64::from(u32::MAX)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(atk: u32, def: u32, mag: u32) -> Stats {
        Stats::new(100, 10, atk, def, mag, 10)
    }

    #[test]
    fn physical_damage_subtracts_half_defense() {
        assert_eq!(
            base_damage(AbilityKind::Physical, &stats(20, 0, 0), &stats(0, 10, 0), 5),
            20
        );
        assert_eq!(
            base_damage(AbilityKind::Physical, &stats(1, 0, 0), &stats(0, 99, 0), 0),
            1
        );
    }

    #[test]
    fn psynergy_uses_magic() {
        assert_eq!(
            base_damage(AbilityKind::Psynergy, &stats(0, 0, 30), &stats(0, 20, 0), 10),
            35
        );
        assert_eq!(
            base_damage(AbilityKind::Healing, &stats(0, 0, 30), &stats(0, 20, 0), 10),
            0
        );
    }

    #[test]
    fn modifiers_stack_multiplicatively() {
        // 20 * 1.5 (counter) * 1.5 (crit) = 45, then 20% reduction = 36
        assert_eq!(
            modified_damage(20, Some(Element::Mars), Element::Mercury, true, 20),
            36
        );
        assert_eq!(modified_damage(20, None, Element::Mars, false, 100), 0);
    }
}
