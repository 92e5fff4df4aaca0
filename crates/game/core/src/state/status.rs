//! Status effect system for units.
//!
//! Status effects are a tagged union: each variant carries exactly the data its
//! semantics need. Duration-based effects count down in the round-end sweep;
//! charge-based effects (`Shield`, `AutoRevive`) only shrink when consumed.

use arrayvec::ArrayVec;

use super::element::Element;
use crate::config::GameConfig;
use crate::stats::StatKind;

/// A single active status effect.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatusEffect {
    // ========================================================================
    // Stat modifiers
    // ========================================================================
    /// Percentage increase to one stat.
    Buff { stat: StatKind, percent: i32, turns: u8 },

    /// Percentage decrease to one stat. `percent` is a positive magnitude.
    Debuff { stat: StatKind, percent: i32, turns: u8 },

    // ========================================================================
    // Damage / healing over time
    // ========================================================================
    Poison { damage: u32, turns: u8 },
    Burn { damage: u32, turns: u8 },
    HealOverTime { amount: u32, turns: u8 },

    // ========================================================================
    // Crowd control (unit skips its action)
    // ========================================================================
    Freeze { turns: u8 },
    Paralyze { turns: u8 },
    Stun { turns: u8 },

    // ========================================================================
    // Protection
    // ========================================================================
    /// Reduces damage from abilities of `element` by `percent`.
    ElementalResistance {
        element: Element,
        percent: u8,
        turns: u8,
    },

    /// Reduces all incoming damage by `percent`.
    DamageReduction { percent: u8, turns: u8 },

    /// Absorbs one hit per charge.
    Shield { charges: u8 },

    /// Takes no damage at all.
    Invulnerable { turns: u8 },

    /// Blocks new negative statuses of the listed kinds (all negative kinds when empty).
    Immunity { kinds: Vec<StatusKind>, turns: u8 },

    /// Revives the unit at `hp_percent` of max HP when it would be defeated.
    AutoRevive { hp_percent: u8, uses: u8 },
}

/// Discriminant of [`StatusEffect`], used for immunity lists and log output.
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
pub enum StatusKind {
    Buff,
    Debuff,
    Poison,
    Burn,
    HealOverTime,
    Freeze,
    Paralyze,
    Stun,
    ElementalResistance,
    DamageReduction,
    Shield,
    Invulnerable,
    Immunity,
    AutoRevive,
}

impl StatusKind {
    /// Negative statuses are the ones immunity and cleansing act on.
    pub const fn is_negative(self) -> bool {
        matches!(
            self,
            StatusKind::Debuff
                | StatusKind::Poison
                | StatusKind::Burn
                | StatusKind::Freeze
                | StatusKind::Paralyze
                | StatusKind::Stun
        )
    }

    /// Statuses that make the unit skip its action.
    pub const fn prevents_action(self) -> bool {
        matches!(
            self,
            StatusKind::Freeze | StatusKind::Paralyze | StatusKind::Stun
        )
    }
}

impl StatusEffect {
    pub fn kind(&self) -> StatusKind {
        match self {
            StatusEffect::Buff { .. } => StatusKind::Buff,
            StatusEffect::Debuff { .. } => StatusKind::Debuff,
            StatusEffect::Poison { .. } => StatusKind::Poison,
            StatusEffect::Burn { .. } => StatusKind::Burn,
            StatusEffect::HealOverTime { .. } => StatusKind::HealOverTime,
            StatusEffect::Freeze { .. } => StatusKind::Freeze,
            StatusEffect::Paralyze { .. } => StatusKind::Paralyze,
            StatusEffect::Stun { .. } => StatusKind::Stun,
            StatusEffect::ElementalResistance { .. } => StatusKind::ElementalResistance,
            StatusEffect::DamageReduction { .. } => StatusKind::DamageReduction,
            StatusEffect::Shield { .. } => StatusKind::Shield,
            StatusEffect::Invulnerable { .. } => StatusKind::Invulnerable,
            StatusEffect::Immunity { .. } => StatusKind::Immunity,
            StatusEffect::AutoRevive { .. } => StatusKind::AutoRevive,
        }
    }

    /// Remaining rounds for duration-based effects, `None` for charge-based ones.
    pub fn turns(&self) -> Option<u8> {
        match self {
            StatusEffect::Buff { turns, .. }
            | StatusEffect::Debuff { turns, .. }
            | StatusEffect::Poison { turns, .. }
            | StatusEffect::Burn { turns, .. }
            | StatusEffect::HealOverTime { turns, .. }
            | StatusEffect::Freeze { turns }
            | StatusEffect::Paralyze { turns }
            | StatusEffect::Stun { turns }
            | StatusEffect::ElementalResistance { turns, .. }
            | StatusEffect::DamageReduction { turns, .. }
            | StatusEffect::Invulnerable { turns }
            | StatusEffect::Immunity { turns, .. } => Some(*turns),
            StatusEffect::Shield { .. } | StatusEffect::AutoRevive { .. } => None,
        }
    }

    fn turns_mut(&mut self) -> Option<&mut u8> {
        match self {
            StatusEffect::Buff { turns, .. }
            | StatusEffect::Debuff { turns, .. }
            | StatusEffect::Poison { turns, .. }
            | StatusEffect::Burn { turns, .. }
            | StatusEffect::HealOverTime { turns, .. }
            | StatusEffect::Freeze { turns }
            | StatusEffect::Paralyze { turns }
            | StatusEffect::Stun { turns }
            | StatusEffect::ElementalResistance { turns, .. }
            | StatusEffect::DamageReduction { turns, .. }
            | StatusEffect::Invulnerable { turns }
            | StatusEffect::Immunity { turns, .. } => Some(turns),
            StatusEffect::Shield { .. } | StatusEffect::AutoRevive { .. } => None,
        }
    }

    /// Whether an existing effect should be replaced when `other` is applied.
    fn same_slot(&self, other: &StatusEffect) -> bool {
        match (self, other) {
            (StatusEffect::Buff { stat: a, .. }, StatusEffect::Buff { stat: b, .. })
            | (StatusEffect::Debuff { stat: a, .. }, StatusEffect::Debuff { stat: b, .. }) => {
                a == b
            }
            (
                StatusEffect::ElementalResistance { element: a, .. },
                StatusEffect::ElementalResistance { element: b, .. },
            ) => a == b,
            _ => self.kind() == other.kind(),
        }
    }

    fn is_spent(&self) -> bool {
        match self {
            StatusEffect::Shield { charges } => *charges == 0,
            StatusEffect::AutoRevive { uses, .. } => *uses == 0,
            _ => self.turns() == Some(0),
        }
    }
}

/// Result of trying to apply a status.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ApplyOutcome {
    Applied,
    /// An effect in the same slot was replaced (or shield charges stacked).
    Refreshed,
    /// Immunity or invulnerability blocked a negative status.
    Blocked,
    /// No room left for another effect.
    Full,
}

/// One observable consequence of the round-end status sweep.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StatusTick {
    Damage { kind: StatusKind, amount: u32 },
    Heal { amount: u32 },
    Expired { kind: StatusKind },
}

/// Active status effects on a unit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct StatusEffects {
    effects: ArrayVec<StatusEffect, { GameConfig::MAX_STATUS_EFFECTS }>,
}

impl StatusEffects {
    pub fn empty() -> Self {
        Self {
            effects: ArrayVec::new(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> {
        self.effects.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn has(&self, kind: StatusKind) -> bool {
        self.effects.iter().any(|e| e.kind() == kind)
    }

    /// Whether a negative status of `kind` would be blocked right now.
    pub fn blocks(&self, kind: StatusKind) -> bool {
        if !kind.is_negative() {
            return false;
        }
        self.effects.iter().any(|e| match e {
            StatusEffect::Invulnerable { .. } => true,
            StatusEffect::Immunity { kinds, .. } => kinds.is_empty() || kinds.contains(&kind),
            _ => false,
        })
    }

    /// Applies `effect`, replacing an effect occupying the same slot.
    ///
    /// Shields stack charges instead of replacing.
    pub fn apply(&mut self, effect: StatusEffect) -> ApplyOutcome {
        if self.blocks(effect.kind()) {
            return ApplyOutcome::Blocked;
        }

        if let Some(existing) = self.effects.iter_mut().find(|e| e.same_slot(&effect)) {
            match (existing, effect) {
                (StatusEffect::Shield { charges }, StatusEffect::Shield { charges: extra }) => {
                    *charges = charges.saturating_add(extra);
                }
                (existing, effect) => *existing = effect,
            }
            return ApplyOutcome::Refreshed;
        }

        match self.effects.try_push(effect) {
            Ok(()) => ApplyOutcome::Applied,
            Err(_) => ApplyOutcome::Full,
        }
    }

    /// The first action-preventing status, if any.
    pub fn incapacitated_by(&self) -> Option<StatusKind> {
        self.effects
            .iter()
            .map(StatusEffect::kind)
            .find(|kind| kind.prevents_action())
    }

    /// Signed percentage modifiers contributed by buffs and debuffs.
    pub fn stat_modifiers(&self) -> impl Iterator<Item = (StatKind, i32)> + '_ {
        self.effects.iter().filter_map(|e| match e {
            StatusEffect::Buff { stat, percent, .. } => Some((*stat, *percent)),
            StatusEffect::Debuff { stat, percent, .. } => Some((*stat, -percent.abs())),
            _ => None,
        })
    }

    pub fn is_invulnerable(&self) -> bool {
        self.has(StatusKind::Invulnerable)
    }

    /// Total damage reduction (percent, capped at 100) against an attack of `element`.
    pub fn damage_reduction_percent(&self, element: Option<Element>) -> u32 {
        let total: u32 = self
            .effects
            .iter()
            .map(|e| match e {
                StatusEffect::DamageReduction { percent, .. } => u32::from(*percent),
                StatusEffect::ElementalResistance {
                    element: resisted,
                    percent,
                    ..
                } if Some(*resisted) == element => u32::from(*percent),
                _ => 0,
            })
            .sum();
        total.min(100)
    }

    /// Consumes one shield charge. Returns true if a hit was absorbed.
    pub fn consume_shield(&mut self) -> bool {
        let absorbed = self.effects.iter_mut().any(|e| match e {
            StatusEffect::Shield { charges } if *charges > 0 => {
                *charges -= 1;
                true
            }
            _ => false,
        });
        self.effects.retain(|e| !e.is_spent());
        absorbed
    }

    /// Consumes one auto-revive use and returns the revive HP percentage.
    pub fn take_auto_revive(&mut self) -> Option<u8> {
        let revive = self.effects.iter_mut().find_map(|e| match e {
            StatusEffect::AutoRevive { hp_percent, uses } if *uses > 0 => {
                *uses -= 1;
                Some(*hp_percent)
            }
            _ => None,
        });
        self.effects.retain(|e| !e.is_spent());
        revive
    }

    /// Removes every negative status. Returns how many were removed.
    pub fn cleanse_negative(&mut self) -> usize {
        let before = self.effects.len();
        self.effects.retain(|e| !e.kind().is_negative());
        before - self.effects.len()
    }

    /// Removes everything. Used when a unit is defeated.
    pub fn clear(&mut self) {
        self.effects.clear();
    }

    /// Round-end sweep: damage/heal ticks, then duration countdown and expiry.
    ///
    /// Ticks are reported in effect order; expiries follow all ticks.
    pub fn end_of_round(&mut self) -> Vec<StatusTick> {
        let mut ticks = Vec::new();

        for effect in self.effects.iter() {
            match effect {
                StatusEffect::Poison { damage, .. } => ticks.push(StatusTick::Damage {
                    kind: StatusKind::Poison,
                    amount: *damage,
                }),
                StatusEffect::Burn { damage, .. } => ticks.push(StatusTick::Damage {
                    kind: StatusKind::Burn,
                    amount: *damage,
                }),
                StatusEffect::HealOverTime { amount, .. } => {
                    ticks.push(StatusTick::Heal { amount: *amount })
                }
                _ => {}
            }
        }

        for effect in self.effects.iter_mut() {
            if let Some(turns) = effect.turns_mut() {
                *turns = turns.saturating_sub(1);
            }
        }

        for effect in self.effects.iter().filter(|e| e.is_spent()) {
            ticks.push(StatusTick::Expired { kind: effect.kind() });
        }
        self.effects.retain(|e| !e.is_spent());

        ticks
    }
}
