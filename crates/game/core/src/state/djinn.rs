//! Djinn definitions and their three-state lifecycle.

use arrayvec::ArrayVec;

use super::common::{AbilityId, DjinnId};
use super::element::{Element, ElementRelation};
use super::unit::UnitRole;
use crate::config::GameConfig;
use crate::stats::StatDelta;

/// Lifecycle state of an equipped Djinn.
///
/// ```text
/// Set ──standby──▶ Standby ──summon──▶ Recovery ──timer hits 0──▶ Standby | Set
///  ▲                  │
///  └──────set─────────┘
/// ```
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
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum DjinnState {
    /// Grants its passive stat bonus and abilities.
    #[default]
    Set,
    /// Ready to be summoned.
    Standby,
    /// Used; counting down before it can act again.
    Recovery,
}

impl DjinnState {
    /// Legal lifecycle edges.
    pub const fn can_transition_to(self, next: DjinnState) -> bool {
        matches!(
            (self, next),
            (DjinnState::Set, DjinnState::Standby)
                | (DjinnState::Standby, DjinnState::Set)
                | (DjinnState::Standby, DjinnState::Recovery)
                | (DjinnState::Recovery, DjinnState::Standby)
                | (DjinnState::Recovery, DjinnState::Set)
        )
    }
}

/// What a Djinn does when summoned from `Standby`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SummonEffect {
    /// Damages every living enemy.
    Damage { magnitude: u32 },
    /// Heals every living ally.
    Heal { magnitude: u32 },
    /// Raises attack and defense of every living ally by `magnitude` percent.
    Buff { magnitude: i32, turns: u8 },
    /// Cleanses negative statuses and revives fallen allies at `magnitude` percent HP.
    Special { magnitude: u8 },
}

/// Abilities a Djinn grants to units of one role and element relation.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DjinnGrant {
    pub role: UnitRole,
    pub relation: ElementRelation,
    pub abilities: ArrayVec<AbilityId, { GameConfig::MAX_ABILITIES_PER_GRANT }>,
}

/// Static Djinn definition.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Djinn {
    pub id: DjinnId,
    pub name: String,
    pub element: Element,
    /// 1-3
    pub tier: u8,
    pub summon: SummonEffect,
    /// Passive bonus applied to every party member while the Djinn is `Set`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub set_bonus: StatDelta,
    #[cfg_attr(feature = "serde", serde(default))]
    pub grants: Vec<DjinnGrant>,
}

impl Djinn {
    /// Abilities granted to a unit of `role` and `element` while this Djinn is `Set`.
    pub fn granted_abilities(&self, role: UnitRole, element: Element) -> &[AbilityId] {
        let relation = self.element.relation_to(element);
        self.grants
            .iter()
            .find(|grant| grant.role == role && grant.relation == relation)
            .map(|grant| grant.abilities.as_slice())
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recovery_cannot_be_entered_from_set() {
        assert!(DjinnState::Set.can_transition_to(DjinnState::Standby));
        assert!(DjinnState::Standby.can_transition_to(DjinnState::Recovery));
        assert!(!DjinnState::Set.can_transition_to(DjinnState::Recovery));
        assert!(!DjinnState::Standby.can_transition_to(DjinnState::Standby));
    }

    #[test]
    fn grants_are_bucketed_by_role_and_relation() {
        let mut abilities = ArrayVec::new();
        abilities.push(AbilityId::new("ragnarok"));
        let djinn = Djinn {
            id: DjinnId::new("flint"),
            name: "Flint".into(),
            element: Element::Venus,
            tier: 1,
            summon: SummonEffect::Damage { magnitude: 30 },
            set_bonus: StatDelta::ZERO,
            grants: vec![DjinnGrant {
                role: UnitRole::Dps,
                relation: ElementRelation::Same,
                abilities,
            }],
        };

        assert_eq!(
            djinn.granted_abilities(UnitRole::Dps, Element::Venus),
            &[AbilityId::new("ragnarok")]
        );
        assert!(djinn.granted_abilities(UnitRole::Dps, Element::Jupiter).is_empty());
        assert!(djinn.granted_abilities(UnitRole::Healer, Element::Venus).is_empty());
    }
}
