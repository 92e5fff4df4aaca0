//! Ability definitions.
//!
//! Abilities are static content. Units reference them by [`AbilityId`]; the
//! battle engine resolves the definition through the content oracle.

use super::common::AbilityId;
use super::element::Element;
use super::status::StatusEffect;

/// What an ability does when it resolves.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum AbilityKind {
    /// Weapon-based damage scaled by ATK.
    Physical,
    /// Elemental damage scaled by MAG.
    Psynergy,
    /// Restores HP scaled by MAG.
    Healing,
    /// Applies its status to allies.
    Buff,
    /// Applies its status to enemies.
    Debuff,
}

impl AbilityKind {
    pub const fn deals_damage(self) -> bool {
        matches!(self, AbilityKind::Physical | AbilityKind::Psynergy)
    }
}

/// Who an ability may target.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TargetKind {
    SingleEnemy,
    AllEnemies,
    SingleAlly,
    AllAllies,
    SelfOnly,
}

impl TargetKind {
    /// True when the ability lands on the caster's own side.
    pub const fn is_friendly(self) -> bool {
        matches!(
            self,
            TargetKind::SingleAlly | TargetKind::AllAllies | TargetKind::SelfOnly
        )
    }

    pub const fn is_single(self) -> bool {
        matches!(self, TargetKind::SingleEnemy | TargetKind::SingleAlly)
    }
}

/// A status an ability tries to inflict, with its success chance.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusApplication {
    pub effect: StatusEffect,
    /// Percent chance (1-100).
    pub chance: u8,
}

/// Static ability definition.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ability {
    pub id: AbilityId,
    pub name: String,
    pub kind: AbilityKind,
    #[cfg_attr(feature = "serde", serde(default))]
    pub element: Option<Element>,
    /// Cost against the shared team mana pool (0-10).
    #[cfg_attr(feature = "serde", serde(default))]
    pub mana_cost: u8,
    #[cfg_attr(feature = "serde", serde(default))]
    pub power: u32,
    pub target: TargetKind,
    #[cfg_attr(feature = "serde", serde(default = "default_unlock_level"))]
    pub unlock_level: u8,
    /// Rounds the ability is unavailable after use.
    #[cfg_attr(feature = "serde", serde(default))]
    pub cooldown: u8,
    #[cfg_attr(feature = "serde", serde(default))]
    pub status: Option<StatusApplication>,
}

#[cfg(feature = "serde")]
fn default_unlock_level() -> u8 {
    1
}

impl Ability {
    /// The implicit action used when a slot has no ability: a free physical strike.
    pub fn basic_attack() -> Self {
        Self {
            id: AbilityId::new("basic-attack"),
            name: "Attack".to_owned(),
            kind: AbilityKind::Physical,
            element: None,
            mana_cost: 0,
            power: 0,
            target: TargetKind::SingleEnemy,
            unlock_level: 1,
            cooldown: 0,
            status: None,
        }
    }
}
