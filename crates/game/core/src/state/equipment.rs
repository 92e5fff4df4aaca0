//! Equipment system for units.
//!
//! A loadout has five optional slots. Each item fits exactly one slot and may be
//! restricted to a set of elements; an empty restriction list means any element.

use super::common::{AbilityId, EquipmentId};
use super::element::Element;
use crate::error::{ErrorSeverity, GameError};
use crate::stats::StatDelta;

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
pub enum EquipmentSlot {
    Weapon,
    Armor,
    Helm,
    Boots,
    Accessory,
}

impl EquipmentSlot {
    pub const ALL: [EquipmentSlot; 5] = [
        EquipmentSlot::Weapon,
        EquipmentSlot::Armor,
        EquipmentSlot::Helm,
        EquipmentSlot::Boots,
        EquipmentSlot::Accessory,
    ];
}

/// Static equipment item definition.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Equipment {
    pub id: EquipmentId,
    pub name: String,
    pub slot: EquipmentSlot,
    #[cfg_attr(feature = "serde", serde(default))]
    pub allowed_elements: Vec<Element>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub bonus: StatDelta,
    /// Ability usable while the item is worn.
    #[cfg_attr(feature = "serde", serde(default))]
    pub grants_ability: Option<AbilityId>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub cost: u32,
}

impl Equipment {
    pub fn allows(&self, element: Element) -> bool {
        self.allowed_elements.is_empty() || self.allowed_elements.contains(&element)
    }
}

/// Errors raised while changing a loadout.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EquipError {
    #[error("{item} cannot be worn by a {element} unit")]
    ElementRestricted { item: EquipmentId, element: Element },
}

impl GameError for EquipError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }

    fn error_code(&self) -> &'static str {
        match self {
            EquipError::ElementRestricted { .. } => "EQUIP_ELEMENT_RESTRICTED",
        }
    }
}

/// Items currently worn by a unit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EquipmentLoadout {
    pub weapon: Option<Equipment>,
    pub armor: Option<Equipment>,
    pub helm: Option<Equipment>,
    pub boots: Option<Equipment>,
    pub accessory: Option<Equipment>,
}

impl EquipmentLoadout {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn slot(&self, slot: EquipmentSlot) -> Option<&Equipment> {
        match slot {
            EquipmentSlot::Weapon => self.weapon.as_ref(),
            EquipmentSlot::Armor => self.armor.as_ref(),
            EquipmentSlot::Helm => self.helm.as_ref(),
            EquipmentSlot::Boots => self.boots.as_ref(),
            EquipmentSlot::Accessory => self.accessory.as_ref(),
        }
    }

    fn slot_mut(&mut self, slot: EquipmentSlot) -> &mut Option<Equipment> {
        match slot {
            EquipmentSlot::Weapon => &mut self.weapon,
            EquipmentSlot::Armor => &mut self.armor,
            EquipmentSlot::Helm => &mut self.helm,
            EquipmentSlot::Boots => &mut self.boots,
            EquipmentSlot::Accessory => &mut self.accessory,
        }
    }

    /// Equips `item` in its slot, returning the previously worn item.
    pub fn equip(
        &mut self,
        item: Equipment,
        wearer: Element,
    ) -> Result<Option<Equipment>, EquipError> {
        if !item.allows(wearer) {
            return Err(EquipError::ElementRestricted {
                item: item.id,
                element: wearer,
            });
        }
        Ok(self.slot_mut(item.slot).replace(item))
    }

    pub fn unequip(&mut self, slot: EquipmentSlot) -> Option<Equipment> {
        self.slot_mut(slot).take()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Equipment> {
        EquipmentSlot::ALL
            .into_iter()
            .filter_map(move |slot| self.slot(slot))
    }

    /// Sum of flat bonuses from every worn item.
    pub fn total_bonus(&self) -> StatDelta {
        self.iter().map(|item| item.bonus).sum()
    }

    pub fn granted_abilities(&self) -> impl Iterator<Item = &AbilityId> {
        self.iter().filter_map(|item| item.grants_ability.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sword(allowed: Vec<Element>) -> Equipment {
        Equipment {
            id: EquipmentId::new("long-sword"),
            name: "Long Sword".into(),
            slot: EquipmentSlot::Weapon,
            allowed_elements: allowed,
            bonus: StatDelta {
                atk: 12,
                ..StatDelta::ZERO
            },
            grants_ability: None,
            cost: 200,
        }
    }

    #[test]
    fn equip_returns_previous_item() {
        let mut loadout = EquipmentLoadout::empty();
        assert_eq!(loadout.equip(sword(vec![]), Element::Venus), Ok(None));

        let previous = loadout.equip(sword(vec![]), Element::Venus).unwrap();
        assert!(previous.is_some());
        assert_eq!(loadout.total_bonus().atk, 12);
    }

    #[test]
    fn element_restriction_is_enforced() {
        let mut loadout = EquipmentLoadout::empty();
        let result = loadout.equip(sword(vec![Element::Mars]), Element::Mercury);
        assert!(matches!(result, Err(EquipError::ElementRestricted { .. })));
        assert!(loadout.weapon.is_none());
    }

    #[test]
    fn unequip_clears_slot() {
        let mut loadout = EquipmentLoadout::empty();
        loadout.equip(sword(vec![]), Element::Mars).unwrap();
        assert!(loadout.unequip(EquipmentSlot::Weapon).is_some());
        assert_eq!(loadout.total_bonus(), StatDelta::ZERO);
    }
}
