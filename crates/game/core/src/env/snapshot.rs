//! In-memory content tables implementing [`ContentOracle`].
//!
//! Loaders build a [`ContentSnapshot`] once at startup; tests build small ones
//! with the `with_*` helpers.

use std::collections::BTreeMap;

use super::ContentOracle;
use crate::state::{
    Ability, AbilityId, Djinn, DjinnId, Encounter, EncounterId, Enemy, EnemyId, Equipment,
    EquipmentId, UnitDefinition, UnitId,
};

/// Every static table the battle and tower engines read.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ContentSnapshot {
    pub abilities: BTreeMap<AbilityId, Ability>,
    pub djinn: BTreeMap<DjinnId, Djinn>,
    pub enemies: BTreeMap<EnemyId, Enemy>,
    pub encounters: BTreeMap<EncounterId, Encounter>,
    pub equipment: BTreeMap<EquipmentId, Equipment>,
    pub units: BTreeMap<UnitId, UnitDefinition>,
}

impl ContentSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ability(mut self, ability: Ability) -> Self {
        self.abilities.insert(ability.id.clone(), ability);
        self
    }

    pub fn with_djinn(mut self, djinn: Djinn) -> Self {
        self.djinn.insert(djinn.id.clone(), djinn);
        self
    }

    pub fn with_enemy(mut self, enemy: Enemy) -> Self {
        self.enemies.insert(enemy.id.clone(), enemy);
        self
    }

    pub fn with_encounter(mut self, encounter: Encounter) -> Self {
        self.encounters.insert(encounter.id.clone(), encounter);
        self
    }

    pub fn with_equipment(mut self, item: Equipment) -> Self {
        self.equipment.insert(item.id.clone(), item);
        self
    }

    pub fn with_unit(mut self, unit: UnitDefinition) -> Self {
        self.units.insert(unit.id.clone(), unit);
        self
    }
}

impl ContentOracle for ContentSnapshot {
    fn ability(&self, id: &AbilityId) -> Option<&Ability> {
        self.abilities.get(id)
    }

    fn djinn(&self, id: &DjinnId) -> Option<&Djinn> {
        self.djinn.get(id)
    }

    fn enemy(&self, id: &EnemyId) -> Option<&Enemy> {
        self.enemies.get(id)
    }

    fn encounter(&self, id: &EncounterId) -> Option<&Encounter> {
        self.encounters.get(id)
    }

    fn equipment(&self, id: &EquipmentId) -> Option<&Equipment> {
        self.equipment.get(id)
    }

    fn unit_definition(&self, id: &UnitId) -> Option<&UnitDefinition> {
        self.units.get(id)
    }
}
