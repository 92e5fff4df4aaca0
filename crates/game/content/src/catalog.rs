//! Raw content tables as they appear in data files.

use serde::{Deserialize, Serialize};
use vale_core::{Ability, ContentSnapshot, Djinn, Encounter, Enemy, Equipment, UnitDefinition};

/// Content tables before indexing.
///
/// Tables are lists so duplicate ids survive parsing and can be reported by
/// validation instead of silently overwriting each other.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentCatalog {
    pub abilities: Vec<Ability>,
    pub units: Vec<UnitDefinition>,
    pub enemies: Vec<Enemy>,
    pub equipment: Vec<Equipment>,
    pub djinn: Vec<Djinn>,
    pub encounters: Vec<Encounter>,
}

impl ContentCatalog {
    /// Indexes the tables by id. Later duplicates win.
    pub fn into_snapshot(self) -> ContentSnapshot {
        let mut snapshot = ContentSnapshot::new();
        for ability in self.abilities {
            snapshot = snapshot.with_ability(ability);
        }
        for unit in self.units {
            snapshot = snapshot.with_unit(unit);
        }
        for enemy in self.enemies {
            snapshot = snapshot.with_enemy(enemy);
        }
        for item in self.equipment {
            snapshot = snapshot.with_equipment(item);
        }
        for djinn in self.djinn {
            snapshot = snapshot.with_djinn(djinn);
        }
        for encounter in self.encounters {
            snapshot = snapshot.with_encounter(encounter);
        }
        snapshot
    }
}
