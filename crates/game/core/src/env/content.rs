use super::OracleError;
use crate::state::{
    Ability, AbilityId, Djinn, DjinnId, Encounter, EncounterId, Enemy, EnemyId, Equipment,
    EquipmentId, UnitDefinition, UnitId,
};

/// Read-only lookup into the static content tables.
///
/// Content is validated once at startup; lookups here assume valid data and
/// only report missing ids.
pub trait ContentOracle: Send + Sync {
    fn ability(&self, id: &AbilityId) -> Option<&Ability>;
    fn djinn(&self, id: &DjinnId) -> Option<&Djinn>;
    fn enemy(&self, id: &EnemyId) -> Option<&Enemy>;
    fn encounter(&self, id: &EncounterId) -> Option<&Encounter>;
    fn equipment(&self, id: &EquipmentId) -> Option<&Equipment>;
    fn unit_definition(&self, id: &UnitId) -> Option<&UnitDefinition>;

    fn require_ability(&self, id: &AbilityId) -> Result<&Ability, OracleError> {
        self.ability(id)
            .ok_or_else(|| OracleError::AbilityNotFound(id.clone()))
    }

    fn require_djinn(&self, id: &DjinnId) -> Result<&Djinn, OracleError> {
        self.djinn(id)
            .ok_or_else(|| OracleError::DjinnNotFound(id.clone()))
    }

    fn require_enemy(&self, id: &EnemyId) -> Result<&Enemy, OracleError> {
        self.enemy(id)
            .ok_or_else(|| OracleError::EnemyNotFound(id.clone()))
    }

    fn require_encounter(&self, id: &EncounterId) -> Result<&Encounter, OracleError> {
        self.encounter(id)
            .ok_or_else(|| OracleError::EncounterNotFound(id.clone()))
    }
}
