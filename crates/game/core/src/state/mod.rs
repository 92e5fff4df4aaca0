//! Units, teams and the static definitions they are built from.
//!
//! Everything here is plain data with small, local invariants. Battle-wide
//! rules (turn order, mana, Djinn timers) live in [`crate::battle`].
mod ability;
mod common;
mod djinn;
mod element;
mod enemy;
mod equipment;
mod status;
mod team;
mod unit;

pub use ability::{Ability, AbilityKind, StatusApplication, TargetKind};
pub use common::{
    AbilityId, DjinnId, EncounterId, EnemyId, EquipmentId, FloorId, Side, UnitId,
};
pub use djinn::{Djinn, DjinnGrant, DjinnState, SummonEffect};
pub use element::{Element, ElementRelation};
pub use enemy::{DropEntry, Enemy, enemy_to_unit, unit_to_enemy};
pub use equipment::{EquipError, Equipment, EquipmentLoadout, EquipmentSlot};
pub use status::{ApplyOutcome, StatusEffect, StatusEffects, StatusKind, StatusTick};
pub use team::{Team, TeamError};
pub use unit::{Unit, UnitAbility, UnitDefinition, UnitRole, xp_to_reach};

/// A fixed group of enemies fought together.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Encounter {
    pub id: EncounterId,
    pub name: String,
    pub enemies: Vec<EnemyId>,
}
