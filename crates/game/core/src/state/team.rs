//! The player team: party units plus the Djinn they carry.
//!
//! Djinn are owned by the team, not by individual units. A collected Djinn may
//! be equipped in one of three slots; only equipped Djinn have a lifecycle
//! state and contribute to battle.

use std::collections::BTreeMap;

use arrayvec::ArrayVec;

use super::common::{DjinnId, UnitId};
use super::djinn::DjinnState;
use super::unit::Unit;
use crate::config::GameConfig;
use crate::error::{ErrorSeverity, GameError};

/// Errors raised by team and Djinn bookkeeping.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TeamError {
    #[error("party must have between {min} and {max} units, got {actual}")]
    InvalidPartySize { min: usize, max: usize, actual: usize },

    #[error("unit {0} appears more than once in the party")]
    DuplicateUnit(UnitId),

    #[error("djinn {0} is already collected")]
    AlreadyCollected(DjinnId),

    #[error("djinn pool is full ({max} djinn)")]
    PoolFull { max: usize },

    #[error("djinn {0} has not been collected")]
    NotCollected(DjinnId),

    #[error("djinn slot {slot} is out of range (0-{max})")]
    InvalidSlot { slot: usize, max: usize },

    #[error("djinn {0} is already equipped")]
    AlreadyEquipped(DjinnId),

    #[error("djinn {0} is not equipped")]
    NotEquipped(DjinnId),

    #[error("djinn {id} cannot move from {from} to {to}")]
    IllegalDjinnTransition {
        id: DjinnId,
        from: DjinnState,
        to: DjinnState,
    },
}

impl GameError for TeamError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            TeamError::AlreadyCollected(_) | TeamError::PoolFull { .. } => {
                ErrorSeverity::Recoverable
            }
            TeamError::IllegalDjinnTransition { .. } => ErrorSeverity::Internal,
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            TeamError::InvalidPartySize { .. } => "TEAM_INVALID_PARTY_SIZE",
            TeamError::DuplicateUnit(_) => "TEAM_DUPLICATE_UNIT",
            TeamError::AlreadyCollected(_) => "TEAM_DJINN_ALREADY_COLLECTED",
            TeamError::PoolFull { .. } => "TEAM_DJINN_POOL_FULL",
            TeamError::NotCollected(_) => "TEAM_DJINN_NOT_COLLECTED",
            TeamError::InvalidSlot { .. } => "TEAM_DJINN_INVALID_SLOT",
            TeamError::AlreadyEquipped(_) => "TEAM_DJINN_ALREADY_EQUIPPED",
            TeamError::NotEquipped(_) => "TEAM_DJINN_NOT_EQUIPPED",
            TeamError::IllegalDjinnTransition { .. } => "TEAM_DJINN_ILLEGAL_TRANSITION",
        }
    }
}

/// Party units and Djinn bookkeeping.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Team {
    pub units: ArrayVec<Unit, { GameConfig::MAX_PARTY_SIZE }>,
    equipped_djinn: [Option<DjinnId>; GameConfig::MAX_EQUIPPED_DJINN],
    collected_djinn: ArrayVec<DjinnId, { GameConfig::MAX_COLLECTED_DJINN }>,
    djinn_states: BTreeMap<DjinnId, DjinnState>,
    /// Activations per Djinn during the current turn.
    activations: BTreeMap<DjinnId, u8>,
    pub current_turn: u32,
}

impl Team {
    /// Builds a team, enforcing the party-size bounds and unique unit ids.
    pub fn new(units: impl IntoIterator<Item = Unit>) -> Result<Self, TeamError> {
        let units: Vec<Unit> = units.into_iter().collect();
        let actual = units.len();
        if !(GameConfig::MIN_PARTY_SIZE..=GameConfig::MAX_PARTY_SIZE).contains(&actual) {
            return Err(TeamError::InvalidPartySize {
                min: GameConfig::MIN_PARTY_SIZE,
                max: GameConfig::MAX_PARTY_SIZE,
                actual,
            });
        }
        for (index, unit) in units.iter().enumerate() {
            if units[..index].iter().any(|other| other.id == unit.id) {
                return Err(TeamError::DuplicateUnit(unit.id.clone()));
            }
        }

        Ok(Self {
            units: units.into_iter().collect(),
            equipped_djinn: Default::default(),
            collected_djinn: ArrayVec::new(),
            djinn_states: BTreeMap::new(),
            activations: BTreeMap::new(),
            current_turn: 0,
        })
    }

    pub fn unit(&self, id: &UnitId) -> Option<&Unit> {
        self.units.iter().find(|unit| &unit.id == id)
    }

    pub fn unit_mut(&mut self, id: &UnitId) -> Option<&mut Unit> {
        self.units.iter_mut().find(|unit| &unit.id == id)
    }

    pub fn living_units(&self) -> impl Iterator<Item = &Unit> {
        self.units.iter().filter(|unit| unit.is_alive())
    }

    pub fn all_defeated(&self) -> bool {
        self.units.iter().all(|unit| !unit.is_alive())
    }

    /// Sum of mana contributions of the whole party.
    pub fn max_mana(&self) -> u32 {
        self.units
            .iter()
            .map(|unit| u32::from(unit.mana_contribution))
            .sum()
    }

    // ========================================================================
    // Djinn collection and equipment
    // ========================================================================

    pub fn collected_djinn(&self) -> &[DjinnId] {
        &self.collected_djinn
    }

    /// Adds a Djinn to the collected pool.
    pub fn collect_djinn(&mut self, id: DjinnId) -> Result<(), TeamError> {
        if self.collected_djinn.contains(&id) {
            return Err(TeamError::AlreadyCollected(id));
        }
        self.collected_djinn
            .try_push(id)
            .map_err(|_| TeamError::PoolFull {
                max: GameConfig::MAX_COLLECTED_DJINN,
            })
    }

    /// Equips a collected Djinn in `slot` (0-2) in the `Set` state.
    ///
    /// Returns the Djinn previously in that slot, if any.
    pub fn equip_djinn(&mut self, id: DjinnId, slot: usize) -> Result<Option<DjinnId>, TeamError> {
        if !self.collected_djinn.contains(&id) {
            return Err(TeamError::NotCollected(id));
        }
        if slot >= GameConfig::MAX_EQUIPPED_DJINN {
            return Err(TeamError::InvalidSlot {
                slot,
                max: GameConfig::MAX_EQUIPPED_DJINN - 1,
            });
        }
        if self.equipped_djinn.iter().flatten().any(|equipped| equipped == &id) {
            return Err(TeamError::AlreadyEquipped(id));
        }

        let previous = self.equipped_djinn[slot].replace(id.clone());
        if let Some(previous) = &previous {
            self.djinn_states.remove(previous);
            self.activations.remove(previous);
        }
        self.djinn_states.insert(id, DjinnState::Set);
        Ok(previous)
    }

    /// Removes the Djinn from `slot`.
    pub fn unequip_djinn(&mut self, slot: usize) -> Result<Option<DjinnId>, TeamError> {
        let entry = self
            .equipped_djinn
            .get_mut(slot)
            .ok_or(TeamError::InvalidSlot {
                slot,
                max: GameConfig::MAX_EQUIPPED_DJINN - 1,
            })?;
        let removed = entry.take();
        if let Some(removed) = &removed {
            self.djinn_states.remove(removed);
            self.activations.remove(removed);
        }
        Ok(removed)
    }

    /// Equipped Djinn in slot order.
    pub fn equipped_djinn(&self) -> impl Iterator<Item = &DjinnId> {
        self.equipped_djinn.iter().flatten()
    }

    pub fn djinn_state(&self, id: &DjinnId) -> Option<DjinnState> {
        self.djinn_states.get(id).copied()
    }

    /// Equipped Djinn currently in `state`, in slot order.
    pub fn djinn_in_state(&self, state: DjinnState) -> impl Iterator<Item = &DjinnId> {
        self.equipped_djinn()
            .filter(move |id| self.djinn_state(id) == Some(state))
    }

    /// Moves an equipped Djinn along a legal lifecycle edge.
    pub fn transition_djinn(
        &mut self,
        id: &DjinnId,
        to: DjinnState,
    ) -> Result<DjinnState, TeamError> {
        let from = self
            .djinn_states
            .get_mut(id)
            .ok_or_else(|| TeamError::NotEquipped(id.clone()))?;
        if !from.can_transition_to(to) {
            return Err(TeamError::IllegalDjinnTransition {
                id: id.clone(),
                from: *from,
                to,
            });
        }
        let previous = *from;
        *from = to;
        Ok(previous)
    }

    // ========================================================================
    // Turn bookkeeping
    // ========================================================================

    /// Counts one activation of `id` in the current turn.
    pub fn record_activation(&mut self, id: &DjinnId) {
        *self.activations.entry(id.clone()).or_insert(0) += 1;
    }

    pub fn activations(&self, id: &DjinnId) -> u8 {
        self.activations.get(id).copied().unwrap_or(0)
    }

    /// Starts a new turn: increments the counter and resets activation counts.
    pub fn begin_turn(&mut self) {
        self.current_turn += 1;
        self.activations.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::unit::tests::definition;

    fn team() -> Team {
        Team::new([Unit::from_definition(&definition(), 1)]).unwrap()
    }

    #[test]
    fn party_size_is_bounded() {
        assert!(matches!(
            Team::new(Vec::new()),
            Err(TeamError::InvalidPartySize { actual: 0, .. })
        ));

        let units = (0..5).map(|i| {
            let mut unit = Unit::from_definition(&definition(), 1);
            unit.id = UnitId::new(format!("adept-{i}"));
            unit
        });
        assert!(matches!(
            Team::new(units),
            Err(TeamError::InvalidPartySize { actual: 5, .. })
        ));
    }

    #[test]
    fn duplicate_units_are_rejected() {
        let unit = Unit::from_definition(&definition(), 1);
        assert!(matches!(
            Team::new([unit.clone(), unit]),
            Err(TeamError::DuplicateUnit(_))
        ));
    }

    #[test]
    fn collect_rejects_duplicates_and_overflow() {
        let mut team = team();
        team.collect_djinn(DjinnId::new("flint")).unwrap();
        assert_eq!(
            team.collect_djinn(DjinnId::new("flint")),
            Err(TeamError::AlreadyCollected(DjinnId::new("flint")))
        );

        for i in 1..GameConfig::MAX_COLLECTED_DJINN {
            team.collect_djinn(DjinnId::new(format!("djinn-{i}"))).unwrap();
        }
        assert!(matches!(
            team.collect_djinn(DjinnId::new("one-too-many")),
            Err(TeamError::PoolFull { .. })
        ));
    }

    #[test]
    fn equip_validates_collection_slot_and_uniqueness() {
        let mut team = team();
        let flint = DjinnId::new("flint");
        assert_eq!(
            team.equip_djinn(flint.clone(), 0),
            Err(TeamError::NotCollected(flint.clone()))
        );

        team.collect_djinn(flint.clone()).unwrap();
        assert!(matches!(
            team.equip_djinn(flint.clone(), 3),
            Err(TeamError::InvalidSlot { slot: 3, .. })
        ));

        assert_eq!(team.equip_djinn(flint.clone(), 0), Ok(None));
        assert_eq!(team.djinn_state(&flint), Some(DjinnState::Set));
        assert_eq!(
            team.equip_djinn(flint.clone(), 1),
            Err(TeamError::AlreadyEquipped(flint))
        );
    }

    #[test]
    fn lifecycle_follows_legal_edges() {
        let mut team = team();
        let flint = DjinnId::new("flint");
        team.collect_djinn(flint.clone()).unwrap();
        team.equip_djinn(flint.clone(), 0).unwrap();

        assert!(matches!(
            team.transition_djinn(&flint, DjinnState::Recovery),
            Err(TeamError::IllegalDjinnTransition { .. })
        ));
        team.transition_djinn(&flint, DjinnState::Standby).unwrap();
        team.transition_djinn(&flint, DjinnState::Recovery).unwrap();
        assert_eq!(
            team.djinn_in_state(DjinnState::Recovery).collect::<Vec<_>>(),
            vec![&flint]
        );
    }

    #[test]
    fn activations_reset_each_turn() {
        let mut team = team();
        let flint = DjinnId::new("flint");
        team.record_activation(&flint);
        assert_eq!(team.activations(&flint), 1);

        team.begin_turn();
        assert_eq!(team.current_turn, 1);
        assert_eq!(team.activations(&flint), 0);
    }
}
