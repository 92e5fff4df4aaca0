use crate::state::{EncounterId, FloorId};

/// What happens on a floor.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FloorKind {
    Normal {
        encounter: EncounterId,
    },
    Boss {
        encounter: EncounterId,
    },
    Rest {
        #[cfg_attr(feature = "serde", serde(default))]
        allow_loadout_change: bool,
        /// Overrides the config's rest heal fraction.
        #[cfg_attr(feature = "serde", serde(default))]
        heal_fraction: Option<f64>,
    },
}

/// One floor of a tower.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TowerFloor {
    pub id: FloorId,
    /// 1-based, globally ordered.
    pub floor_number: u32,
    pub kind: FloorKind,
    /// Explicit level for normalization; otherwise the run's level curve decides.
    #[cfg_attr(feature = "serde", serde(default))]
    pub normalized_level: Option<u32>,
}

impl TowerFloor {
    pub fn encounter(&self) -> Option<&EncounterId> {
        match &self.kind {
            FloorKind::Normal { encounter } | FloorKind::Boss { encounter } => Some(encounter),
            FloorKind::Rest { .. } => None,
        }
    }

    #[inline]
    pub fn is_rest(&self) -> bool {
        matches!(self.kind, FloorKind::Rest { .. })
    }

    #[inline]
    pub fn is_boss(&self) -> bool {
        matches!(self.kind, FloorKind::Boss { .. })
    }
}
