use crate::battle::BattleError;
use crate::env::OracleError;
use crate::error::{ErrorSeverity, GameError};
use crate::state::FloorId;

/// Errors raised by tower run reducers and floor composition.
///
/// Everything except nested battle and oracle errors is a contract violation: the caller
/// drove the run in an order the floor sequence does not allow.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TowerError {
    #[error("a tower run needs at least one floor")]
    EmptyFloorList,

    #[error("floor {0} is a rest floor; close it with complete_rest_floor")]
    BattleOnRestFloor(FloorId),

    #[error("floor {0} is not a rest floor")]
    NotRestFloor(FloorId),

    #[error("the tower run is already over")]
    RunFinished,

    #[error("the battle has not ended yet")]
    BattleNotFinished,

    #[error(transparent)]
    Battle(#[from] BattleError),

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl GameError for TowerError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Battle(err) => err.severity(),
            Self::Oracle(err) => err.severity(),
            _ => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyFloorList => "TOWER_EMPTY_FLOOR_LIST",
            Self::BattleOnRestFloor(_) => "TOWER_BATTLE_ON_REST_FLOOR",
            Self::NotRestFloor(_) => "TOWER_NOT_REST_FLOOR",
            Self::RunFinished => "TOWER_RUN_FINISHED",
            Self::BattleNotFinished => "TOWER_BATTLE_NOT_FINISHED",
            Self::Battle(err) => err.error_code(),
            Self::Oracle(err) => err.error_code(),
        }
    }
}
