//! Battle errors.

use super::phase::BattlePhase;
use crate::env::OracleError;
use crate::error::{ErrorSeverity, GameError};
use crate::state::{AbilityId, DjinnId, DjinnState, TeamError, UnitId};

/// Errors raised by battle construction, planning and resolution.
///
/// Planning refusals the player can fix (mana, cooldowns, Djinn not ready) are
/// recoverable. Unknown ids are validation failures. Phase misuse means the
/// caller broke the state machine contract.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BattleError {
    #[error("a battle needs at least one enemy")]
    NoEnemies,

    #[error("unit id {0} is used more than once")]
    DuplicateUnitId(UnitId),

    #[error("unknown unit {0}")]
    UnknownUnit(UnitId),

    #[error("unit {0} is not a player unit")]
    NotPlayerUnit(UnitId),

    #[error("unit {0} is defeated")]
    UnitDefeated(UnitId),

    #[error("{unit} cannot use {ability}")]
    AbilityUnavailable { unit: UnitId, ability: AbilityId },

    #[error("{ability} is on cooldown for {rounds} more round(s)")]
    AbilityOnCooldown { ability: AbilityId, rounds: u8 },

    #[error("{ability} has mana cost {cost}, above the maximum")]
    ManaCostOutOfRange { ability: AbilityId, cost: u8 },

    #[error("not enough mana: need {required}, have {available}")]
    InsufficientMana { required: u32, available: u32 },

    #[error("{target} is not a valid target for {ability}")]
    InvalidTarget { ability: AbilityId, target: UnitId },

    #[error("djinn {djinn} cannot be summoned from {state:?}")]
    DjinnNotReady {
        djinn: DjinnId,
        state: Option<DjinnState>,
    },

    #[error("djinn {0} is already queued")]
    DjinnAlreadyQueued(DjinnId),

    #[error("illegal phase transition {from} -> {to}")]
    IllegalTransition { from: BattlePhase, to: BattlePhase },

    #[error("operation requires phase {expected}, battle is in {actual}")]
    WrongPhase {
        expected: BattlePhase,
        actual: BattlePhase,
    },

    #[error(transparent)]
    Team(#[from] TeamError),

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl GameError for BattleError {
    fn severity(&self) -> ErrorSeverity {
        use BattleError::*;
        match self {
            UnitDefeated(_)
            | AbilityOnCooldown { .. }
            | InsufficientMana { .. }
            | DjinnNotReady { .. }
            | DjinnAlreadyQueued(_) => ErrorSeverity::Recoverable,

            NoEnemies
            | DuplicateUnitId(_)
            | UnknownUnit(_)
            | NotPlayerUnit(_)
            | AbilityUnavailable { .. }
            | ManaCostOutOfRange { .. }
            | InvalidTarget { .. } => ErrorSeverity::Validation,

            IllegalTransition { .. } | WrongPhase { .. } => ErrorSeverity::Internal,

            Team(err) => err.severity(),
            Oracle(err) => err.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        use BattleError::*;
        match self {
            NoEnemies => "BATTLE_NO_ENEMIES",
            DuplicateUnitId(_) => "BATTLE_DUPLICATE_UNIT_ID",
            UnknownUnit(_) => "BATTLE_UNKNOWN_UNIT",
            NotPlayerUnit(_) => "BATTLE_NOT_PLAYER_UNIT",
            UnitDefeated(_) => "BATTLE_UNIT_DEFEATED",
            AbilityUnavailable { .. } => "BATTLE_ABILITY_UNAVAILABLE",
            AbilityOnCooldown { .. } => "BATTLE_ABILITY_ON_COOLDOWN",
            ManaCostOutOfRange { .. } => "BATTLE_MANA_COST_OUT_OF_RANGE",
            InsufficientMana { .. } => "BATTLE_INSUFFICIENT_MANA",
            InvalidTarget { .. } => "BATTLE_INVALID_TARGET",
            DjinnNotReady { .. } => "BATTLE_DJINN_NOT_READY",
            DjinnAlreadyQueued(_) => "BATTLE_DJINN_ALREADY_QUEUED",
            IllegalTransition { .. } => "BATTLE_ILLEGAL_TRANSITION",
            WrongPhase { .. } => "BATTLE_WRONG_PHASE",
            Team(err) => err.error_code(),
            Oracle(err) => err.error_code(),
        }
    }
}
