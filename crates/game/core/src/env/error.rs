//! Oracle access errors.

use crate::error::{ErrorSeverity, GameError};
use crate::state::{AbilityId, DjinnId, EncounterId, EnemyId};

/// Errors that occur when accessing oracle data.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OracleError {
    /// ContentOracle is not available in the environment.
    #[error("ContentOracle not available")]
    ContentNotAvailable,

    /// RngOracle is not available in the environment.
    #[error("RngOracle not available")]
    RngNotAvailable,

    #[error("ability '{0}' not found")]
    AbilityNotFound(AbilityId),

    #[error("djinn '{0}' not found")]
    DjinnNotFound(DjinnId),

    #[error("enemy '{0}' not found")]
    EnemyNotFound(EnemyId),

    #[error("encounter '{0}' not found")]
    EncounterNotFound(EncounterId),
}

impl GameError for OracleError {
    fn severity(&self) -> ErrorSeverity {
        use OracleError::*;
        match self {
            // Missing oracles mean the caller wired the environment wrong
            ContentNotAvailable | RngNotAvailable => ErrorSeverity::Internal,

            // Not found errors are validation errors - invalid references
            AbilityNotFound(_) | DjinnNotFound(_) | EnemyNotFound(_) | EncounterNotFound(_) => {
                ErrorSeverity::Validation
            }
        }
    }

    fn error_code(&self) -> &'static str {
        use OracleError::*;
        match self {
            ContentNotAvailable => "ORACLE_CONTENT_NOT_AVAILABLE",
            RngNotAvailable => "ORACLE_RNG_NOT_AVAILABLE",
            AbilityNotFound(_) => "ORACLE_ABILITY_NOT_FOUND",
            DjinnNotFound(_) => "ORACLE_DJINN_NOT_FOUND",
            EnemyNotFound(_) => "ORACLE_ENEMY_NOT_FOUND",
            EncounterNotFound(_) => "ORACLE_ENCOUNTER_NOT_FOUND",
        }
    }
}
