//! Common error infrastructure for vale-core.
//!
//! Domain-specific errors (`BattleError`, `TeamError`, `TowerError`, ...) live in
//! their respective modules and implement [`GameError`] so callers can decide
//! how loudly to fail.
//!
//! # Classification
//!
//! - **Recoverable**: expected game-flow refusals (not enough mana, pool full)
//! - **Validation**: a reference that does not resolve (unknown unit or ability)
//! - **Internal**: the caller broke a contract (illegal phase transition,
//!   battle result recorded on a rest floor). These are programming errors.

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Expected refusal; the player can pick something else.
    ///
    /// Examples: insufficient mana, ability on cooldown
    Recoverable,

    /// Invalid input, should not retry without changes.
    ///
    /// Examples: unit not found, Djinn not collected
    Validation,

    /// Contract violation by the caller. Indicates a bug.
    ///
    /// Examples: executing a round outside planning, empty floor list
    Internal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates a contract violation.
    pub const fn is_contract_violation(&self) -> bool {
        matches!(self, Self::Internal)
    }
}

/// Common trait for all vale-core errors.
///
/// # Implementation Guidelines
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on who is at fault, not on impact
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Default implementation uses the error type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
