//! Stat system.
//!
//! ```text
//! [ Base Stats + Growth ] --level--> [ Stats at Level ]
//!                                         ↓  flat (equipment, Set Djinn)
//!                                         ↓  %   (buff / debuff statuses)
//!                                    [ Effective Stats ]
//! ```
//!
//! All functions here are pure: same inputs, same outputs, no randomness.

pub mod bonus;
pub mod core;
pub mod effective;

pub use bonus::{Bonus, BonusStack, StatBounds};
pub use self::core::{GrowthRates, StatDelta, StatKind, Stats, calculate_stats_at_level};
pub use effective::StatBonuses;
