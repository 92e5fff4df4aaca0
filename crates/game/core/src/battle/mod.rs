//! Queue-based battle engine.
//!
//! A battle alternates between planning (the player fills one action slot per
//! unit, paying from a shared mana pool, and queues Djinn summons) and
//! execution (one call resolves the whole round into the event log). All
//! randomness is drawn from the injected [`RngOracle`](crate::env::RngOracle)
//! with seeds derived from the battle seed.
mod combat;
mod error;
mod log;
mod order;
mod phase;
mod planning;
mod policy;
mod rewards;
mod round;
mod state;

pub use combat::{CRIT_PERCENT, base_damage, heal_amount, modified_damage};
pub use error::BattleError;
pub use log::{BattleEvent, BattleLog, DamageSource, LogEntry};
pub use order::compute_turn_order;
pub use phase::{BattlePhase, BattleStatus};
pub use policy::{ActionChoice, AutoPlanner, EnemyPolicy, PlayerPolicy, ScriptedPolicy};
pub use rewards::{BattleRewards, LevelUp, apply_rewards};
pub use state::{BattleSnapshot, BattleState, QueuedAction, UnitRef};

pub(crate) use state::spawn_enemies;
