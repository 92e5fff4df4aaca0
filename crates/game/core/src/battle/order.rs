//! Turn order.

use std::cmp::Reverse;

use super::state::BattleState;
use crate::env::ContentOracle;
use crate::state::{Side, UnitId};

/// Orders every living unit for one round.
///
/// Sort key: effective SPD descending, then players before enemies, then
/// roster index. The key is total, so the order is fully deterministic.
pub fn compute_turn_order(battle: &BattleState, content: &dyn ContentOracle) -> Vec<UnitId> {
    let player_bonus = battle.djinn_bonus(content);
    let mut entries: Vec<(Reverse<u32>, Side, usize, UnitId)> = Vec::new();

    for side in [Side::Player, Side::Enemy] {
        for (index, unit) in battle.side_units(side).iter().enumerate() {
            if !unit.is_alive() {
                continue;
            }
            let stats = match side {
                Side::Player => unit.effective_stats(&player_bonus),
                Side::Enemy => unit.effective_stats(&Default::default()),
            };
            entries.push((Reverse(stats.spd), side, index, unit.id.clone()));
        }
    }

    entries.sort();
    entries.into_iter().map(|(_, _, _, id)| id).collect()
}
