//! Tower run state and its reducers.
//!
//! Every reducer takes the current state by reference and returns the next
//! one. Once a run is completed every reducer returns an unchanged copy.

use super::config::{Difficulty, TowerConfig};
use super::error::TowerError;
use super::floor::TowerFloor;
use super::scaling::calculate_floor_rewards;
use crate::battle::BattleRewards;
use crate::state::FloorId;

/// How a floor was resolved.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FloorOutcome {
    #[default]
    Pending,
    Victory,
    Defeat,
    Retreat,
    Rested,
}

/// Result of a floor battle as seen by the run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleOutcome {
    Victory,
    Defeat,
    /// The party left the tower. Ends the run without failing it.
    Retreat,
}

/// What a floor battle contributes to the run.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleSummary {
    pub outcome: BattleOutcome,
    pub turns: u32,
    pub damage_dealt: u64,
    pub damage_taken: u64,
    /// Battle spoils; floor rewards are added by the run.
    pub rewards: BattleRewards,
}

impl BattleSummary {
    /// Leaving the tower at a floor boundary, without fighting.
    pub fn retreat() -> Self {
        Self {
            outcome: BattleOutcome::Retreat,
            turns: 0,
            damage_dealt: 0,
            damage_taken: 0,
            rewards: BattleRewards::default(),
        }
    }
}

/// What a rest floor did to the party.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RestSummary {
    pub heal_fraction: f64,
    pub hp_restored: u32,
    pub units_revived: u32,
    pub loadout_changed: bool,
}

/// History entry for one floor.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FloorRecord {
    pub floor_id: FloorId,
    pub floor_number: u32,
    pub outcome: FloorOutcome,
    #[cfg_attr(feature = "serde", serde(default))]
    pub rewards: BattleRewards,
    #[cfg_attr(feature = "serde", serde(default))]
    pub rest: Option<RestSummary>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub turns: u32,
}

/// Rewards earned on a floor and not yet claimed.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PendingReward {
    pub floor_number: u32,
    pub rewards: BattleRewards,
}

/// Aggregate statistics of a run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TowerStats {
    /// Highest floor number cleared or rested on; 0 before the first floor.
    pub highest_floor: u32,
    pub battles_won: u32,
    pub battles_lost: u32,
    pub retreats: u32,
    pub floors_rested: u32,
    pub floors_skipped: u32,
    pub total_turns: u32,
    pub damage_dealt: u64,
    pub damage_taken: u64,
}

/// A tower run: a floor sequence walked by a cursor.
///
/// # Invariants
///
/// - `floors` is sorted by floor number and never empty.
/// - `history[i]` describes `floors[i]`.
/// - `floor_index` never decreases; `is_completed` never resets.
/// - `is_failed` implies `is_completed`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TowerRunState {
    seed: u64,
    difficulty: Difficulty,
    floors: Vec<TowerFloor>,
    floor_index: usize,
    is_completed: bool,
    is_failed: bool,
    stats: TowerStats,
    history: Vec<FloorRecord>,
    pending_rewards: Vec<PendingReward>,
    config: TowerConfig,
}

impl TowerRunState {
    /// Starts a run. Floors are sorted by floor number; every history entry
    /// starts out pending.
    pub fn create(
        seed: u64,
        difficulty: Difficulty,
        mut floors: Vec<TowerFloor>,
        config: TowerConfig,
    ) -> Result<Self, TowerError> {
        if floors.is_empty() {
            return Err(TowerError::EmptyFloorList);
        }
        floors.sort_by_key(|floor| floor.floor_number);

        let history = floors
            .iter()
            .map(|floor| FloorRecord {
                floor_id: floor.id.clone(),
                floor_number: floor.floor_number,
                outcome: FloorOutcome::Pending,
                rewards: BattleRewards::default(),
                rest: None,
                turns: 0,
            })
            .collect();

        tracing::info!(seed, %difficulty, floors = floors.len(), "tower run started");
        Ok(Self {
            seed,
            difficulty,
            floors,
            floor_index: 0,
            is_completed: false,
            is_failed: false,
            stats: TowerStats::default(),
            history,
            pending_rewards: Vec::new(),
            config,
        })
    }

    // ===== read access =====

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn config(&self) -> &TowerConfig {
        &self.config
    }

    pub fn floors(&self) -> &[TowerFloor] {
        &self.floors
    }

    pub fn floor_ids(&self) -> impl Iterator<Item = &FloorId> {
        self.floors.iter().map(|floor| &floor.id)
    }

    pub fn floor_index(&self) -> usize {
        self.floor_index
    }

    /// The floor under the cursor, or `None` once every floor is behind it.
    pub fn current_floor(&self) -> Option<&TowerFloor> {
        self.floors.get(self.floor_index)
    }

    pub fn is_completed(&self) -> bool {
        self.is_completed
    }

    pub fn is_failed(&self) -> bool {
        self.is_failed
    }

    pub fn stats(&self) -> &TowerStats {
        &self.stats
    }

    pub fn history(&self) -> &[FloorRecord] {
        &self.history
    }

    pub fn pending_rewards(&self) -> &[PendingReward] {
        &self.pending_rewards
    }

    /// Sum of every unclaimed reward.
    pub fn total_pending_rewards(&self) -> BattleRewards {
        let mut total = BattleRewards::default();
        for pending in &self.pending_rewards {
            total.merge(&pending.rewards);
        }
        total
    }

    // ===== reducers =====

    /// Folds a floor battle into the run.
    ///
    /// Victory clears the floor and moves the cursor; defeat fails the run;
    /// retreat ends it without failing. Recording against a rest floor is a
    /// contract violation.
    pub fn record_battle_result(&self, summary: &BattleSummary) -> Result<Self, TowerError> {
        if self.is_completed {
            return Ok(self.clone());
        }
        let floor = self.current_floor().ok_or(TowerError::RunFinished)?;
        if floor.is_rest() {
            tracing::warn!(floor = %floor.id, "battle result recorded on a rest floor");
            return Err(TowerError::BattleOnRestFloor(floor.id.clone()));
        }

        let mut next = self.clone();
        next.stats.total_turns = next.stats.total_turns.saturating_add(summary.turns);
        next.stats.damage_dealt = next.stats.damage_dealt.saturating_add(summary.damage_dealt);
        next.stats.damage_taken = next.stats.damage_taken.saturating_add(summary.damage_taken);

        let record = &mut next.history[self.floor_index];
        record.turns = summary.turns;
        match summary.outcome {
            BattleOutcome::Victory => {
                let mut rewards = calculate_floor_rewards(floor, self.difficulty, &self.config);
                rewards.merge(&summary.rewards);
                record.outcome = FloorOutcome::Victory;
                record.rewards = rewards.clone();

                next.stats.battles_won += 1;
                next.pending_rewards.push(PendingReward {
                    floor_number: floor.floor_number,
                    rewards,
                });
                next.clear_floor(floor.floor_number);
            }
            BattleOutcome::Defeat => {
                record.outcome = FloorOutcome::Defeat;
                next.stats.battles_lost += 1;
                next.is_failed = true;
                next.is_completed = true;
            }
            BattleOutcome::Retreat => {
                record.outcome = FloorOutcome::Retreat;
                next.stats.retreats += 1;
                next.is_completed = true;
            }
        }

        tracing::debug!(
            floor = floor.floor_number,
            outcome = %summary.outcome,
            index = next.floor_index,
            "battle result recorded"
        );
        next.log_if_finished();
        Ok(next)
    }

    /// Closes the current rest floor and moves the cursor.
    pub fn complete_rest_floor(&self, rest: RestSummary) -> Result<Self, TowerError> {
        if self.is_completed {
            return Ok(self.clone());
        }
        let floor = self.current_floor().ok_or(TowerError::RunFinished)?;
        if !floor.is_rest() {
            tracing::warn!(floor = %floor.id, "rest completed on a battle floor");
            return Err(TowerError::NotRestFloor(floor.id.clone()));
        }

        let mut next = self.clone();
        let record = &mut next.history[self.floor_index];
        record.outcome = FloorOutcome::Rested;
        record.rest = Some(rest);
        next.stats.floors_rested += 1;
        next.clear_floor(floor.floor_number);

        tracing::debug!(floor = floor.floor_number, "rest floor completed");
        next.log_if_finished();
        Ok(next)
    }

    /// Moves the cursor past the current floor without resolving it.
    ///
    /// The skipped floor stays pending in the history and does not count
    /// towards the highest floor.
    pub fn advance_to_next_floor(&self) -> Self {
        if self.is_completed {
            return self.clone();
        }
        let mut next = self.clone();
        next.stats.floors_skipped += 1;
        next.floor_index += 1;
        if next.floor_index >= next.floors.len() {
            next.is_completed = true;
        }
        tracing::debug!(index = next.floor_index, "floor skipped");
        next.log_if_finished();
        next
    }

    /// Drains the unclaimed rewards, returning their sum.
    pub fn clear_pending_rewards(&self) -> (Self, BattleRewards) {
        let total = self.total_pending_rewards();
        let mut next = self.clone();
        next.pending_rewards.clear();
        (next, total)
    }

    fn clear_floor(&mut self, floor_number: u32) {
        self.stats.highest_floor = self.stats.highest_floor.max(floor_number);
        self.floor_index += 1;
        if self.floor_index >= self.floors.len() {
            self.is_completed = true;
        }
    }

    fn log_if_finished(&self) {
        if self.is_completed {
            tracing::info!(
                failed = self.is_failed,
                highest_floor = self.stats.highest_floor,
                won = self.stats.battles_won,
                "tower run finished"
            );
        }
    }
}
