//! Append-only battle event log.
//!
//! The log is the canonical event stream a presentation layer replays for
//! animation. Entries are never changed or removed after they are pushed; each
//! one is mirrored to `tracing` at debug level as it is appended.

use std::fmt;

use super::phase::BattleStatus;
use crate::state::{
    AbilityId, ApplyOutcome, DjinnId, DjinnState, StatusKind, SummonEffect, UnitId,
};

/// Where a point of damage came from.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DamageSource {
    Unit(UnitId),
    Djinn(DjinnId),
    Status(StatusKind),
}

impl fmt::Display for DamageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DamageSource::Unit(id) => write!(f, "{id}"),
            DamageSource::Djinn(id) => write!(f, "djinn {id}"),
            DamageSource::Status(kind) => write!(f, "{kind}"),
        }
    }
}

/// Structured battle event.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum BattleEvent {
    BattleStarted {
        players: Vec<UnitId>,
        enemies: Vec<UnitId>,
    },
    RoundStarted {
        turn_order: Vec<UnitId>,
    },
    DjinnSummoned {
        djinn: DjinnId,
        effect: SummonEffect,
    },
    DjinnRecovered {
        djinn: DjinnId,
        state: DjinnState,
    },
    AbilityUsed {
        actor: UnitId,
        ability: AbilityId,
        targets: Vec<UnitId>,
    },
    ActionSkipped {
        actor: UnitId,
        reason: StatusKind,
    },
    Damage {
        source: DamageSource,
        target: UnitId,
        amount: u32,
        critical: bool,
        remaining_hp: u32,
    },
    DamageBlocked {
        target: UnitId,
        by: StatusKind,
    },
    Healed {
        target: UnitId,
        amount: u32,
        remaining_hp: u32,
    },
    StatusApplied {
        target: UnitId,
        status: StatusKind,
        outcome: ApplyOutcome,
    },
    StatusResisted {
        target: UnitId,
        status: StatusKind,
    },
    StatusExpired {
        target: UnitId,
        status: StatusKind,
    },
    StatusCleansed {
        target: UnitId,
        count: u32,
    },
    UnitDefeated {
        unit: UnitId,
    },
    UnitRevived {
        unit: UnitId,
        hp: u32,
    },
    RoundEnded,
    BattleEnded {
        status: BattleStatus,
    },
}

impl fmt::Display for BattleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use BattleEvent::*;
        match self {
            BattleStarted { players, enemies } => write!(
                f,
                "Battle starts: {} vs {}",
                join(players),
                join(enemies)
            ),
            RoundStarted { turn_order } => write!(f, "Turn order: {}", join(turn_order)),
            DjinnSummoned { djinn, .. } => write!(f, "{djinn} is summoned!"),
            DjinnRecovered { djinn, state } => write!(f, "{djinn} recovers ({state})"),
            AbilityUsed {
                actor,
                ability,
                targets,
            } => write!(f, "{actor} uses {ability} on {}", join(targets)),
            ActionSkipped { actor, reason } => write!(f, "{actor} cannot act ({reason})"),
            Damage {
                source,
                target,
                amount,
                critical,
                remaining_hp,
            } => {
                if *critical {
                    write!(f, "Critical! ")?;
                }
                write!(
                    f,
                    "{source} deals {amount} damage to {target} ({remaining_hp} HP left)"
                )
            }
            DamageBlocked { target, by } => write!(f, "{target}'s {by} blocks the hit"),
            Healed {
                target,
                amount,
                remaining_hp,
            } => write!(f, "{target} recovers {amount} HP ({remaining_hp} HP)"),
            StatusApplied {
                target,
                status,
                outcome,
            } => match outcome {
                ApplyOutcome::Applied | ApplyOutcome::Refreshed => {
                    write!(f, "{target} is affected by {status}")
                }
                ApplyOutcome::Blocked => write!(f, "{target} is immune to {status}"),
                ApplyOutcome::Full => write!(f, "{target} cannot hold more effects"),
            },
            StatusResisted { target, status } => write!(f, "{target} resists {status}"),
            StatusExpired { target, status } => write!(f, "{target}'s {status} wears off"),
            StatusCleansed { target, count } => {
                write!(f, "{target} is cleansed of {count} effect(s)")
            }
            UnitDefeated { unit } => write!(f, "{unit} is defeated"),
            UnitRevived { unit, hp } => write!(f, "{unit} is revived with {hp} HP"),
            RoundEnded => write!(f, "Round ends"),
            BattleEnded { status } => write!(f, "Battle over: {status}"),
        }
    }
}

fn join(ids: &[UnitId]) -> String {
    ids.iter()
        .map(UnitId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// One immutable log line: structured event plus its rendered text.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LogEntry {
    pub round: u32,
    /// Position in the log, starting at 0.
    pub sequence: u32,
    pub event: BattleEvent,
    pub text: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct BattleLog {
    entries: Vec<LogEntry>,
}

impl BattleLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, round: u32, event: BattleEvent) {
        let sequence = self.entries.len() as u32;
        let text = event.to_string();
        tracing::debug!(round, sequence, "{text}");
        self.entries.push(LogEntry {
            round,
            sequence,
            event,
            text,
        });
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Entries appended at or after `sequence`, for incremental replay.
    pub fn since(&self, sequence: u32) -> &[LogEntry] {
        let start = (sequence as usize).min(self.entries.len());
        &self.entries[start..]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn events(&self) -> impl Iterator<Item = &BattleEvent> {
        self.entries.iter().map(|entry| &entry.event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_are_numbered_in_append_order() {
        let mut log = BattleLog::new();
        log.push(1, BattleEvent::RoundEnded);
        log.push(
            2,
            BattleEvent::UnitDefeated {
                unit: UnitId::new("slime#1"),
            },
        );

        assert_eq!(log.len(), 2);
        assert_eq!(log.entries()[1].sequence, 1);
        assert_eq!(log.entries()[1].text, "slime#1 is defeated");
        assert_eq!(log.since(1).len(), 1);
        assert!(log.since(9).is_empty());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn events_are_internally_tagged_in_json() {
        let event = BattleEvent::Healed {
            target: UnitId::new("mia"),
            amount: 12,
            remaining_hp: 30,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "healed");
        assert_eq!(json["amount"], 12);
    }
}
