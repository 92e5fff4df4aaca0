/// Battle phase. Legal moves are listed in [`BattlePhase::can_transition_to`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum BattlePhase {
    /// No battle in progress; the UI reset a finished battle.
    Idle,
    /// Player is filling the action queue.
    #[default]
    Planning,
    /// A round is being resolved.
    Executing,
    Victory,
    Defeat,
}

impl BattlePhase {
    /// Adjacency table of the battle state machine.
    pub const fn can_transition_to(self, next: BattlePhase) -> bool {
        use BattlePhase::*;
        matches!(
            (self, next),
            (Idle, Planning)
                | (Planning, Executing)
                | (Executing, Planning)
                | (Executing, Victory)
                | (Executing, Defeat)
                | (Victory, Idle)
                | (Defeat, Idle)
        )
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, BattlePhase::Victory | BattlePhase::Defeat)
    }
}

/// Outcome flag of a battle, flipped in the same step as the event that decides it.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum BattleStatus {
    #[default]
    Ongoing,
    PlayerVictory,
    PlayerDefeat,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_adjacent_phases_are_reachable() {
        assert!(BattlePhase::Planning.can_transition_to(BattlePhase::Executing));
        assert!(BattlePhase::Executing.can_transition_to(BattlePhase::Planning));
        assert!(BattlePhase::Executing.can_transition_to(BattlePhase::Victory));
        assert!(!BattlePhase::Planning.can_transition_to(BattlePhase::Victory));
        assert!(!BattlePhase::Victory.can_transition_to(BattlePhase::Planning));
        assert!(!BattlePhase::Defeat.can_transition_to(BattlePhase::Executing));
        assert!(BattlePhase::Defeat.can_transition_to(BattlePhase::Idle));
    }

    #[test]
    fn status_uses_screaming_case() {
        assert_eq!(BattleStatus::PlayerVictory.to_string(), "PLAYER_VICTORY");
    }
}
