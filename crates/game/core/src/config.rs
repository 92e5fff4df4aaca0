/// Battle configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    /// Rounds a Djinn spends in `Recovery` after its summon resolves.
    pub djinn_recovery_turns: u8,

    /// State a Djinn returns to once its recovery timer reaches zero.
    pub djinn_recovery_rule: DjinnRecoveryRule,

    /// Percent chance (0-100) that a physical hit is critical.
    pub crit_chance_percent: u8,

    /// Safety cap for headless simulations that loop rounds until the battle ends.
    pub max_rounds: u32,
}

/// Where a recovered Djinn lands when its recovery timer expires.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DjinnRecoveryRule {
    /// Recovered Djinn are immediately summonable again.
    #[default]
    ReturnToStandby,
    /// Recovered Djinn go back to granting their passive bonus.
    ReturnToSet,
}

impl GameConfig {
    // ===== compile-time constants used as type parameters =====
    pub const MIN_PARTY_SIZE: usize = 1;
    pub const MAX_PARTY_SIZE: usize = 4;
    pub const MAX_EQUIPPED_DJINN: usize = 3;
    pub const MAX_COLLECTED_DJINN: usize = 12;
    pub const MAX_ABILITIES_PER_GRANT: usize = 4;
    pub const MAX_STATUS_EFFECTS: usize = 12;

    pub const MIN_LEVEL: u8 = 1;
    pub const MAX_LEVEL: u8 = 20;
    pub const MAX_MANA_COST: u8 = 10;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_DJINN_RECOVERY_TURNS: u8 = 2;
    pub const DEFAULT_CRIT_CHANCE_PERCENT: u8 = 5;
    pub const DEFAULT_MAX_ROUNDS: u32 = 100;

    pub fn new() -> Self {
        Self {
            djinn_recovery_turns: Self::DEFAULT_DJINN_RECOVERY_TURNS,
            djinn_recovery_rule: DjinnRecoveryRule::default(),
            crit_chance_percent: Self::DEFAULT_CRIT_CHANCE_PERCENT,
            max_rounds: Self::DEFAULT_MAX_ROUNDS,
        }
    }

    pub fn with_recovery_rule(mut self, rule: DjinnRecoveryRule) -> Self {
        self.djinn_recovery_rule = rule;
        self
    }

    pub fn with_crit_chance(mut self, percent: u8) -> Self {
        self.crit_chance_percent = percent.min(100);
        self
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
