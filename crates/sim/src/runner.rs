//! Drives a tower run floor by floor with scripted policies.

use anyhow::{Context, Result};
use serde::Serialize;
use vale_core::battle::{AutoPlanner, PlayerPolicy, ScriptedPolicy, apply_rewards};
use vale_core::tower::{
    BattleSummary, FloorRecord, TowerStats, apply_rest, carry_battle_hp, prepare_floor_battle,
};
use vale_core::{
    BattleState, ContentSnapshot, Difficulty, Env, GameConfig, GameEnv, PcgRng, Team, TowerConfig,
    TowerFloor, TowerRunState, Unit, UnitId,
};

static RNG: PcgRng = PcgRng;

/// Final state of a simulated run, printed as JSON.
#[derive(Debug, Serialize)]
pub struct RunReport {
    pub seed: u64,
    pub difficulty: Difficulty,
    pub completed: bool,
    pub failed: bool,
    pub stats: TowerStats,
    pub history: Vec<FloorRecord>,
    pub party: Vec<PartyMember>,
}

#[derive(Debug, Serialize)]
pub struct PartyMember {
    pub id: UnitId,
    pub level: u8,
    pub xp: u32,
    pub hp: u32,
    pub max_hp: u32,
}

/// Headless tower simulator.
pub struct TowerSimulation<'a> {
    content: &'a ContentSnapshot,
    battle_config: GameConfig,
    planner: AutoPlanner,
}

impl<'a> TowerSimulation<'a> {
    pub fn new(content: &'a ContentSnapshot, battle_config: GameConfig) -> Self {
        Self {
            content,
            battle_config,
            planner: AutoPlanner::new().unleashing_djinn(),
        }
    }

    /// Builds the campaign team at level 1 and equips the first Djinn in
    /// content order.
    pub fn build_team(&self, party: &[UnitId]) -> Result<Team> {
        let units = party
            .iter()
            .map(|id| {
                self.content
                    .units
                    .get(id)
                    .map(|definition| Unit::from_definition(definition, 1))
                    .with_context(|| format!("unknown party member '{id}'"))
            })
            .collect::<Result<Vec<_>>>()?;
        let mut team = Team::new(units)?;

        for (slot, id) in self
            .content
            .djinn
            .keys()
            .take(GameConfig::MAX_EQUIPPED_DJINN)
            .enumerate()
        {
            team.collect_djinn(id.clone())?;
            team.equip_djinn(id.clone(), slot)?;
        }
        Ok(team)
    }

    /// Plays every floor until the run completes or fails.
    pub fn run(
        &self,
        seed: u64,
        difficulty: Difficulty,
        floors: Vec<TowerFloor>,
        tower_config: TowerConfig,
        team: &mut Team,
    ) -> Result<TowerRunState> {
        let env = Env::with_all(self.content, &RNG).as_game_env();
        let mut run = TowerRunState::create(seed, difficulty, floors, tower_config)?;

        while !run.is_completed() {
            let Some(floor) = run.current_floor() else {
                break;
            };
            let floor_number = floor.floor_number;

            if floor.is_rest() {
                let rest = apply_rest(&run, team, false)?;
                tracing::info!(
                    floor = floor_number,
                    restored = rest.hp_restored,
                    revived = rest.units_revived,
                    "rested"
                );
                run = run.complete_rest_floor(rest)?;
                continue;
            }

            let summary = self.fight(&run, team, &env)?;
            run = run.record_battle_result(&summary)?;

            let (claimed, rewards) = run.clear_pending_rewards();
            run = claimed;
            for level_up in apply_rewards(team, &rewards) {
                tracing::info!(
                    unit = %level_up.unit,
                    from = level_up.from,
                    to = level_up.to,
                    "level up"
                );
            }
        }

        Ok(run)
    }

    /// Fights the current floor and folds the result back into `team`.
    fn fight(&self, run: &TowerRunState, team: &mut Team, env: &GameEnv<'_>) -> Result<BattleSummary> {
        let mut battle = prepare_floor_battle(run, team, env, self.battle_config.clone())?;
        let mut emitted = 0;

        while !battle.is_over() && battle.round() <= self.battle_config.max_rounds {
            self.planner.plan(&mut battle, self.content)?;
            battle.execute_round(env, &ScriptedPolicy)?;
            emitted = emit_log(&battle, emitted);
        }

        if !battle.is_over() {
            tracing::warn!(
                rounds = self.battle_config.max_rounds,
                "battle hit the round cap, retreating"
            );
            return Ok(BattleSummary::retreat());
        }

        let spoils = battle.calculate_rewards(env)?;
        let summary = BattleSummary::from_battle(&battle, spoils)?;
        carry_battle_hp(team, battle.player_team());
        Ok(summary)
    }
}

/// Forwards log entries appended since `from` to the subscriber.
fn emit_log(battle: &BattleState, from: usize) -> usize {
    let entries = battle.log().entries();
    for entry in &entries[from.min(entries.len())..] {
        tracing::info!(target: "vale_sim::battle", round = entry.round, "{}", entry.text);
    }
    entries.len()
}

impl RunReport {
    pub fn new(run: &TowerRunState, team: &Team) -> Self {
        Self {
            seed: run.seed(),
            difficulty: run.difficulty(),
            completed: run.is_completed(),
            failed: run.is_failed(),
            stats: run.stats().clone(),
            history: run.history().to_vec(),
            party: team
                .units
                .iter()
                .map(|unit| PartyMember {
                    id: unit.id.clone(),
                    level: unit.level,
                    xp: unit.xp,
                    hp: unit.current_hp,
                    max_hp: unit.max_hp(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use vale_content::ContentFactory;
    use vale_core::tower::FloorOutcome;

    use super::*;
    use crate::config::SimConfig;

    #[test]
    fn shipped_tower_runs_to_the_end() {
        let config = SimConfig::default();
        let bundle = ContentFactory::new(&config.content_dir).load_bundle().unwrap();
        let sim = TowerSimulation::new(&bundle.content, bundle.config.battle.clone());
        let mut team = sim.build_team(&config.party).unwrap();
        assert_eq!(team.equipped_djinn().count(), 3);

        let run = sim
            .run(
                config.seed,
                config.difficulty,
                bundle.floors.clone(),
                bundle.config.tower.clone(),
                &mut team,
            )
            .unwrap();

        assert!(run.is_completed());
        assert!(run.pending_rewards().is_empty());
        let first = &run.history()[0];
        assert_ne!(first.outcome, FloorOutcome::Pending);

        let report = RunReport::new(&run, &team);
        assert_eq!(report.party.len(), 4);
        assert!(serde_json::to_string(&report).unwrap().contains("\"history\""));
    }

    #[test]
    fn unknown_party_member_is_an_error() {
        let content = ContentSnapshot::new();
        let sim = TowerSimulation::new(&content, GameConfig::default());
        let err = sim.build_team(&[UnitId::new("nobody")]).unwrap_err();
        assert!(err.to_string().contains("nobody"));
    }
}
